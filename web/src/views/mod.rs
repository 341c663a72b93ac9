mod components;

mod login;
pub use login::Login;

mod admin;
pub use admin::AdminOverview;

mod users;
pub use users::ManageUsers;

mod agent;
pub use agent::AgentOverview;

mod loans;
pub use loans::{AgentLoans, NewLoan};
