use dioxus::prelude::*;
use types::{Role, SessionInfo};

mod views;

use views::{AdminOverview, AgentLoans, AgentOverview, Login, ManageUsers, NewLoan};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error")]
    Login { error: Option<String> },
    #[route("/")]
    Home {},
    #[nest("/admin")]
        #[layout(AdminLayout)]
            #[route("/")]
            AdminOverview {},
            #[route("/manage-users")]
            ManageUsers {},
        #[end_layout]
    #[end_nest]
    #[nest("/agent")]
        #[layout(AgentLayout)]
            #[route("/")]
            AgentOverview {},
            #[route("/loans")]
            AgentLoans {},
            #[route("/loans/new")]
            NewLoan {},
        #[end_layout]
    #[end_nest]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    pub fn login() -> Self {
        Route::Login { error: None }
    }

    pub fn home(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminOverview {},
            Role::Agent => Route::AgentOverview {},
        }
    }
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move {
            let routes = server::init()?;

            Ok(dioxus::server::router(App).merge(routes))
        });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "LendIt" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

/// Send the visitor to their dashboard, or to the sign-in page.
#[component]
fn Home() -> Element {
    let user = use_server_future(api::get_current_user)?;

    let target = match &*user.read() {
        None => {
            return rsx! {
                div { class: "loading", "Loading..." }
            };
        }
        Some(Ok(Some(session))) => Route::home(session.role),
        Some(Ok(None)) | Some(Err(_)) => Route::login(),
    };

    navigator().replace(target);
    rsx! {
        div { class: "loading", "Redirecting..." }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    tracing::debug!(path = %segments.join("/"), "no such page");
    navigator().replace(Route::login());
    rsx! {
        div { class: "loading", "Redirecting to login..." }
    }
}

#[component]
fn NavLink(to: Route, children: Element) -> Element {
    let current_route: Route = use_route();
    let is_active = current_route == to;

    rsx! {
        Link {
            to,
            class: if is_active { "active" },
            {children}
        }
    }
}

/// Structured error information for display
#[derive(Clone, Debug, Default)]
pub struct ErrorInfo {
    pub message: String,
    pub chain: Vec<String>,
    pub backtrace: Option<String>,
}

impl ErrorInfo {
    /// Parse a ServerFnError to extract structured error info
    pub fn from_server_error(err: &ServerFnError) -> Self {
        let ServerFnError::ServerError {
            message, details, ..
        } = err
        else {
            return Self {
                message: err.to_string(),
                chain: vec![err.to_string()],
                backtrace: None,
            };
        };

        let chain = details
            .as_ref()
            .and_then(|d| d.get("chain"))
            .and_then(|c| c.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_else(|| vec![message.clone()]);
        let backtrace = details
            .as_ref()
            .and_then(|d| d.get("backtrace"))
            .and_then(|b| b.as_str())
            .map(String::from);

        Self {
            message: message.clone(),
            chain,
            backtrace,
        }
    }
}

/// Global error state - use `use_error()` to access
#[derive(Clone, Copy)]
pub struct ErrorState(Signal<Option<ErrorInfo>>);

impl ErrorState {
    pub fn set_server_error(&mut self, err: &ServerFnError) {
        // An expired or missing session sends the user back to sign in.
        if let ServerFnError::ServerError {
            code: 401, message, ..
        } = err
        {
            navigator().push(Route::Login {
                error: Some(message.clone()),
            });
            return;
        }
        self.0.set(Some(ErrorInfo::from_server_error(err)));
    }

    pub fn clear(&mut self) {
        self.0.set(None);
    }
}

/// Get the global error state for setting/clearing errors
pub fn use_error() -> ErrorState {
    use_context::<ErrorState>()
}

/// A one-shot message carried from one page to the next.
#[derive(Clone, Copy)]
pub struct Flash(Signal<Option<String>>);

impl Flash {
    pub fn set(&mut self, message: impl Into<String>) {
        self.0.set(Some(message.into()));
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.write().take()
    }
}

pub fn use_flash() -> Flash {
    use_context::<Flash>()
}

/// The signed-in user, available to every page inside a dashboard layout.
pub fn use_session() -> SessionInfo {
    use_context::<SessionInfo>()
}

const OWN_CRATES: [&str; 5] = ["api::", "server::", "types::", "ui::", "web::"];

/// Filter backtrace to only show lines from this workspace
fn filter_backtrace(backtrace: &str) -> String {
    backtrace
        .lines()
        .filter(|line| OWN_CRATES.iter().any(|name| line.contains(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[component]
fn ErrorBanner() -> Element {
    let mut error_state = use_error();
    let error = error_state.0.read();

    let Some(err) = error.as_ref() else {
        return rsx! {};
    };

    let has_chain = err.chain.len() > 1;
    let filtered_backtrace = err
        .backtrace
        .as_deref()
        .map(filter_backtrace)
        .filter(|bt| !bt.is_empty());

    rsx! {
        div { class: "error-banner",
            div { class: "error-banner-content",
                div { class: "error-banner-header",
                    span { class: "error-banner-message", "{err.message}" }
                    div { class: "error-banner-actions",
                        button {
                            class: "error-banner-close",
                            onclick: move |_| error_state.clear(),
                            "×"
                        }
                    }
                }
                if has_chain || filtered_backtrace.is_some() {
                    div { class: "error-details",
                        if has_chain {
                            div { class: "error-chain",
                                h4 { class: "error-section-title", "Error Chain" }
                                ol { class: "error-chain-list",
                                    for (i, msg) in err.chain.iter().enumerate() {
                                        li {
                                            key: "{i}",
                                            class: "error-chain-item",
                                            "{msg}"
                                        }
                                    }
                                }
                            }
                        }
                        if let Some(backtrace) = &filtered_backtrace {
                            div { class: "error-backtrace",
                                h4 { class: "error-section-title", "Backtrace" }
                                pre { class: "error-backtrace-content", "{backtrace}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AdminLayout() -> Element {
    rsx! {
        DashboardLayout { role: Role::Admin }
    }
}

#[component]
fn AgentLayout() -> Element {
    rsx! {
        DashboardLayout { role: Role::Agent }
    }
}

/// Only renders its pages for a signed-in user holding `role`.
#[component]
fn DashboardLayout(role: Role) -> Element {
    let user = use_server_future(api::get_current_user)?;

    match &*user.read() {
        Some(Ok(Some(session))) if session.role == role => {
            rsx! {
                DashboardShell { session: session.clone() }
            }
        }
        Some(Ok(Some(session))) => {
            navigator().replace(Route::Login {
                error: Some(format!(
                    "You are signed in as {}. Sign in with an {} account to continue.",
                    session.role, role
                )),
            });
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            navigator().replace(Route::login());
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        None => {
            rsx! {
                div { class: "loading", "Loading..." }
            }
        }
    }
}

#[component]
fn DashboardShell(session: SessionInfo) -> Element {
    use_context_provider(|| ErrorState(Signal::new(None)));
    use_context_provider(|| Flash(Signal::new(None)));
    use_context_provider(|| session.clone());

    let initial = session.initial();

    rsx! {
        div { class: "app-layout",
            aside { class: "sidebar",
                div { class: "sidebar-header",
                    span { class: "sidebar-logo", "LendIt" }
                }
                nav { class: "sidebar-nav",
                    {
                        match session.role {
                            Role::Admin => rsx! {
                                NavLink { to: Route::AdminOverview {}, "Overview" }
                                NavLink { to: Route::ManageUsers {}, "Manage Users" }
                            },
                            Role::Agent => rsx! {
                                NavLink { to: Route::AgentOverview {}, "Overview" }
                                NavLink { to: Route::AgentLoans {}, "My Loans" }
                            },
                        }
                    }
                }
                div { class: "sidebar-footer",
                    div { class: "sidebar-user",
                        div { class: "sidebar-avatar", "{initial}" }
                        div { class: "sidebar-user-info",
                            div { class: "sidebar-user-name", "{session.email}" }
                            div { class: "sidebar-user-role", "{session.role.dashboard_title()}" }
                        }
                    }
                    a { href: "/auth/logout", rel: "external", class: "sidebar-logout", "Sign out" }
                }
            }
            main { class: "main-content",
                ErrorBanner {}
                Outlet::<Route> {}
            }
        }
    }
}
