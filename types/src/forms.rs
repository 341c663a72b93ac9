//! Validation for the dashboard forms, run in the browser before anything
//! is sent.

use std::fmt;

use jiff::civil::Date;

use crate::{LoanDraft, NewUser, PaymentFrequency, RepaymentMethod, Role};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    Required(&'static str),
    NotANumber(&'static str),
    NotPositive(&'static str),
    Negative(&'static str),
    ExceedsBalance { balance: f64 },
    AlreadyRepaid,
    MissingFrequency,
    InvalidDate(String),
    InvalidEmail,
    PasswordTooShort,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Required(field) => write!(f, "{field} is required."),
            FormError::NotANumber(field) => write!(f, "{field} must be a number."),
            FormError::NotPositive(field) => write!(f, "{field} must be greater than zero."),
            FormError::Negative(field) => write!(f, "{field} cannot be negative."),
            FormError::ExceedsBalance { balance } => write!(
                f,
                "Payment exceeds remaining balance of {}.",
                crate::rupees(*balance)
            ),
            FormError::AlreadyRepaid => write!(f, "Loan is already fully repaid."),
            FormError::MissingFrequency => {
                write!(f, "Choose a payment frequency for interest repayment.")
            }
            FormError::InvalidDate(value) => write!(f, "'{value}' is not a valid date."),
            FormError::InvalidEmail => write!(f, "Enter a valid email address."),
            FormError::PasswordTooShort => write!(
                f,
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ),
        }
    }
}

fn parse_number(input: &str, field: &'static str) -> Result<f64, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormError::Required(field));
    }
    match input.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(FormError::NotANumber(field)),
    }
}

/// Check a payment amount typed into the record-payment dialog.
pub fn parse_payment_amount(input: &str, remaining: Option<f64>) -> Result<f64, FormError> {
    let amount = parse_number(input, "Payment amount")?;
    if amount <= 0.0 {
        return Err(FormError::NotPositive("Payment amount"));
    }
    match remaining {
        Some(balance) if balance <= 0.0 => Err(FormError::AlreadyRepaid),
        Some(balance) if amount > balance => Err(FormError::ExceedsBalance { balance }),
        _ => Ok(amount),
    }
}

/// Raw input of the issue-loan form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanForm {
    pub borrower_name: String,
    pub borrower_contact: String,
    pub amount: String,
    pub interest_rate: String,
    pub repayment_method: RepaymentMethod,
    pub payment_frequency: Option<PaymentFrequency>,
    pub loan_date: String,
}

impl LoanForm {
    pub fn validate(&self) -> Result<LoanDraft, FormError> {
        let borrower_name = self.borrower_name.trim();
        if borrower_name.is_empty() {
            return Err(FormError::Required("Borrower name"));
        }

        let amount = parse_number(&self.amount, "Loan amount")?;
        if amount <= 0.0 {
            return Err(FormError::NotPositive("Loan amount"));
        }

        let interest_rate = parse_number(&self.interest_rate, "Interest rate")?;
        if interest_rate < 0.0 {
            return Err(FormError::Negative("Interest rate"));
        }

        let payment_frequency = match self.repayment_method {
            RepaymentMethod::Full => None,
            RepaymentMethod::Interest => {
                Some(self.payment_frequency.ok_or(FormError::MissingFrequency)?)
            }
        };

        let loan_date = match self.loan_date.trim() {
            "" => None,
            s => Some(
                s.parse::<Date>()
                    .map_err(|_| FormError::InvalidDate(s.to_string()))?,
            ),
        };

        let contact = self.borrower_contact.trim();

        Ok(LoanDraft {
            borrower_name: borrower_name.to_string(),
            borrower_contact: (!contact.is_empty()).then(|| contact.to_string()),
            amount,
            interest_rate,
            repayment_method: self.repayment_method,
            payment_frequency,
            loan_date,
        })
    }
}

/// Raw input of the create-user form.
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Agent,
        }
    }
}

impl UserForm {
    pub fn validate(&self) -> Result<NewUser, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Required("Name"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::Required("Email"));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(FormError::InvalidEmail),
        }

        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }

        Ok(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            role: self.role,
        })
    }
}
