//! Records exchanged with the lending API.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, Role, err};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Completed,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 2] = [LoanStatus::Active, LoanStatus::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(LoanStatus::Active),
            "completed" => Ok(LoanStatus::Completed),
            other => Err(err!("unknown loan status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentMethod {
    /// One repayment of principal plus accrued interest.
    #[default]
    Full,
    /// Recurring interest payments.
    Interest,
}

impl RepaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RepaymentMethod::Full => "full",
            RepaymentMethod::Interest => "interest",
        }
    }
}

impl FromStr for RepaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(RepaymentMethod::Full),
            "interest" => Ok(RepaymentMethod::Interest),
            other => Err(err!("unknown repayment method '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Daily,
    Monthly,
}

impl PaymentFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Daily => "daily",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(PaymentFrequency::Daily),
            "monthly" => Ok(PaymentFrequency::Monthly),
            other => Err(err!("unknown payment frequency '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub borrower_id: i64,
    pub agent_id: i64,
    pub amount: f64,
    pub loan_date: Date,
    /// Monthly rate, in percent.
    pub interest_rate: f64,
    pub repayment_method: RepaymentMethod,
    #[serde(default)]
    pub payment_frequency: Option<PaymentFrequency>,
    pub status: LoanStatus,
    #[serde(default)]
    pub remaining_balance: Option<f64>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub borrower_name: Option<String>,
}

impl Loan {
    pub fn borrower_label(&self) -> String {
        self.borrower_name
            .clone()
            .unwrap_or_else(|| self.borrower_id.to_string())
    }

    pub fn agent_label(&self) -> String {
        self.agent_name
            .clone()
            .unwrap_or_else(|| self.agent_id.to_string())
    }

    pub fn repayment_label(&self) -> &'static str {
        match self.repayment_method {
            RepaymentMethod::Full => "full",
            RepaymentMethod::Interest => self
                .payment_frequency
                .map(PaymentFrequency::as_str)
                .unwrap_or("N/A"),
        }
    }

    pub fn remaining_label(&self) -> String {
        self.remaining_balance
            .map(rupees)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub loan_id: i64,
    pub amount_paid: f64,
    #[serde(default)]
    pub payment_date: Option<Date>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
}

/// One row of the outstanding-balance summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutstanding {
    pub agent_name: String,
    pub total_outstanding: f64,
}

/// A validated loan form, before the issuing agent is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDraft {
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    pub amount: f64,
    pub interest_rate: f64,
    pub repayment_method: RepaymentMethod,
    pub payment_frequency: Option<PaymentFrequency>,
    pub loan_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueLoan {
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    pub amount: f64,
    pub interest_rate: f64,
    pub repayment_method: RepaymentMethod,
    pub payment_frequency: Option<PaymentFrequency>,
    pub agent_id: i64,
    pub loan_date: Option<Date>,
}

impl IssueLoan {
    pub fn new(draft: LoanDraft, agent_id: i64) -> Self {
        Self {
            borrower_name: draft.borrower_name,
            borrower_contact: draft.borrower_contact,
            amount: draft.amount,
            interest_rate: draft.interest_rate,
            repayment_method: draft.repayment_method,
            payment_frequency: draft.payment_frequency,
            agent_id,
            loan_date: draft.loan_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanIssued {
    #[serde(default)]
    pub message: Option<String>,
    pub loan_id: i64,
    pub borrower_id: i64,
    pub agent_id: i64,
    pub amount: f64,
    pub status: LoanStatus,
}

impl LoanIssued {
    /// What to tell the agent once the loan is on the book.
    pub fn notice(&self) -> String {
        let message = self
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or("Loan issued successfully");
        format!("{message} (loan #{}, {}).", self.loan_id, rupees(self.amount))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub loan_id: i64,
    pub amount_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub message: String,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Format an amount the way the dashboards show money.
pub fn rupees(amount: f64) -> String {
    format!("₹ {amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loan(value: serde_json::Value) -> Loan {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_api_loan_and_labels_it() {
        let l = loan(json!({
            "id": 3,
            "borrower_id": 9,
            "agent_id": 2,
            "amount": 10000.0,
            "loan_date": "2025-01-15",
            "interest_rate": 2.5,
            "repayment_method": "interest",
            "payment_frequency": "monthly",
            "status": "active",
            "remaining_balance": 10250.0,
            "agent_name": "Meera",
            "borrower_name": null
        }));

        assert_eq!(l.loan_date, jiff::civil::date(2025, 1, 15));
        assert_eq!(l.borrower_label(), "9");
        assert_eq!(l.agent_label(), "Meera");
        assert_eq!(l.repayment_label(), "monthly");
        assert_eq!(l.remaining_label(), "₹ 10250.00");
    }

    #[test]
    fn interest_loan_without_frequency_is_na() {
        let l = loan(json!({
            "id": 1, "borrower_id": 1, "agent_id": 1, "amount": 5.0,
            "loan_date": "2024-12-01", "interest_rate": 1.0,
            "repayment_method": "interest", "status": "completed"
        }));
        assert_eq!(l.repayment_label(), "N/A");
        assert_eq!(l.remaining_label(), "N/A");
        assert_eq!(l.status, LoanStatus::Completed);
    }

    #[test]
    fn full_loan_ignores_frequency() {
        let l = loan(json!({
            "id": 1, "borrower_id": 1, "agent_id": 1, "amount": 5.0,
            "loan_date": "2024-12-01", "interest_rate": 1.0,
            "repayment_method": "full", "payment_frequency": "daily",
            "status": "active"
        }));
        assert_eq!(l.repayment_label(), "full");
    }

    #[test]
    fn issue_payload_matches_api_fields() {
        let draft = LoanDraft {
            borrower_name: "Kiran".into(),
            borrower_contact: None,
            amount: 2500.0,
            interest_rate: 3.0,
            repayment_method: RepaymentMethod::Full,
            payment_frequency: None,
            loan_date: Some(jiff::civil::date(2025, 3, 1)),
        };
        let value = serde_json::to_value(IssueLoan::new(draft, 7)).unwrap();
        assert_eq!(value["agent_id"], 7);
        assert_eq!(value["repayment_method"], "full");
        assert_eq!(value["payment_frequency"], serde_json::Value::Null);
        assert_eq!(value["loan_date"], "2025-03-01");
    }

    #[test]
    fn issued_notice_uses_api_message() {
        let issued: LoanIssued = serde_json::from_value(json!({
            "message": "Loan issued successfully",
            "loan_id": 12,
            "borrower_id": 4,
            "agent_id": 2,
            "amount": 5000.0,
            "status": "active"
        }))
        .unwrap();
        assert_eq!(issued.notice(), "Loan issued successfully (loan #12, ₹ 5000.00).");

        let silent = LoanIssued {
            message: None,
            ..issued
        };
        assert!(silent.notice().starts_with("Loan issued successfully (loan #12"));
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("Active".parse::<LoanStatus>().unwrap(), LoanStatus::Active);
        assert!("pending".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn rupee_formatting() {
        assert_eq!(rupees(0.0), "₹ 0.00");
        assert_eq!(rupees(1234.5), "₹ 1234.50");
    }
}
