use serde::{Deserialize, Serialize};

use crate::{Loan, LoanStatus};

/// Portfolio-wide numbers shown on the admin overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanMetrics {
    pub total_loans: usize,
    pub total_amount_lent: f64,
    pub active_loans: usize,
    pub completed_loans: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusShare {
    pub status: LoanStatus,
    pub count: usize,
    pub percent: f64,
}

impl LoanMetrics {
    pub fn from_loans(loans: &[Loan]) -> Self {
        let count = |status: LoanStatus| loans.iter().filter(|l| l.status == status).count();

        Self {
            total_loans: loans.len(),
            total_amount_lent: loans.iter().map(|l| l.amount).sum(),
            active_loans: count(LoanStatus::Active),
            completed_loans: count(LoanStatus::Completed),
        }
    }

    pub fn status_shares(&self) -> Vec<StatusShare> {
        let total = self.active_loans + self.completed_loans;

        LoanStatus::ALL
            .into_iter()
            .map(|status| {
                let count = match status {
                    LoanStatus::Active => self.active_loans,
                    LoanStatus::Completed => self.completed_loans,
                };
                let percent = if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                };
                StatusShare {
                    status,
                    count,
                    percent,
                }
            })
            .collect()
    }
}
