use serde::{Deserialize, Serialize};

use crate::{Loan, LoanStatus};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZES: [u32; 3] = [5, 10, 25];

/// Which page of the loans list to fetch, and how to filter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuery {
    pub page: u32,
    pub per_page: u32,
    pub status: Option<LoanStatus>,
}

impl Default for LoanQuery {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PAGE_SIZE,
            status: None,
        }
    }
}

impl LoanQuery {
    pub fn skip(&self) -> u64 {
        u64::from(self.page) * u64::from(self.per_page)
    }

    /// Query string for `GET /loans`. Paging is never delegated, since
    /// `apply` slices the reply and would otherwise skip rows twice.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.status
            .map(|status| ("status", status.as_str().to_string()))
            .into_iter()
            .collect()
    }

    /// Changing the filter starts over from the first page.
    pub fn with_status(self, status: Option<LoanStatus>) -> Self {
        Self {
            page: 0,
            status,
            ..self
        }
    }

    /// Changing the page size starts over from the first page.
    pub fn with_per_page(self, per_page: u32) -> Self {
        Self {
            page: 0,
            per_page: per_page.max(1),
            ..self
        }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    pub fn prev(self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self
        }
    }

    /// Cut this query's page out of the full loan list.
    ///
    /// Some deployments of the lending API ignore `status`, so the filter is
    /// applied again here before paging.
    pub fn apply(&self, rows: Vec<Loan>) -> LoanPage {
        let rows: Vec<Loan> = match self.status {
            Some(status) => rows.into_iter().filter(|l| l.status == status).collect(),
            None => rows,
        };
        let total = rows.len();

        let loans = rows
            .into_iter()
            .skip(usize::try_from(self.skip()).unwrap_or(usize::MAX))
            .take(self.per_page as usize)
            .collect();

        LoanPage { loans, total }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}

/// One page of loans plus how many matched the filter in all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanPage {
    pub loans: Vec<Loan>,
    pub total: usize,
}

impl LoanPage {
    pub fn has_next(&self, query: &LoanQuery) -> bool {
        query.skip() + (self.loans.len() as u64) < self.total as u64
    }

    pub fn range_label(&self, query: &LoanQuery) -> String {
        if self.loans.is_empty() {
            return "No rows".to_string();
        }
        let from = query.skip() + 1;
        let to = query.skip() + self.loans.len() as u64;
        format!("{from}-{to} of {}", self.total)
    }
}
