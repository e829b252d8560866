//! Loan management service.
//!
//! The stock effects of each operation are defined in [`crate::stock`] and
//! applied transactionally by the loans repository.

use validator::Validate;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List loans, optionally filtered by exact borrower name
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Loan>> {
        self.repository.loans.list(search).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.get_by_id(id).await
    }

    /// Create a new loan (checkout)
    pub async fn create(&self, loan: CreateLoan) -> AppResult<Loan> {
        loan.validate()?;
        self.repository.loans.create(&loan).await
    }

    /// Transition a loan between borrowed and returned
    pub async fn update_status(&self, id: i32, status: LoanStatus) -> AppResult<Loan> {
        self.repository.loans.update_status(id, status).await
    }

    /// Amend the quantity of a borrowed loan
    pub async fn update_quantity(&self, id: i32, quantity: i32) -> AppResult<Loan> {
        self.repository.loans.update_quantity(id, quantity).await
    }

    /// Delete a loan record
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.loans.delete(id).await
    }
}
