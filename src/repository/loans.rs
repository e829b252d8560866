//! Loans repository for database operations.
//!
//! Every loan mutation and its stock movement happen in one transaction: the
//! loan row is locked first so concurrent transitions on the same loan
//! serialize, and reservations use a guarded decrement so concurrent
//! checkouts of the same item cannot drive stock negative.

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanStatus},
    stock::{self, StockAdjustment},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// List loans, optionally filtered by exact borrower name (case-insensitive)
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Loan>> {
        let loans = match search {
            Some(name) => {
                sqlx::query_as::<_, Loan>(
                    "SELECT * FROM loans WHERE LOWER(borrower_name) = LOWER($1) ORDER BY id",
                )
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(loans)
    }

    /// Create a new loan, reserving stock when it starts out borrowed
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        // Lock the item row so the existence check and the reservation see
        // the same state.
        let item_id: Option<i32> =
            sqlx::query_scalar("SELECT id FROM items WHERE id = $1 FOR UPDATE")
                .bind(loan.item_id)
                .fetch_optional(&mut *tx)
                .await?;

        if item_id.is_none() {
            return Err(AppError::NotFound(format!(
                "Item with id {} not found",
                loan.item_id
            )));
        }

        let adjustment = stock::on_checkout(loan.status, loan.quantity);
        Self::apply_adjustment(&mut tx, loan.item_id, adjustment).await?;

        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (item_id, borrower_name, borrower_email, borrower_phone, quantity, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(loan.item_id)
        .bind(&loan.borrower_name)
        .bind(&loan.borrower_email)
        .bind(&loan.borrower_phone)
        .bind(loan.quantity)
        .bind(loan.status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Change a loan's status, moving stock for the transition
    pub async fn update_status(&self, id: i32, status: LoanStatus) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = Self::lock_loan(&mut tx, id).await?;

        let adjustment = stock::on_transition(loan.status, status, loan.quantity);
        Self::apply_adjustment(&mut tx, loan.item_id, adjustment).await?;

        let updated = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Change a borrowed loan's quantity, moving the difference
    pub async fn update_quantity(&self, id: i32, quantity: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = Self::lock_loan(&mut tx, id).await?;

        if loan.status != LoanStatus::Borrowed {
            return Err(AppError::BadRequest(
                "Only borrowed loans can have their quantity changed".to_string(),
            ));
        }

        if quantity == loan.quantity {
            // Nothing to reconcile
            return Ok(loan);
        }

        let adjustment = stock::on_amendment(loan.quantity, quantity);
        Self::apply_adjustment(&mut tx, loan.item_id, adjustment).await?;

        let updated = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET quantity = $1 WHERE id = $2 RETURNING *",
        )
        .bind(quantity)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a loan, releasing its units when it is still borrowed
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let loan = Self::lock_loan(&mut tx, id).await?;

        let adjustment = stock::on_removal(loan.status, loan.quantity);
        Self::apply_adjustment(&mut tx, loan.item_id, adjustment).await?;

        sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Count outstanding loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = $1")
            .bind(LoanStatus::Borrowed)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count returned loans
    pub async fn count_returned(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = $1")
            .bind(LoanStatus::Returned)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Fetch a loan inside the transaction with a row lock
    async fn lock_loan(tx: &mut Transaction<'_, Postgres>, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Apply a stock adjustment to an item inside the transaction.
    ///
    /// Reservations are guarded by `stock >= n` in the UPDATE itself, so an
    /// oversell loses the race at the database rather than after a stale read.
    async fn apply_adjustment(
        tx: &mut Transaction<'_, Postgres>,
        item_id: i32,
        adjustment: StockAdjustment,
    ) -> AppResult<()> {
        match adjustment {
            StockAdjustment::Unchanged => Ok(()),
            StockAdjustment::Release(n) => {
                let result = sqlx::query("UPDATE items SET stock = stock + $1 WHERE id = $2")
                    .bind(n)
                    .bind(item_id)
                    .execute(&mut **tx)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound(format!(
                        "Item with id {} not found",
                        item_id
                    )));
                }
                Ok(())
            }
            StockAdjustment::Reserve(n) => {
                let result = sqlx::query(
                    "UPDATE items SET stock = stock - $1 WHERE id = $2 AND stock >= $1",
                )
                .bind(n)
                .bind(item_id)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    let available: Option<i32> =
                        sqlx::query_scalar("SELECT stock FROM items WHERE id = $1")
                            .bind(item_id)
                            .fetch_optional(&mut **tx)
                            .await?;

                    return match available {
                        Some(available) => Err(AppError::InsufficientStock {
                            requested: n,
                            available,
                        }),
                        None => Err(AppError::NotFound(format!(
                            "Item with id {} not found",
                            item_id
                        ))),
                    };
                }
                Ok(())
            }
        }
    }
}
