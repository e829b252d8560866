//! Loan (checkout/return) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle status of a loan.
///
/// Only these two values exist; a loan with any other status string in a
/// request is rejected at deserialization, so stock reserved for a loan can
/// never be stranded behind an unknown status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Borrowed,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Borrowed => "borrowed",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "borrowed" => Ok(LoanStatus::Borrowed),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as a string column)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub item_id: i32,
    pub borrower_name: String,
    pub borrower_email: Option<String>,
    pub borrower_phone: Option<String>,
    pub quantity: i32,
    pub status: LoanStatus,
    pub loan_date: DateTime<Utc>,
}

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    pub item_id: i32,
    #[validate(length(min = 1, message = "Borrower name is required"))]
    pub borrower_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub borrower_email: Option<String>,
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub borrower_phone: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub status: LoanStatus,
}

/// Update loan status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoanStatus {
    pub status: LoanStatus,
}

/// Update loan quantity request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLoanQuantity {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Loan list query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LoanQuery {
    /// Exact borrower name to filter on (case-insensitive)
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("borrowed".parse::<LoanStatus>(), Ok(LoanStatus::Borrowed));
        assert_eq!("Returned".parse::<LoanStatus>(), Ok(LoanStatus::Returned));
        assert_eq!(LoanStatus::Borrowed.as_str(), "borrowed");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("lost".parse::<LoanStatus>().is_err());
        assert!(serde_json::from_str::<LoanStatus>("\"pending\"").is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LoanStatus::Returned).unwrap(),
            "\"returned\""
        );
    }
}
