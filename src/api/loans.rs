//! Loan lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanQuery, UpdateLoanQuantity, UpdateLoanStatus},
};

use super::AuthenticatedUser;

/// List loans, optionally filtered by exact borrower name
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "List of loans", body = Vec<Loan>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    // An empty search means no filter, not "match the empty name"
    let search = query.search.as_deref().filter(|s| !s.is_empty());
    let loans = state.services.loans.list(search).await?;
    Ok(Json(loans))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = Loan),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.get_by_id(id).await?;
    Ok(Json(loan))
}

/// Create a new loan (checkout)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Invalid input or insufficient stock"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(loan): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let created = state.services.loans.create(loan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a loan's status (borrowed/returned)
#[utoipa::path(
    put,
    path = "/loans/{id}/status",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoanStatus,
    responses(
        (status = 200, description = "Status updated", body = Loan),
        (status = 400, description = "Insufficient stock"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn update_loan_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLoanStatus>,
) -> AppResult<Json<Loan>> {
    claims.require_admin()?;

    let updated = state.services.loans.update_status(id, request.status).await?;
    Ok(Json(updated))
}

/// Update a borrowed loan's quantity
#[utoipa::path(
    put,
    path = "/loans/{id}/quantity",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoanQuantity,
    responses(
        (status = 200, description = "Quantity updated", body = Loan),
        (status = 400, description = "Invalid quantity, insufficient stock, or loan not in borrowed status"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn update_loan_quantity(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLoanQuantity>,
) -> AppResult<Json<Loan>> {
    claims.require_admin()?;
    request.validate()?;

    let updated = state
        .services
        .loans
        .update_quantity(id, request.quantity)
        .await?;
    Ok(Json(updated))
}

/// Delete a loan
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.loans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
