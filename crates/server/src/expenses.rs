//! Expense API endpoints

use api_types::expense::{Expense as ExpenseView, ExpenseDeleted, ExpenseNew};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title,
        amount: expense.amount,
        date: expense.date,
        category: expense.category,
        created_at: expense.created_at,
    }
}

/// Handle requests for the full expense list.
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.list_expenses().await?;
    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

/// Handle expense creation.
///
/// Absent wire fields reach the engine as empty values so the validation
/// layer reports them uniformly as missing.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let candidate = engine::NewExpense {
        title: payload.title.unwrap_or_default(),
        amount: payload.amount.unwrap_or(0),
        date: payload.date.unwrap_or_default(),
        category: payload.category.unwrap_or_default(),
        created_at: payload.created_at,
    };

    let created = state.engine.create_expense(candidate).await?;
    Ok((StatusCode::CREATED, Json(map_expense(created))))
}

/// Handle expense deletion.
///
/// An unknown id still acknowledges success; the deletion primitive does
/// not distinguish "not found" from "deleted".
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    state.engine.delete_expense(id).await?;
    Ok(Json(ExpenseDeleted { success: true }))
}
