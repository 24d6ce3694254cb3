//! Expense record primitives.
//!
//! An `Expense` is a single dated spending entry. Records are immutable
//! once persisted; the only mutation the store supports is deletion.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A persisted expense entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    /// Whole NT$ units.
    pub amount: i64,
    /// Calendar date as `YYYY-MM-DD` text. The store keeps whatever text it
    /// was given; aggregation buckets unparseable values under the
    /// unknown-month sentinel.
    pub date: String,
    pub category: String,
    /// Epoch milliseconds. Tie-break sort key for same-day entries.
    pub created_at: i64,
}

/// A candidate expense, before the store assigns an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub title: String,
    pub amount: i64,
    pub date: String,
    pub category: String,
    /// Client-supplied creation instant; assigned by the store when absent.
    pub created_at: Option<i64>,
}

impl Expense {
    /// Validates a candidate and promotes it to a full record.
    ///
    /// Title, date and category must be non-blank and the amount positive.
    /// A zero amount reads as "not filled in", matching the required-field
    /// check on the other text fields.
    pub fn from_candidate(candidate: NewExpense, now_millis: i64) -> ResultEngine<Self> {
        if candidate.title.trim().is_empty() {
            return Err(EngineError::MissingField("title"));
        }
        if candidate.date.trim().is_empty() {
            return Err(EngineError::MissingField("date"));
        }
        if candidate.category.trim().is_empty() {
            return Err(EngineError::MissingField("category"));
        }
        if candidate.amount == 0 {
            return Err(EngineError::MissingField("amount"));
        }
        if candidate.amount < 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title: candidate.title,
            amount: candidate.amount,
            date: candidate.date,
            category: candidate.category,
            created_at: candidate.created_at.unwrap_or(now_millis),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub amount: i64,
    pub date: String,
    pub category: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            title: ActiveValue::Set(expense.title.clone()),
            amount: ActiveValue::Set(expense.amount),
            date: ActiveValue::Set(expense.date.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id =
            Uuid::parse_str(&model.id).map_err(|_| EngineError::InvalidId(model.id.clone()))?;
        Ok(Self {
            id,
            title: model.title,
            amount: model.amount,
            date: model.date,
            category: model.category,
            created_at: model.created_at,
        })
    }
}
