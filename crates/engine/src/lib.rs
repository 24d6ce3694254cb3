use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

pub use error::EngineError;
pub use expenses::{Expense, NewExpense};

mod error;
mod expenses;
pub mod mascot;
pub mod stats;

type ResultEngine<T> = Result<T, EngineError>;

/// Storage facade for expense records.
///
/// Owns the database connection; every operation reads or writes the
/// `expenses` table directly. Nothing is cached between calls, so each
/// request observes whatever the store currently holds.
#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Returns all expenses, newest date first; same-day entries fall back
    /// to creation time, newest first.
    ///
    /// The `date` column is ISO `YYYY-MM-DD` text, so the lexicographic
    /// order the store applies is chronological order.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }

    /// Validates a candidate and persists it.
    ///
    /// The store assigns the identifier; `created_at` defaults to now when
    /// the candidate carries none. Returns the persisted record.
    pub async fn create_expense(&self, candidate: NewExpense) -> ResultEngine<Expense> {
        let expense = Expense::from_candidate(candidate, Utc::now().timestamp_millis())?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    /// Removes the expense with the given identifier.
    ///
    /// Deleting an id that is not present succeeds: the underlying delete
    /// only reports how many rows went away, and the caller cannot tell
    /// "already gone" from "just deleted".
    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
