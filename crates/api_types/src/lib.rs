use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod expense {
    use super::*;

    /// A persisted expense as it travels over the wire.
    ///
    /// Field names follow the JSON contract (`createdAt`), not Rust
    /// convention.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Expense {
        /// Store-assigned identifier (UUID, serialized as a string).
        pub id: Uuid,
        pub title: String,
        pub amount: i64,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: String,
        pub category: String,
        /// Epoch milliseconds.
        pub created_at: i64,
    }

    /// Request body for creating an expense.
    ///
    /// Every field is optional at the wire level so an incomplete body
    /// still reaches the validation layer and comes back as a 400 rather
    /// than a deserialization rejection.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ExpenseNew {
        pub title: Option<String>,
        pub amount: Option<i64>,
        pub date: Option<String>,
        pub category: Option<String>,
        /// Client-side creation instant; the server assigns one if absent.
        pub created_at: Option<i64>,
    }

    /// Acknowledgment body for a delete.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub success: bool,
    }
}
