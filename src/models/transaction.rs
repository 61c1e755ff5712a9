use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Category;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub(crate) id: String,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) description: String,
    pub(crate) category: Option<Category>,
}

impl Transaction {
    /// Build a transaction with a freshly generated id.
    pub(crate) fn new(
        amount: Decimal,
        date: NaiveDate,
        description: String,
        category: Option<Category>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            date,
            description,
            category,
        }
    }

    /// The category used for grouping. Missing categories count as `Other`
    /// at aggregation time only; the stored record keeps `None`.
    pub(crate) fn category_or_other(&self) -> Category {
        self.category.unwrap_or(Category::Other)
    }

    /// First eight characters of the id, enough to address a row by hand.
    pub(crate) fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}
