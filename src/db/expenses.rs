use anyhow::Result;
use tracing::info;

use super::{Database, Store, keys};
use crate::models::{Expense, new_id};

impl<S: Store> Database<S> {
    /// Expenses of one user, most recent date first.
    pub async fn load_expenses(&self, owner_email: &str) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self.list_owned(keys::EXPENSES, owner_email).await?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    pub async fn create_expense(&self, mut expense: Expense) -> Result<Expense> {
        expense.id = new_id();
        self.append(keys::EXPENSES, expense.clone()).await?;
        info!(id = %expense.id, amount = expense.amount, "expense recorded");

        Ok(expense)
    }

    pub async fn delete_expense(&self, owner_email: &str, id: &str) -> Result<bool> {
        self.delete_owned::<Expense>(keys::EXPENSES, owner_email, id).await
    }
}
