use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::dates::today;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExpenseType {
    /// Day rate paid to a helper.
    #[default]
    #[serde(rename = "ajudante")]
    HelperLabor,
    #[serde(rename = "transporte")]
    Transport,
    #[serde(rename = "alimentacao")]
    Food,
    #[serde(rename = "outros")]
    Other,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 4] = [
        ExpenseType::HelperLabor,
        ExpenseType::Transport,
        ExpenseType::Food,
        ExpenseType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseType::HelperLabor => "Helper day rate",
            ExpenseType::Transport => "Transport",
            ExpenseType::Food => "Food",
            ExpenseType::Other => "Other costs",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ExpenseType::HelperLabor => ExpenseType::Transport,
            ExpenseType::Transport => ExpenseType::Food,
            ExpenseType::Food => ExpenseType::Other,
            ExpenseType::Other => ExpenseType::HelperLabor,
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(default = "today")]
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: ExpenseType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub owner_email: String,
}

/// Reporting window, always relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
    All,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Day => "Today",
            Period::Week => "This week",
            Period::Month => "This month",
            Period::All => "All time",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Period::Day => Period::Week,
            Period::Week => Period::Month,
            Period::Month => Period::All,
            Period::All => Period::Day,
        }
    }

    fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::Day => date == today,
            // Weeks start on Sunday.
            Period::Week => {
                let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                date >= start
            }
            Period::Month => date >= today.with_day(1).unwrap_or(today),
            Period::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpenseFilter {
    pub period: Period,
    /// `None` keeps every type.
    pub kind: Option<ExpenseType>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense, today: NaiveDate) -> bool {
        self.kind.is_none_or(|kind| expense.kind == kind) && self.period.contains(expense.date, today)
    }

    pub fn apply<'a>(&self, expenses: &'a [Expense], today: NaiveDate) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e, today)).collect()
    }

    pub fn next_kind(&mut self) {
        self.kind = match self.kind {
            None => Some(ExpenseType::HelperLabor),
            Some(ExpenseType::Other) => None,
            Some(kind) => Some(kind.next()),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpenseTotals {
    pub helper_labor: f64,
    pub transport: f64,
    pub food: f64,
    pub other: f64,
    pub total: f64,
}

impl ExpenseTotals {
    pub fn from_expenses<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        let mut totals = Self::default();
        for expense in expenses {
            match expense.kind {
                ExpenseType::HelperLabor => totals.helper_labor += expense.amount,
                ExpenseType::Transport => totals.transport += expense.amount,
                ExpenseType::Food => totals.food += expense.amount,
                ExpenseType::Other => totals.other += expense.amount,
            }
            totals.total += expense.amount;
        }
        totals
    }

    pub fn for_type(&self, kind: ExpenseType) -> f64 {
        match kind {
            ExpenseType::HelperLabor => self.helper_labor,
            ExpenseType::Transport => self.transport,
            ExpenseType::Food => self.food,
            ExpenseType::Other => self.other,
        }
    }
}

impl Expense {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("Description"));
        }
        Ok(())
    }
}
