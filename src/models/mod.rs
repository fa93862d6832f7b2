mod category;
mod client;
mod company_profile;
pub mod dates;
mod expense;
mod material;
mod quote;

pub use category::Category;
pub use client::{Client, ClientStatus};
pub use company_profile::CompanyProfile;
pub use expense::{Expense, ExpenseFilter, ExpenseTotals, ExpenseType};
pub use material::{Material, Unit};
pub use quote::{Exclusion, Quote, QuoteDraft};

#[cfg(test)]
pub use expense::Period;
#[cfg(test)]
pub use quote::{Exclusions, QuoteLineItem, Totals};

/// A record that lives in a per-user collection of the store.
pub trait OwnedRecord {
    fn id(&self) -> &str;
    fn owner_email(&self) -> &str;
}

/// Fresh identifier for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

macro_rules! owned_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OwnedRecord for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn owner_email(&self) -> &str {
                    &self.owner_email
                }
            }
        )*
    };
}

owned_record!(Material, Category, Client, Expense, Quote);
