pub mod categories;
pub mod client_wizard;
pub mod clients;
pub mod company_wizard;
pub mod components;
pub mod expense_wizard;
pub mod expenses;
pub mod home;
pub mod login;
pub mod material_wizard;
pub mod materials;
pub mod quote_wizard;
pub mod quotes;
pub mod whitelist;
