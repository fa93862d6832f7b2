use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{br_date, today};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
    #[default]
    #[serde(rename = "prospecto")]
    Prospect,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] = [ClientStatus::Active, ClientStatus::Inactive, ClientStatus::Prospect];

    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Active => "Active client",
            ClientStatus::Inactive => "Former client",
            ClientStatus::Prospect => "Prospect",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ClientStatus::Active => ClientStatus::Inactive,
            ClientStatus::Inactive => ClientStatus::Prospect,
            ClientStatus::Prospect => ClientStatus::Active,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(with = "br_date", default = "today")]
    pub registered_on: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub owner_email: String,
}

impl Client {
    pub fn blank(owner_email: &str) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            status: ClientStatus::Prospect,
            registered_on: today(),
            notes: String::new(),
            owner_email: owner_email.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("Name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("Email"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_email_are_required() {
        let mut client = Client::blank("marceneiro@example.com");
        assert_eq!(client.validate(), Err(ValidationError::MissingField("Name")));

        client.name = "Ana".to_string();
        assert_eq!(client.validate(), Err(ValidationError::MissingField("Email")));

        client.email = "ana@example.com".to_string();
        assert_eq!(client.validate(), Ok(()));
    }

    #[test]
    fn status_is_stored_by_label() {
        let json = r#"{"id":"1","name":"Ana","email":"ana@example.com","status":"inativo","registeredOn":"02/03/2024"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.status, ClientStatus::Inactive);
        assert_eq!(client.registered_on, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(client.notes, "");

        let stored = serde_json::to_string(&client).unwrap();
        assert!(stored.contains(r#""status":"inativo""#));
        assert!(stored.contains(r#""registeredOn":"02/03/2024""#));
    }
}
