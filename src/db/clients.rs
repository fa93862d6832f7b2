use anyhow::Result;
use tracing::info;

use super::{Database, Store, keys};
use crate::models::{Client, new_id};

impl<S: Store> Database<S> {
    /// Clients of one user, newest registration first.
    pub async fn load_clients(&self, owner_email: &str) -> Result<Vec<Client>> {
        let mut clients: Vec<Client> = self.list_owned(keys::CLIENTS, owner_email).await?;
        clients.sort_by(|a, b| b.registered_on.cmp(&a.registered_on));
        Ok(clients)
    }

    pub async fn create_client(&self, mut client: Client) -> Result<Client> {
        client.id = new_id();
        self.append(keys::CLIENTS, client.clone()).await?;
        info!(id = %client.id, "client created");

        Ok(client)
    }

    /// Overwrite a client's details. The registration date never changes.
    pub async fn update_client(&self, client: &Client) -> Result<Option<Client>> {
        self.update_owned(keys::CLIENTS, &client.owner_email, &client.id, |stored: &mut Client| {
            stored.name = client.name.clone();
            stored.email = client.email.clone();
            stored.phone = client.phone.clone();
            stored.address = client.address.clone();
            stored.status = client.status;
            stored.notes = client.notes.clone();
        })
        .await
    }

    pub async fn delete_client(&self, owner_email: &str, id: &str) -> Result<bool> {
        self.delete_owned::<Client>(keys::CLIENTS, owner_email, id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::db::memory_db;
    use crate::models::{Client, ClientStatus};

    const OWNER: &str = "marceneiro@example.com";

    fn client(name: &str, registered_on: NaiveDate) -> Client {
        Client {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            registered_on,
            ..Client::blank(OWNER)
        }
    }

    #[tokio::test]
    async fn clients_are_listed_newest_first() {
        let db = memory_db();
        db.create_client(client("Ana", NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()))
            .await
            .unwrap();
        db.create_client(client("Bruno", NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()))
            .await
            .unwrap();

        let names: Vec<String> = db
            .load_clients(OWNER)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Bruno", "Ana"]);
    }

    #[tokio::test]
    async fn update_keeps_registration_date() {
        let db = memory_db();
        let registered_on = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let created = db.create_client(client("Ana", registered_on)).await.unwrap();

        let mut edited = created.clone();
        edited.status = ClientStatus::Active;
        edited.registered_on = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let updated = db.update_client(&edited).await.unwrap().unwrap();

        assert_eq!(updated.status, ClientStatus::Active);
        assert_eq!(updated.registered_on, registered_on);
    }

    #[tokio::test]
    async fn deleting_an_unknown_client_is_a_no_op() {
        let db = memory_db();
        db.create_client(client("Ana", NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()))
            .await
            .unwrap();

        assert!(!db.delete_client(OWNER, "missing").await.unwrap());
        assert_eq!(db.load_clients(OWNER).await.unwrap().len(), 1);
    }
}
