use anyhow::Result;
use tracing::info;

use super::{Database, Store, keys};
use crate::models::CompanyProfile;

impl<S: Store> Database<S> {
    /// The shop's letterhead. Shared by every user of the installation.
    pub async fn load_company_profile(&self) -> Result<CompanyProfile> {
        self.load_record(keys::COMPANY_PROFILE).await
    }

    pub async fn save_company_profile(&self, profile: &CompanyProfile) -> Result<()> {
        self.save_record(keys::COMPANY_PROFILE, profile).await?;
        info!(name = %profile.name, "company profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::memory_db;
    use crate::models::CompanyProfile;

    #[tokio::test]
    async fn missing_profile_loads_as_default() {
        let db = memory_db();
        assert_eq!(db.load_company_profile().await.unwrap(), CompanyProfile::default());
    }

    #[tokio::test]
    async fn profile_round_trips() {
        let db = memory_db();
        let profile = CompanyProfile {
            name: "Marcenaria Silva".to_string(),
            owner_name: "João Silva".to_string(),
            tax_id: "12.345.678/0001-90".to_string(),
            phone: "(11) 98765-4321".to_string(),
            logo: String::new(),
        };

        db.save_company_profile(&profile).await.unwrap();
        assert_eq!(db.load_company_profile().await.unwrap(), profile);
    }
}
