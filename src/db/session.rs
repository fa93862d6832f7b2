use anyhow::Result;
use tracing::{info, warn};

use super::{Database, Store, Stored, keys};
use crate::auth::{AuthError, CredentialVerifier, Identity, Role, WhitelistChange};

impl<S: Store> Database<S> {
    /// Check credentials and persist the session flags on success.
    pub async fn login(
        &self,
        verifier: &impl CredentialVerifier,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let whitelist = self.load_whitelist().await?;
        let identity = match verifier.verify(email.trim(), password, &whitelist) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(email = email.trim(), "login refused");
                return Err(err);
            }
        };

        self.save_record(keys::AUTHENTICATED, &true).await?;
        self.save_record(keys::CURRENT_USER_EMAIL, &identity.email).await?;
        self.save_record(keys::IS_ADMIN, &identity.is_admin()).await?;
        info!(email = %identity.email, admin = identity.is_admin(), "logged in");

        Ok(identity)
    }

    pub async fn logout(&self) -> Result<()> {
        self.store.remove(keys::AUTHENTICATED).await?;
        self.store.remove(keys::CURRENT_USER_EMAIL).await?;
        self.store.remove(keys::IS_ADMIN).await?;
        info!("logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        self.load_record(keys::AUTHENTICATED).await
    }

    pub async fn current_user_email(&self) -> Result<Option<String>> {
        let email: String = self.load_record(keys::CURRENT_USER_EMAIL).await?;
        Ok(Some(email).filter(|e| !e.is_empty()))
    }

    /// The persisted session, if any. Screens fall back to login when this is `None`.
    pub async fn current_identity(&self) -> Result<Option<Identity>> {
        if !self.is_authenticated().await? {
            return Ok(None);
        }
        let Some(email) = self.current_user_email().await? else {
            return Ok(None);
        };

        let is_admin: bool = self.load_record(keys::IS_ADMIN).await?;
        let role = if is_admin { Role::Admin } else { Role::Member };

        Ok(Some(Identity { email, role }))
    }

    pub async fn load_whitelist(&self) -> Result<Vec<String>> {
        self.load_collection(keys::WHITELIST).await
    }

    pub async fn add_to_whitelist(&self, actor: &Identity, email: &str) -> Result<WhitelistChange, AuthError> {
        if !actor.is_admin() {
            return Err(AuthError::AdminRequired);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }

        let mut whitelist: Vec<Stored<String>> = self.load_for_write(keys::WHITELIST).await?;
        if whitelist.iter().any(|e| e.decoded().is_some_and(|e| e == email)) {
            return Ok(WhitelistChange::AlreadyListed);
        }

        whitelist.push(Stored::Decoded(email.to_string()));
        self.save_collection(keys::WHITELIST, &whitelist).await?;
        info!(email, "email authorized");

        Ok(WhitelistChange::Added)
    }

    pub async fn remove_from_whitelist(&self, actor: &Identity, email: &str) -> Result<(), AuthError> {
        if !actor.is_admin() {
            return Err(AuthError::AdminRequired);
        }

        let mut whitelist: Vec<Stored<String>> = self.load_for_write(keys::WHITELIST).await?;
        let before = whitelist.len();
        whitelist.retain(|e| !e.decoded().is_some_and(|e| e == email));
        if whitelist.len() != before {
            self.save_collection(keys::WHITELIST, &whitelist).await?;
            info!(email, "email removed from whitelist");
        }

        Ok(())
    }
}
