//! Login gate: who may enter, and with which privilege.
//!
//! One administrator with a fixed shared secret. Any other email on the
//! allow-list is admitted as a member; member passwords are not checked.

use thiserror::Error;

use crate::config::Config;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@admin.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

/// The logged-in user. Every per-user record is scoped by `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password, or email not authorized by the administrator.")]
    NotAuthorized,

    #[error("Only the administrator can manage authorized emails.")]
    AdminRequired,

    #[error("Email is required.")]
    MissingEmail,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Outcome of adding an email to the whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistChange {
    Added,
    AlreadyListed,
}

pub trait CredentialVerifier {
    fn verify(&self, email: &str, password: &str, whitelist: &[String]) -> Result<Identity, AuthError>;
}

pub struct AdminWhitelistVerifier {
    admin_email: String,
    admin_password: String,
}

impl AdminWhitelistVerifier {
    pub fn new(admin_email: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.admin_email.clone(), config.admin_password.clone())
    }
}

impl Default for AdminWhitelistVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
    }
}

impl CredentialVerifier for AdminWhitelistVerifier {
    fn verify(&self, email: &str, password: &str, whitelist: &[String]) -> Result<Identity, AuthError> {
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }

        if email == self.admin_email && password == self.admin_password {
            return Ok(Identity {
                email: email.to_string(),
                role: Role::Admin,
            });
        }

        // Members are not asked for a valid password.
        if whitelist.iter().any(|allowed| allowed == email) {
            return Ok(Identity {
                email: email.to_string(),
                role: Role::Member,
            });
        }

        Err(AuthError::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_needs_the_shared_secret() {
        let verifier = AdminWhitelistVerifier::default();
        let identity = verifier.verify("admin@admin.com", "123456", &[]).unwrap();
        assert!(identity.is_admin());

        assert!(matches!(
            verifier.verify("admin@admin.com", "wrong", &[]),
            Err(AuthError::NotAuthorized)
        ));
    }

    #[test]
    fn members_are_admitted_by_whitelist_only() {
        let verifier = AdminWhitelistVerifier::default();
        let whitelist = vec!["maria@example.com".to_string()];

        let identity = verifier.verify("maria@example.com", "anything", &whitelist).unwrap();
        assert_eq!(identity.role, Role::Member);

        assert!(matches!(
            verifier.verify("jose@example.com", "anything", &whitelist),
            Err(AuthError::NotAuthorized)
        ));
        assert!(matches!(verifier.verify("", "", &whitelist), Err(AuthError::MissingEmail)));
    }

    #[test]
    fn configured_admin_replaces_default() {
        let verifier = AdminWhitelistVerifier::new("dono@marcenaria.com", "segredo");
        assert!(verifier.verify("dono@marcenaria.com", "segredo", &[]).unwrap().is_admin());
        assert!(verifier.verify("admin@admin.com", "123456", &[]).is_err());
    }
}
