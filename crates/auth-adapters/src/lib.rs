//! # auth-adapters
//!
//! In-process implementation of the `IdentityProvider` port. Identities
//! live in their own store, deliberately separate from the document store:
//! the two systems share no transaction, which is why the account workflow
//! compensates instead of committing atomically.

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::NewIdentity;
use domains::traits::IdentityProvider;

/// A minted login identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub email_verified: bool,
}

/// Identity provider backed by an in-process concurrent map with a
/// unique-email index.
#[derive(Default)]
pub struct SimpleIdentityProvider {
    by_id: DashMap<String, Identity>,
    email_index: DashMap<String, String>,
}

impl SimpleIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an identity by login email (used by tests and tooling).
    pub fn find_by_email(&self, email: &str) -> Option<Identity> {
        let id = self.email_index.get(email)?;
        self.by_id.get(id.value()).map(|entry| entry.value().clone())
    }

    /// Verifies a password against the stored argon2 hash.
    pub fn verify_password(&self, email: &str, password: &str) -> bool {
        let Some(identity) = self.find_by_email(email) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(&identity.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[async_trait]
impl IdentityProvider for SimpleIdentityProvider {
    async fn create_identity(&self, identity: NewIdentity) -> Result<String> {
        // Hash before taking the email slot so the lock is never held
        // across the slow argon2 work.
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(identity.password.as_bytes(), &salt)
            .map_err(DomainError::dependency)?
            .to_string();
        let id = Uuid::new_v4().simple().to_string();

        // The entry claim is what makes the email unique under concurrent
        // creations; the loser of a race fails here with a conflict.
        match self.email_index.entry(identity.email.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::IdentityConflict(format!(
                    "email {} is already registered",
                    identity.email
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        self.by_id.insert(
            id.clone(),
            Identity {
                id: id.clone(),
                email: identity.email,
                password_hash,
                display_name: identity.display_name,
                email_verified: identity.email_verified,
            },
        );
        debug!(%id, "identity created");
        Ok(id)
    }

    async fn delete_identity(&self, id: &str) -> Result<()> {
        if let Some((_, identity)) = self.by_id.remove(id) {
            self.email_index.remove(&identity.email);
            debug!(%id, "identity deleted");
        }
        Ok(())
    }
}
