//! # Account Service
//!
//! Creates user accounts as a single logical unit across two systems that
//! share no transaction coordinator: the auth service owns the login
//! identity, the document store owns the user document. The identity is
//! minted first and compensated away if the document write fails, so either
//! both halves exist under one id or neither does.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::{error, info, warn};

use domains::error::{DomainError, Result};
use domains::models::{CollegeSnapshot, NewIdentity, ProgrammeSnapshot, User, UserRecord};
use domains::traits::{CampusRepo, IdentityProvider};

use crate::tokens::split_tokens;

/// Domain of login emails derived from registration numbers.
const EMAIL_DOMAIN: &str = "college.edu";

/// How initial login credentials are issued for admin-created accounts.
///
/// Fixed mode keeps parity with deployments that communicate one starter
/// password out of band; random mode issues a fresh token per account for
/// a forced-reset flow.
#[derive(Debug, Clone)]
pub enum CredentialPolicy {
    /// Every account starts with the same configured password.
    Fixed(String),
    /// Every account gets a fresh random alphanumeric token.
    RandomToken { length: usize },
}

impl CredentialPolicy {
    fn issue(&self) -> String {
        match self {
            Self::Fixed(password) => password.clone(),
            Self::RandomToken { length } => rand::rng()
                .sample_iter(&Alphanumeric)
                .take(*length)
                .map(char::from)
                .collect(),
        }
    }
}

/// Account-creation fields as submitted by the dashboard.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub full_name: String,
    pub reg_no: String,
    pub college_id: String,
    pub programme_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Comma-separated role list, e.g. `"staff, lecturer"`.
    pub roles: String,
    pub profile_pic_url: Option<String>,
}

/// Orchestrates user creation, listing, and removal across the document
/// store and the auth service.
#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn CampusRepo>,
    identities: Arc<dyn IdentityProvider>,
    credentials: Arc<CredentialPolicy>,
}

impl AccountService {
    pub fn new(
        repo: Arc<dyn CampusRepo>,
        identities: Arc<dyn IdentityProvider>,
        credentials: CredentialPolicy,
    ) -> Self {
        Self {
            repo,
            identities,
            credentials: Arc::new(credentials),
        }
    }

    /// Creates a user document and its login identity as one logical unit.
    ///
    /// The identity goes first: duplicate emails are the most likely
    /// failure, and the identity id becomes the document id. Two racing
    /// creations with the same registration number may both reach identity
    /// creation; one of them loses there with a conflict, which is the
    /// accepted outcome.
    pub async fn create_user(&self, input: NewUserInput) -> Result<String> {
        // 1. Resolve the college; a missing reference is terminal with no
        //    side effects.
        let college = self
            .repo
            .get_college(&input.college_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("college", input.college_id.clone()))?;

        // 2. Soft-resolve the programme: an absent programme is not an
        //    error, the snapshot just stays empty.
        let programme = match &input.programme_id {
            Some(programme_id) => self
                .repo
                .get_programme(&input.college_id, programme_id)
                .await?
                .map(|p| ProgrammeSnapshot {
                    abbrv: p.abbrv,
                    name: p.name,
                    years: p.years,
                })
                .unwrap_or_default(),
            None => ProgrammeSnapshot::default(),
        };

        // 3. Mint the identity before the document write.
        let email = format!("{}@{}", input.reg_no, EMAIL_DOMAIN);
        let identity_id = self
            .identities
            .create_identity(NewIdentity {
                email: email.clone(),
                password: self.credentials.issue(),
                display_name: input.full_name.clone(),
                email_verified: true,
            })
            .await?;
        info!(%email, id = %identity_id, "created login identity");

        let record = UserRecord {
            full_name: input.full_name,
            reg_no: input.reg_no,
            college: CollegeSnapshot {
                id: college.id,
                abbrv: college.abbrv,
                name: college.name,
            },
            programme,
            start_date: input.start_date,
            end_date: input.end_date,
            roles: split_tokens(&input.roles),
            profile_pic_url: input.profile_pic_url,
        };

        // 4. Persist the document under the identity id.
        if let Err(write_err) = self.repo.insert_user(&identity_id, record).await {
            // 5. Compensate: remove the identity so neither half survives.
            //    If the compensating delete fails too, the original error
            //    still wins and the orphaned identity is left for an
            //    operator.
            if let Err(compensation_err) = self.identities.delete_identity(&identity_id).await {
                error!(
                    id = %identity_id,
                    error = %compensation_err,
                    "compensating identity delete failed"
                );
            }
            return Err(write_err);
        }

        Ok(identity_id)
    }

    /// Lists users ascending by full name (store-ordered).
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.repo.list_users().await
    }

    /// Removes a user document and, best effort, its paired identity.
    ///
    /// An identity-delete failure is logged rather than surfaced: the
    /// document is already gone and re-running the delete cannot bring it
    /// back.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.repo.delete_user(id).await?;
        if let Err(err) = self.identities.delete_identity(id).await {
            warn!(%id, error = %err, "identity removal after user delete failed");
        }
        Ok(())
    }
}
