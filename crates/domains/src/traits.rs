//! # Port Contracts
//!
//! Any adapter must implement these traits to be wired into the binary.
//! The three ports deliberately map onto three separate backing systems
//! (document store, auth service, object store) that share no transaction
//! coordinator — which is why multi-system workflows compensate instead of
//! committing atomically.

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
#[cfg(feature = "testing")]
use mockall::automock;

use crate::error::Result;
use crate::models::{
    Announcement, AnnouncementPatch, AnnouncementRecord, College, CollegeDraft, NewIdentity,
    Programme, ProgrammeDraft, User, UserRecord,
};

/// Document-store contract for colleges, programmes, users, and
/// announcements.
///
/// Listing orders are part of the contract: colleges ascend by name, users
/// ascend by full name, announcements descend by creation time. Programme
/// scans carry no order guarantee; callers sort.
///
/// Deletes follow document-store semantics: removing an absent document is
/// a no-op success, never an error.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait CampusRepo: Send + Sync {
    // College operations
    async fn create_college(&self, draft: CollegeDraft) -> Result<String>;
    async fn get_college(&self, id: &str) -> Result<Option<College>>;
    async fn list_colleges(&self) -> Result<Vec<College>>;
    async fn update_college(&self, id: &str, draft: CollegeDraft) -> Result<()>;
    /// Deletes the college and every programme nested under it as one
    /// atomic batch: either all staged deletes apply or none do.
    async fn delete_college_with_programmes(&self, id: &str) -> Result<()>;

    // Programme operations
    async fn create_programme(&self, college_id: &str, draft: ProgrammeDraft) -> Result<String>;
    async fn get_programme(&self, college_id: &str, programme_id: &str)
        -> Result<Option<Programme>>;
    async fn list_programmes(&self, college_id: &str) -> Result<Vec<Programme>>;
    async fn update_programme(
        &self,
        college_id: &str,
        programme_id: &str,
        draft: ProgrammeDraft,
    ) -> Result<()>;
    async fn delete_programme(&self, college_id: &str, programme_id: &str) -> Result<()>;

    // User operations
    /// Writes a user document under a caller-supplied id (the paired
    /// identity id), unlike the other collections where the store assigns
    /// ids.
    async fn insert_user(&self, id: &str, record: UserRecord) -> Result<()>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn delete_user(&self, id: &str) -> Result<()>;

    // Announcement operations
    async fn create_announcement(&self, record: AnnouncementRecord) -> Result<String>;
    async fn list_announcements(&self) -> Result<Vec<Announcement>>;
    async fn update_announcement(&self, id: &str, patch: AnnouncementPatch) -> Result<()>;
    async fn delete_announcement(&self, id: &str) -> Result<()>;
}

/// Identity contract for the auth service.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Mints a login identity and returns its id. Fails with
    /// [`DomainError::IdentityConflict`](crate::error::DomainError) when
    /// the email is already registered.
    async fn create_identity(&self, identity: NewIdentity) -> Result<String>;

    /// Removes an identity. Unknown ids are a no-op success.
    async fn delete_identity(&self, id: &str) -> Result<()>;
}

/// Object-store contract for announcement and profile images.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores a blob under the given key.
    async fn store(&self, key: &str, data: Bytes, content_type: &Mime) -> Result<()>;

    /// Makes the stored object publicly readable and returns its public
    /// URL.
    async fn make_public(&self, key: &str) -> Result<String>;
}
