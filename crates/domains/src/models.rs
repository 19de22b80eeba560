//! # Domain Models
//!
//! These structs represent the core entities of the campus directory:
//! colleges, their programmes, user accounts, and announcements.
//!
//! Identifiers are opaque strings assigned by the document store on
//! creation. Cross-entity references on users and announcements are
//! copied-at-creation snapshots, not live links: renaming a college later
//! does not touch the snapshots already embedded elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A college (faculty) in the campus directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct College {
    pub id: String,
    pub name: String,
    pub abbrv: String,
}

/// Fields accepted when creating or updating a [`College`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeDraft {
    pub name: String,
    pub abbrv: String,
}

/// An academic programme nested under exactly one college.
///
/// Programmes live only as children of their college and are deleted with
/// it; no orphaned programme may survive a college delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Programme {
    pub id: String,
    pub college_id: String,
    pub abbrv: String,
    pub name: String,
    pub years: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields accepted when creating or updating a [`Programme`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgrammeDraft {
    pub abbrv: String,
    pub name: String,
    pub years: u32,
    pub duration: Option<String>,
    pub description: Option<String>,
}

/// Copied-at-creation reference to a college.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeSnapshot {
    pub id: String,
    pub abbrv: String,
    pub name: String,
}

/// Copied-at-creation reference to a programme.
///
/// The default value (empty fields, zero years) stands in when an account
/// was created without a programme selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammeSnapshot {
    pub abbrv: String,
    pub name: String,
    pub years: u32,
}

/// A user account in the directory.
///
/// The id equals the paired auth identity's id — the two are created and
/// removed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub reg_no: String,
    pub college: CollegeSnapshot,
    pub programme: ProgrammeSnapshot,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
}

/// A user document before persistence. The document id is supplied by the
/// account workflow: it must equal the paired identity id.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub full_name: String,
    pub reg_no: String,
    pub college: CollegeSnapshot,
    pub programme: ProgrammeSnapshot,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub roles: Vec<String>,
    pub profile_pic_url: Option<String>,
}

impl UserRecord {
    /// Attaches the store-assigned (identity) id to the record.
    pub fn into_user(self, id: impl Into<String>) -> User {
        User {
            id: id.into(),
            full_name: self.full_name,
            reg_no: self.reg_no,
            college: self.college,
            programme: self.programme,
            start_date: self.start_date,
            end_date: self.end_date,
            roles: self.roles,
            profile_pic_url: self.profile_pic_url,
        }
    }
}

/// Snapshot of the posting user embedded in an announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub roles: Vec<String>,
    pub college: CollegeSnapshot,
}

/// A published announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub visibility: Vec<String>,
    pub image_urls: Vec<String>,
    pub author: Author,
}

/// An announcement before persistence; `created_at` is stamped server-side
/// by the bulletin workflow.
#[derive(Debug, Clone)]
pub struct AnnouncementRecord {
    pub title: String,
    pub body: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub visibility: Vec<String>,
    pub image_urls: Vec<String>,
    pub author: Author,
}

impl AnnouncementRecord {
    /// Attaches the store-assigned id to the record.
    pub fn into_announcement(self, id: impl Into<String>) -> Announcement {
        Announcement {
            id: id.into(),
            title: self.title,
            body: self.body,
            department: self.department,
            created_at: self.created_at,
            visibility: self.visibility,
            image_urls: self.image_urls,
            author: self.author,
        }
    }
}

/// Updatable announcement fields. `created_at` is deliberately absent: the
/// creation time is a historical fact and never rewritten.
#[derive(Debug, Clone)]
pub struct AnnouncementPatch {
    pub title: String,
    pub body: String,
    pub department: String,
    pub visibility: Vec<String>,
    pub image_urls: Vec<String>,
    pub author: Author,
}

/// Request to mint a login identity in the auth service.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub email_verified: bool,
}
