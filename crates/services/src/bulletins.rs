//! # Bulletin Service
//!
//! Assembles and persists announcements. The author and their college are
//! embedded as snapshots taken at submission time — a historical record
//! that deliberately does not follow later changes to the source user or
//! college.

use std::sync::Arc;

use chrono::Utc;

use domains::error::Result;
use domains::models::{
    Announcement, AnnouncementPatch, AnnouncementRecord, Author, CollegeSnapshot,
};
use domains::traits::CampusRepo;

use crate::tokens::split_tokens;

/// Announcement fields as submitted by the dashboard. Role and visibility
/// lists arrive comma-separated; image URLs arrive already ordered, with
/// any retained pre-existing URLs first and freshly uploaded ones appended
/// after them.
#[derive(Debug, Clone)]
pub struct AnnouncementInput {
    pub title: String,
    pub body: String,
    pub department: String,
    pub author_id: String,
    pub author_name: String,
    pub college_id: String,
    pub college_abbrv: String,
    pub college_name: String,
    pub roles: String,
    pub visibility: String,
    pub image_urls: Vec<String>,
}

impl AnnouncementInput {
    fn author(&self) -> Author {
        Author {
            id: self.author_id.clone(),
            name: self.author_name.clone(),
            roles: split_tokens(&self.roles),
            college: CollegeSnapshot {
                id: self.college_id.clone(),
                abbrv: self.college_abbrv.clone(),
                name: self.college_name.clone(),
            },
        }
    }
}

/// Coordinates announcement reads and writes.
#[derive(Clone)]
pub struct BulletinService {
    repo: Arc<dyn CampusRepo>,
}

impl BulletinService {
    pub fn new(repo: Arc<dyn CampusRepo>) -> Self {
        Self { repo }
    }

    /// Persists a new announcement; `createdAt` is stamped server-side.
    pub async fn create(&self, input: AnnouncementInput) -> Result<String> {
        let record = AnnouncementRecord {
            author: input.author(),
            created_at: Utc::now(),
            title: input.title,
            body: input.body,
            department: input.department,
            visibility: split_tokens(&input.visibility),
            image_urls: input.image_urls,
        };
        self.repo.create_announcement(record).await
    }

    /// Lists announcements newest first (store-ordered).
    pub async fn list(&self) -> Result<Vec<Announcement>> {
        self.repo.list_announcements().await
    }

    /// Rewrites every field except the creation time.
    pub async fn update(&self, id: &str, input: AnnouncementInput) -> Result<()> {
        let patch = AnnouncementPatch {
            author: input.author(),
            title: input.title,
            body: input.body,
            department: input.department,
            visibility: split_tokens(&input.visibility),
            image_urls: input.image_urls,
        };
        self.repo.update_announcement(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete_announcement(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::traits::MockCampusRepo;

    fn input() -> AnnouncementInput {
        AnnouncementInput {
            title: "Exams".to_string(),
            body: "Timetable attached".to_string(),
            department: "Registry".to_string(),
            author_id: "uid-1".to_string(),
            author_name: "Ada".to_string(),
            college_id: "c1".to_string(),
            college_abbrv: "SCI".to_string(),
            college_name: "Science".to_string(),
            roles: "staff,lecturer".to_string(),
            visibility: " students , staff ,".to_string(),
            image_urls: vec!["https://cdn/a.png".to_string()],
        }
    }

    #[tokio::test]
    async fn create_parses_tokens_and_stamps_created_at() {
        let before = Utc::now();
        let mut repo = MockCampusRepo::new();
        repo.expect_create_announcement()
            .withf(move |record| {
                record.visibility == vec!["students", "staff"]
                    && record.author.roles == vec!["staff", "lecturer"]
                    && record.author.college.abbrv == "SCI"
                    && record.image_urls == vec!["https://cdn/a.png"]
                    && record.created_at >= before
            })
            .times(1)
            .returning(|_| Ok("a1".to_string()));

        let service = BulletinService::new(Arc::new(repo));
        let id = service.create(input()).await.unwrap();
        assert_eq!(id, "a1");
    }

    #[tokio::test]
    async fn update_never_touches_created_at() {
        // AnnouncementPatch has no created_at field; this test pins the
        // wiring so an edit carries everything else through.
        let mut repo = MockCampusRepo::new();
        repo.expect_update_announcement()
            .withf(|id, patch| id == "a1" && patch.title == "Exams")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = BulletinService::new(Arc::new(repo));
        service.update("a1", input()).await.unwrap();
    }
}
