//! # In-Memory Document Store
//!
//! `CampusRepo` over plain maps behind a single RwLock. The one write
//! guard is what makes the college cascade a true batch: every staged
//! delete lands while the lock is held, or none do, and readers never see
//! a half-cascaded state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{
    Announcement, AnnouncementPatch, AnnouncementRecord, College, CollegeDraft, Programme,
    ProgrammeDraft, User, UserRecord,
};
use domains::traits::CampusRepo;

fn new_doc_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Default)]
struct Collections {
    colleges: HashMap<String, College>,
    /// Programmes keyed per owning college, mirroring a sub-collection.
    programmes: HashMap<String, HashMap<String, Programme>>,
    users: HashMap<String, User>,
    announcements: HashMap<String, Announcement>,
}

/// In-memory `CampusRepo` used by tests, the seed tool, and dev builds.
#[derive(Default)]
pub struct MemoryCampusRepo {
    collections: RwLock<Collections>,
}

impl MemoryCampusRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampusRepo for MemoryCampusRepo {
    async fn create_college(&self, draft: CollegeDraft) -> Result<String> {
        let id = new_doc_id();
        let mut guard = self.collections.write().await;
        guard.colleges.insert(
            id.clone(),
            College {
                id: id.clone(),
                name: draft.name,
                abbrv: draft.abbrv,
            },
        );
        Ok(id)
    }

    async fn get_college(&self, id: &str) -> Result<Option<College>> {
        Ok(self.collections.read().await.colleges.get(id).cloned())
    }

    async fn list_colleges(&self) -> Result<Vec<College>> {
        let guard = self.collections.read().await;
        let mut colleges: Vec<College> = guard.colleges.values().cloned().collect();
        colleges.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(colleges)
    }

    async fn update_college(&self, id: &str, draft: CollegeDraft) -> Result<()> {
        let mut guard = self.collections.write().await;
        match guard.colleges.get_mut(id) {
            Some(college) => {
                college.name = draft.name;
                college.abbrv = draft.abbrv;
                Ok(())
            }
            None => Err(DomainError::NotFound("college", id.to_string())),
        }
    }

    async fn delete_college_with_programmes(&self, id: &str) -> Result<()> {
        // One guard, both removals: the batch semantics of the cascade.
        let mut guard = self.collections.write().await;
        guard.programmes.remove(id);
        guard.colleges.remove(id);
        Ok(())
    }

    async fn create_programme(&self, college_id: &str, draft: ProgrammeDraft) -> Result<String> {
        let id = new_doc_id();
        let mut guard = self.collections.write().await;
        guard
            .programmes
            .entry(college_id.to_string())
            .or_default()
            .insert(
                id.clone(),
                Programme {
                    id: id.clone(),
                    college_id: college_id.to_string(),
                    abbrv: draft.abbrv,
                    name: draft.name,
                    years: draft.years,
                    duration: draft.duration,
                    description: draft.description,
                },
            );
        Ok(id)
    }

    async fn get_programme(
        &self,
        college_id: &str,
        programme_id: &str,
    ) -> Result<Option<Programme>> {
        let guard = self.collections.read().await;
        Ok(guard
            .programmes
            .get(college_id)
            .and_then(|nested| nested.get(programme_id))
            .cloned())
    }

    async fn list_programmes(&self, college_id: &str) -> Result<Vec<Programme>> {
        // Map iteration order: deliberately no order guarantee here.
        let guard = self.collections.read().await;
        Ok(guard
            .programmes
            .get(college_id)
            .map(|nested| nested.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update_programme(
        &self,
        college_id: &str,
        programme_id: &str,
        draft: ProgrammeDraft,
    ) -> Result<()> {
        let mut guard = self.collections.write().await;
        let programme = guard
            .programmes
            .get_mut(college_id)
            .and_then(|nested| nested.get_mut(programme_id))
            .ok_or_else(|| DomainError::NotFound("programme", programme_id.to_string()))?;
        programme.abbrv = draft.abbrv;
        programme.name = draft.name;
        programme.years = draft.years;
        programme.duration = draft.duration;
        programme.description = draft.description;
        Ok(())
    }

    async fn delete_programme(&self, college_id: &str, programme_id: &str) -> Result<()> {
        let mut guard = self.collections.write().await;
        if let Some(nested) = guard.programmes.get_mut(college_id) {
            nested.remove(programme_id);
        }
        Ok(())
    }

    async fn insert_user(&self, id: &str, record: UserRecord) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.users.insert(id.to_string(), record.into_user(id));
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let guard = self.collections.read().await;
        let mut users: Vec<User> = guard.users.values().cloned().collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.collections.write().await.users.remove(id);
        Ok(())
    }

    async fn create_announcement(&self, record: AnnouncementRecord) -> Result<String> {
        let id = new_doc_id();
        let mut guard = self.collections.write().await;
        guard
            .announcements
            .insert(id.clone(), record.into_announcement(id.clone()));
        Ok(id)
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let guard = self.collections.read().await;
        let mut announcements: Vec<Announcement> =
            guard.announcements.values().cloned().collect();
        announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(announcements)
    }

    async fn update_announcement(&self, id: &str, patch: AnnouncementPatch) -> Result<()> {
        let mut guard = self.collections.write().await;
        let announcement = guard
            .announcements
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound("announcement", id.to_string()))?;
        announcement.title = patch.title;
        announcement.body = patch.body;
        announcement.department = patch.department;
        announcement.visibility = patch.visibility;
        announcement.image_urls = patch.image_urls;
        announcement.author = patch.author;
        Ok(())
    }

    async fn delete_announcement(&self, id: &str) -> Result<()> {
        self.collections.write().await.announcements.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> CollegeDraft {
        CollegeDraft {
            name: name.to_string(),
            abbrv: name[..1].to_string(),
        }
    }

    fn programme_draft(name: &str) -> ProgrammeDraft {
        ProgrammeDraft {
            abbrv: String::new(),
            name: name.to_string(),
            years: 4,
            duration: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn colleges_list_ascending_by_name() {
        let repo = MemoryCampusRepo::new();
        repo.create_college(draft("Beta")).await.unwrap();
        repo.create_college(draft("Alpha")).await.unwrap();

        let names: Vec<String> = repo
            .list_colleges()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn cascade_removes_college_and_every_programme() {
        let repo = MemoryCampusRepo::new();
        let college_id = repo.create_college(draft("Science")).await.unwrap();
        for name in ["Physics", "Chemistry", "Biology"] {
            repo.create_programme(&college_id, programme_draft(name))
                .await
                .unwrap();
        }
        assert_eq!(repo.list_programmes(&college_id).await.unwrap().len(), 3);

        repo.delete_college_with_programmes(&college_id)
            .await
            .unwrap();

        assert!(repo.get_college(&college_id).await.unwrap().is_none());
        assert!(repo.list_programmes(&college_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_missing_college_is_a_no_op_success() {
        let repo = MemoryCampusRepo::new();
        repo.delete_college_with_programmes("ghost").await.unwrap();

        // And deleting twice is just as fine.
        let id = repo.create_college(draft("Science")).await.unwrap();
        repo.delete_college_with_programmes(&id).await.unwrap();
        repo.delete_college_with_programmes(&id).await.unwrap();
    }

    #[tokio::test]
    async fn updating_a_missing_document_reports_not_found() {
        let repo = MemoryCampusRepo::new();
        let err = repo.update_college("ghost", draft("X")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("college", _)));
    }

    #[tokio::test]
    async fn users_list_ascending_by_full_name() {
        use chrono::Utc;
        use domains::models::{CollegeSnapshot, ProgrammeSnapshot};

        let repo = MemoryCampusRepo::new();
        for (id, name) in [("u1", "Charlie"), ("u2", "Ada"), ("u3", "Bob")] {
            repo.insert_user(
                id,
                UserRecord {
                    full_name: name.to_string(),
                    reg_no: id.to_string(),
                    college: CollegeSnapshot::default(),
                    programme: ProgrammeSnapshot::default(),
                    start_date: Utc::now(),
                    end_date: Utc::now(),
                    roles: vec![],
                    profile_pic_url: None,
                },
            )
            .await
            .unwrap();
        }

        let names: Vec<String> = repo
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.full_name)
            .collect();
        assert_eq!(names, vec!["Ada", "Bob", "Charlie"]);
    }

    #[tokio::test]
    async fn announcements_list_newest_first() {
        use chrono::{Duration, Utc};
        use domains::models::{Author, CollegeSnapshot};

        let repo = MemoryCampusRepo::new();
        let author = Author {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            roles: vec![],
            college: CollegeSnapshot::default(),
        };
        let base = Utc::now();
        for (title, offset) in [("old", 0), ("new", 60)] {
            repo.create_announcement(AnnouncementRecord {
                title: title.to_string(),
                body: String::new(),
                department: String::new(),
                created_at: base + Duration::seconds(offset),
                visibility: vec![],
                image_urls: vec![],
                author: author.clone(),
            })
            .await
            .unwrap();
        }

        let titles: Vec<String> = repo
            .list_announcements()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
    }
}
