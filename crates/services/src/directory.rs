//! # Directory Service
//!
//! College and programme operations over the document store, including the
//! cascading college delete.

use std::sync::Arc;

use domains::error::{DomainError, Result};
use domains::models::{College, CollegeDraft, Programme, ProgrammeDraft};
use domains::traits::CampusRepo;

/// Coordinates college and programme reads and writes.
#[derive(Clone)]
pub struct DirectoryService {
    repo: Arc<dyn CampusRepo>,
}

impl DirectoryService {
    pub fn new(repo: Arc<dyn CampusRepo>) -> Self {
        Self { repo }
    }

    pub async fn create_college(&self, draft: CollegeDraft) -> Result<String> {
        self.repo.create_college(draft).await
    }

    pub async fn get_college(&self, id: &str) -> Result<Option<College>> {
        self.repo.get_college(id).await
    }

    /// Lists colleges ascending by name (store-ordered).
    pub async fn list_colleges(&self) -> Result<Vec<College>> {
        self.repo.list_colleges().await
    }

    pub async fn update_college(&self, id: &str, draft: CollegeDraft) -> Result<()> {
        self.repo.update_college(id, draft).await
    }

    /// Deletes a college together with every programme nested under it.
    ///
    /// The repository applies the whole cascade as one atomic batch, so
    /// readers never observe a partially cascaded state. Absent ids succeed:
    /// deleting a missing document is a no-op, and so is deleting the same
    /// college twice. User documents referencing the college keep their
    /// snapshots (see the module notes on snapshot semantics).
    pub async fn delete_college(&self, id: &str) -> Result<()> {
        self.repo.delete_college_with_programmes(id).await
    }

    pub async fn create_programme(&self, college_id: &str, draft: ProgrammeDraft) -> Result<String> {
        self.repo.create_programme(college_id, draft).await
    }

    /// Lists programmes for a college, sorted ascending by name.
    ///
    /// The store gives no order guarantee for programme scans, so sorting
    /// happens here (case-sensitive; a blank name sorts first). Fails with
    /// `NotFound` when the college itself is absent.
    pub async fn list_programmes(&self, college_id: &str) -> Result<Vec<Programme>> {
        if self.repo.get_college(college_id).await?.is_none() {
            return Err(DomainError::NotFound("college", college_id.to_string()));
        }
        let mut programmes = self.repo.list_programmes(college_id).await?;
        programmes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(programmes)
    }

    pub async fn update_programme(
        &self,
        college_id: &str,
        programme_id: &str,
        draft: ProgrammeDraft,
    ) -> Result<()> {
        self.repo.update_programme(college_id, programme_id, draft).await
    }

    pub async fn delete_programme(&self, college_id: &str, programme_id: &str) -> Result<()> {
        self.repo.delete_programme(college_id, programme_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::traits::MockCampusRepo;
    use mockall::predicate::eq;

    fn programme(id: &str, name: &str) -> Programme {
        Programme {
            id: id.to_string(),
            college_id: "c1".to_string(),
            abbrv: String::new(),
            name: name.to_string(),
            years: 3,
            duration: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn programmes_are_sorted_by_name() {
        let mut repo = MockCampusRepo::new();
        repo.expect_get_college().with(eq("c1")).returning(|id| {
            Ok(Some(College {
                id: id.to_string(),
                name: "Science".to_string(),
                abbrv: "SCI".to_string(),
            }))
        });
        repo.expect_list_programmes().with(eq("c1")).returning(|_| {
            Ok(vec![
                programme("p1", "Zoology"),
                programme("p2", ""),
                programme("p3", "Art"),
            ])
        });

        let service = DirectoryService::new(Arc::new(repo));
        let listed = service.list_programmes("c1").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["", "Art", "Zoology"]);
    }

    #[tokio::test]
    async fn listing_programmes_of_missing_college_fails_before_the_scan() {
        let mut repo = MockCampusRepo::new();
        repo.expect_get_college().returning(|_| Ok(None));
        // No expect_list_programmes: the mock panics if the scan runs.

        let service = DirectoryService::new(Arc::new(repo));
        let err = service.list_programmes("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("college", _)));
    }

    #[tokio::test]
    async fn cascade_failure_is_surfaced_unchanged() {
        let mut repo = MockCampusRepo::new();
        repo.expect_delete_college_with_programmes()
            .with(eq("c1"))
            .returning(|_| Err(DomainError::Dependency("batch commit refused".to_string())));

        let service = DirectoryService::new(Arc::new(repo));
        let err = service.delete_college("c1").await.unwrap_err();
        assert!(matches!(err, DomainError::Dependency(_)));
    }
}
