//! # Postgres Document Store
//!
//! `CampusRepo` over sqlx. Snapshot values and string sequences are stored
//! as JSONB columns; the college cascade stages its deletes inside one
//! transaction so the batch applies entirely or not at all.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{
    Announcement, AnnouncementPatch, AnnouncementRecord, Author, College, CollegeDraft,
    CollegeSnapshot, Programme, ProgrammeDraft, ProgrammeSnapshot, User, UserRecord,
};
use domains::traits::CampusRepo;

fn new_doc_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Postgres-backed `CampusRepo`.
pub struct PgCampusRepo {
    pool: PgPool,
}

impl PgCampusRepo {
    /// Connects and applies pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(DomainError::dependency)?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DomainError::dependency)?;
        info!("document store migrations applied");
        Ok(Self { pool })
    }

    /// Wraps an existing pool (used by tooling that manages its own pool).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn college_from_row(row: &PgRow) -> College {
    College {
        id: row.get("id"),
        name: row.get("name"),
        abbrv: row.get("abbrv"),
    }
}

fn programme_from_row(row: &PgRow) -> Programme {
    let years: i64 = row.get("years");
    Programme {
        id: row.get("id"),
        college_id: row.get("college_id"),
        abbrv: row.get("abbrv"),
        name: row.get("name"),
        years: u32::try_from(years).unwrap_or(0),
        duration: row.get("duration"),
        description: row.get("description"),
    }
}

fn user_from_row(row: &PgRow) -> User {
    let college: Json<CollegeSnapshot> = row.get("college");
    let programme: Json<ProgrammeSnapshot> = row.get("programme");
    let roles: Json<Vec<String>> = row.get("roles");
    User {
        id: row.get("id"),
        full_name: row.get("full_name"),
        reg_no: row.get("reg_no"),
        college: college.0,
        programme: programme.0,
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        roles: roles.0,
        profile_pic_url: row.get("profile_pic_url"),
    }
}

fn announcement_from_row(row: &PgRow) -> Announcement {
    let visibility: Json<Vec<String>> = row.get("visibility");
    let image_urls: Json<Vec<String>> = row.get("image_urls");
    let author: Json<Author> = row.get("author");
    Announcement {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        department: row.get("department"),
        created_at: row.get("created_at"),
        visibility: visibility.0,
        image_urls: image_urls.0,
        author: author.0,
    }
}

#[async_trait]
impl CampusRepo for PgCampusRepo {
    async fn create_college(&self, draft: CollegeDraft) -> Result<String> {
        let id = new_doc_id();
        sqlx::query("INSERT INTO colleges (id, name, abbrv) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(&draft.name)
            .bind(&draft.abbrv)
            .execute(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(id)
    }

    async fn get_college(&self, id: &str) -> Result<Option<College>> {
        let row = sqlx::query("SELECT id, name, abbrv FROM colleges WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(row.as_ref().map(college_from_row))
    }

    async fn list_colleges(&self) -> Result<Vec<College>> {
        let rows = sqlx::query("SELECT id, name, abbrv FROM colleges ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(rows.iter().map(college_from_row).collect())
    }

    async fn update_college(&self, id: &str, draft: CollegeDraft) -> Result<()> {
        let result = sqlx::query("UPDATE colleges SET name = $2, abbrv = $3 WHERE id = $1")
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.abbrv)
            .execute(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("college", id.to_string()));
        }
        Ok(())
    }

    /// Stages every programme delete and the college delete in one
    /// transaction: readers either see the whole sub-tree or none of it.
    async fn delete_college_with_programmes(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(DomainError::dependency)?;

        sqlx::query("DELETE FROM programmes WHERE college_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DomainError::dependency)?;

        sqlx::query("DELETE FROM colleges WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DomainError::dependency)?;

        tx.commit().await.map_err(DomainError::dependency)
    }

    async fn create_programme(&self, college_id: &str, draft: ProgrammeDraft) -> Result<String> {
        let id = new_doc_id();
        sqlx::query(
            "INSERT INTO programmes (id, college_id, abbrv, name, years, duration, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&id)
        .bind(college_id)
        .bind(&draft.abbrv)
        .bind(&draft.name)
        .bind(i64::from(draft.years))
        .bind(&draft.duration)
        .bind(&draft.description)
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        Ok(id)
    }

    async fn get_programme(
        &self,
        college_id: &str,
        programme_id: &str,
    ) -> Result<Option<Programme>> {
        let row = sqlx::query("SELECT * FROM programmes WHERE college_id = $1 AND id = $2")
            .bind(college_id)
            .bind(programme_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(row.as_ref().map(programme_from_row))
    }

    async fn list_programmes(&self, college_id: &str) -> Result<Vec<Programme>> {
        // No ORDER BY: programme order is the consuming layer's concern.
        let rows = sqlx::query("SELECT * FROM programmes WHERE college_id = $1")
            .bind(college_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(rows.iter().map(programme_from_row).collect())
    }

    async fn update_programme(
        &self,
        college_id: &str,
        programme_id: &str,
        draft: ProgrammeDraft,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE programmes SET abbrv = $3, name = $4, years = $5, duration = $6, \
             description = $7 WHERE college_id = $1 AND id = $2",
        )
        .bind(college_id)
        .bind(programme_id)
        .bind(&draft.abbrv)
        .bind(&draft.name)
        .bind(i64::from(draft.years))
        .bind(&draft.duration)
        .bind(&draft.description)
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("programme", programme_id.to_string()));
        }
        Ok(())
    }

    async fn delete_programme(&self, college_id: &str, programme_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM programmes WHERE college_id = $1 AND id = $2")
            .bind(college_id)
            .bind(programme_id)
            .execute(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn insert_user(&self, id: &str, record: UserRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, full_name, reg_no, college, programme, start_date, \
             end_date, roles, profile_pic_url) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id)
        .bind(&record.full_name)
        .bind(&record.reg_no)
        .bind(Json(&record.college))
        .bind(Json(&record.programme))
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(Json(&record.roles))
        .bind(&record.profile_pic_url)
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY full_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn create_announcement(&self, record: AnnouncementRecord) -> Result<String> {
        let id = new_doc_id();
        sqlx::query(
            "INSERT INTO announcements (id, title, body, department, created_at, visibility, \
             image_urls, author) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&id)
        .bind(&record.title)
        .bind(&record.body)
        .bind(&record.department)
        .bind(record.created_at)
        .bind(Json(&record.visibility))
        .bind(Json(&record.image_urls))
        .bind(Json(&record.author))
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        Ok(id)
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query("SELECT * FROM announcements ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(rows.iter().map(announcement_from_row).collect())
    }

    async fn update_announcement(&self, id: &str, patch: AnnouncementPatch) -> Result<()> {
        let result = sqlx::query(
            "UPDATE announcements SET title = $2, body = $3, department = $4, visibility = $5, \
             image_urls = $6, author = $7 WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.body)
        .bind(&patch.department)
        .bind(Json(&patch.visibility))
        .bind(Json(&patch.image_urls))
        .bind(Json(&patch.author))
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("announcement", id.to_string()));
        }
        Ok(())
    }

    async fn delete_announcement(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        Ok(())
    }
}
