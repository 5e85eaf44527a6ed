use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use gardepost_core::types::{Post, PostStatus};

use crate::error::{Result, StoreError};

/// A post joined with the name of its owning pharmacy, for listings.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub post: Post,
    /// `None` when the pharmacy has been deleted since the post was made.
    pub pharmacy_name: Option<String>,
}

/// Thread-safe store for locally recorded publications.
pub struct PostStore {
    db: Mutex<Connection>,
}

impl PostStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Record a freshly scheduled publication. Only the orchestrator calls
    /// this; all later state changes go through the lifecycle controller.
    pub fn create(
        &self,
        pharmacy_id: &str,
        image_path: &str,
        scheduled_at: DateTime<Utc>,
        fb_post_id: Option<&str>,
    ) -> Result<Post> {
        let id = Uuid::new_v4().to_string();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO posts (id, pharmacy_id, image_path, scheduled_at, status, fb_post_id)
             VALUES (?1, ?2, ?3, ?4, 'scheduled', ?5)",
            rusqlite::params![
                id,
                pharmacy_id,
                image_path,
                scheduled_at.to_rfc3339(),
                fb_post_id,
            ],
        )?;
        info!(post_id = %id, pharmacy_id, %scheduled_at, "post recorded");

        Ok(Post {
            id,
            pharmacy_id: pharmacy_id.to_string(),
            image_path: image_path.to_string(),
            scheduled_at,
            status: PostStatus::Scheduled,
            fb_post_id: fb_post_id.map(str::to_string),
        })
    }

    /// Find a non-cancelled post for the pharmacy on the given calendar day.
    ///
    /// Date-only comparison — time of day is ignored. This is the
    /// existing-schedule guard's query.
    pub fn find_active_for_date(
        &self,
        pharmacy_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Post>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, pharmacy_id, image_path, scheduled_at, status, fb_post_id
             FROM posts
             WHERE pharmacy_id = ?1
               AND DATE(scheduled_at) = ?2
               AND status != 'cancelled'",
            rusqlite::params![pharmacy_id, date.format("%Y-%m-%d").to_string()],
            row_to_raw,
        ) {
            Ok(row) => Ok(Some(row.into_post()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// Retrieve a post by id, returning `None` if it does not exist.
    pub fn get(&self, id: &str) -> Result<Option<Post>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, pharmacy_id, image_path, scheduled_at, status, fb_post_id
             FROM posts WHERE id = ?1",
            [id],
            row_to_raw,
        ) {
            Ok(row) => Ok(Some(row.into_post()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// Persist a lifecycle transition.
    pub fn set_status(&self, id: &str, status: PostStatus) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "UPDATE posts SET status = ?1 WHERE id = ?2",
            rusqlite::params![status.to_string(), id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        info!(post_id = %id, %status, "post status updated");
        Ok(())
    }

    /// All posts with their pharmacy names, earliest slot first.
    pub fn list_with_pharmacy(&self) -> Result<Vec<PostListing>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT posts.id, posts.pharmacy_id, posts.image_path,
                    posts.scheduled_at, posts.status, posts.fb_post_id,
                    pharmacies.name
             FROM posts
             LEFT JOIN pharmacies ON posts.pharmacy_id = pharmacies.id
             ORDER BY posts.scheduled_at ASC",
        )?;
        let rows: Vec<(PostRow, Option<String>)> = stmt
            .query_map([], |row| Ok((row_to_raw(row)?, row.get(6)?)))?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter()
            .map(|(raw, pharmacy_name)| {
                Ok(PostListing {
                    post: raw.into_post()?,
                    pharmacy_name,
                })
            })
            .collect()
    }

    /// Wipe every post row. Remote posts are left untouched.
    pub fn delete_all(&self) -> Result<usize> {
        let db = self.db.lock().unwrap();
        let n = db.execute("DELETE FROM posts", [])?;
        info!(count = n, "all posts deleted");
        Ok(n)
    }
}

/// Raw column values before domain-type parsing.
struct PostRow {
    id: String,
    pharmacy_id: String,
    image_path: String,
    scheduled_at: String,
    status: String,
    fb_post_id: Option<String>,
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        pharmacy_id: row.get(1)?,
        image_path: row.get(2)?,
        scheduled_at: row.get(3)?,
        status: row.get(4)?,
        fb_post_id: row.get(5)?,
    })
}

impl PostRow {
    fn into_post(self) -> Result<Post> {
        let scheduled_at = DateTime::parse_from_rfc3339(&self.scheduled_at)
            .map_err(|e| StoreError::Invalid(format!("scheduled_at: {e}")))?
            .with_timezone(&Utc);
        let status: PostStatus = self.status.parse().map_err(StoreError::Invalid)?;

        Ok(Post {
            id: self.id,
            pharmacy_id: self.pharmacy_id,
            image_path: self.image_path,
            scheduled_at,
            status,
            fb_post_id: self.fb_post_id,
        })
    }
}
