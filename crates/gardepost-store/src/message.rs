use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StoreError};

/// Fixed primary key of the singleton row — there is exactly one live
/// message shared by every publication.
const MESSAGE_ID: &str = "default";

/// Store for the shared post message template.
pub struct MessageStore {
    db: Mutex<Connection>,
}

impl MessageStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Read the shared message, `None` when it has never been set.
    pub fn get(&self) -> Result<Option<String>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT message FROM post_message WHERE id = ?1",
            [MESSAGE_ID],
            |row| row.get::<_, String>(0),
        ) {
            Ok(message) => Ok(Some(message)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// Upsert the shared message: created on first save, replaced after.
    pub fn set(&self, message: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO post_message (id, message) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET message = excluded.message",
            rusqlite::params![MESSAGE_ID, message],
        )?;
        info!("post message saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn store() -> MessageStore {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        MessageStore::new(conn)
    }

    #[test]
    fn unset_message_reads_as_none() {
        assert!(store().get().unwrap().is_none());
    }

    #[test]
    fn set_twice_keeps_a_single_row() {
        let store = store();
        store.set("Pharmacies de garde cette semaine").unwrap();
        store.set("Gardes mises à jour").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("Gardes mises à jour"));

        let db = store.db.lock().unwrap();
        let count: i64 = db
            .query_row("SELECT COUNT(*) FROM post_message", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
