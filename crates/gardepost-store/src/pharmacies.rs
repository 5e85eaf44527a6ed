use std::sync::Mutex;

use chrono::Weekday;
use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use gardepost_core::config::DEFAULT_RADIUS_KM;
use gardepost_core::types::{ApiMode, GeoPoint, Pharmacy, PostingFrequency};

use crate::error::{Result, StoreError};

/// Everything needed to register a pharmacy, minus the generated id.
#[derive(Debug, Clone)]
pub struct PharmacyDraft {
    pub name: String,
    pub facebook_page_id: Option<String>,
    pub posting_day: Weekday,
    pub posting_frequency: PostingFrequency,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Falls back to [`DEFAULT_RADIUS_KM`] when `None`.
    pub radius_km: Option<u32>,
    pub api_mode: ApiMode,
    pub duty_api_token: String,
    pub page_access_token: String,
}

/// Thread-safe store for pharmacy records.
pub struct PharmacyStore {
    db: Mutex<Connection>,
}

impl PharmacyStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Insert a new pharmacy and return the stored record.
    pub fn add(&self, draft: PharmacyDraft) -> Result<Pharmacy> {
        let id = Uuid::new_v4().to_string();
        let radius_km = draft.radius_km.unwrap_or(DEFAULT_RADIUS_KM);

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO pharmacies
             (id, name, facebook_page_id, posting_day, posting_frequency,
              address, latitude, longitude, radius_km, api_mode,
              duty_api_token, page_access_token)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            rusqlite::params![
                id,
                draft.name,
                draft.facebook_page_id,
                draft.posting_day.to_string(),
                draft.posting_frequency.to_string(),
                draft.address,
                draft.latitude,
                draft.longitude,
                radius_km,
                draft.api_mode.to_string(),
                draft.duty_api_token,
                draft.page_access_token,
            ],
        )?;
        info!(pharmacy_id = %id, name = %draft.name, "pharmacy added");

        Ok(Pharmacy {
            id,
            name: draft.name,
            facebook_page_id: draft.facebook_page_id,
            posting_day: draft.posting_day,
            posting_frequency: draft.posting_frequency,
            address: draft.address,
            latitude: draft.latitude,
            longitude: draft.longitude,
            radius_km,
            api_mode: draft.api_mode,
            duty_api_token: draft.duty_api_token,
            page_access_token: draft.page_access_token,
        })
    }

    /// Return all pharmacies ordered by name.
    pub fn list(&self) -> Result<Vec<Pharmacy>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, name, facebook_page_id, posting_day, posting_frequency,
                    address, latitude, longitude, radius_km, api_mode,
                    duty_api_token, page_access_token
             FROM pharmacies ORDER BY name",
        )?;
        let rows: Vec<PharmacyRow> = stmt
            .query_map([], row_to_raw)?
            .collect::<rusqlite::Result<_>>()?;
        rows.into_iter().map(PharmacyRow::into_pharmacy).collect()
    }

    /// Retrieve a pharmacy by id, returning `None` if it does not exist.
    pub fn get(&self, id: &str) -> Result<Option<Pharmacy>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, name, facebook_page_id, posting_day, posting_frequency,
                    address, latitude, longitude, radius_km, api_mode,
                    duty_api_token, page_access_token
             FROM pharmacies WHERE id = ?1",
            [id],
            row_to_raw,
        ) {
            Ok(row) => Ok(Some(row.into_pharmacy()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// Permanently delete a pharmacy record.
    pub fn delete(&self, id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute("DELETE FROM pharmacies WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        info!(pharmacy_id = %id, "pharmacy deleted");
        Ok(())
    }

    /// Backfill geocoded coordinates onto a pharmacy.
    ///
    /// Called exactly once per pharmacy, the first time its address is
    /// resolved; a pharmacy with populated coordinates is never geocoded
    /// again.
    pub fn set_coordinates(&self, id: &str, point: GeoPoint) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "UPDATE pharmacies SET latitude = ?1, longitude = ?2 WHERE id = ?3",
            rusqlite::params![point.latitude, point.longitude, id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        info!(
            pharmacy_id = %id,
            latitude = point.latitude,
            longitude = point.longitude,
            "coordinates backfilled"
        );
        Ok(())
    }
}

/// Raw column values before domain-type parsing.
struct PharmacyRow {
    id: String,
    name: String,
    facebook_page_id: Option<String>,
    posting_day: String,
    posting_frequency: String,
    address: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_km: u32,
    api_mode: String,
    duty_api_token: String,
    page_access_token: String,
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<PharmacyRow> {
    Ok(PharmacyRow {
        id: row.get(0)?,
        name: row.get(1)?,
        facebook_page_id: row.get(2)?,
        posting_day: row.get(3)?,
        posting_frequency: row.get(4)?,
        address: row.get(5)?,
        latitude: row.get(6)?,
        longitude: row.get(7)?,
        radius_km: row.get(8)?,
        api_mode: row.get(9)?,
        duty_api_token: row.get(10)?,
        page_access_token: row.get(11)?,
    })
}

impl PharmacyRow {
    fn into_pharmacy(self) -> Result<Pharmacy> {
        let posting_day: Weekday = self
            .posting_day
            .parse()
            .map_err(|_| StoreError::Invalid(format!("posting_day: {}", self.posting_day)))?;
        let posting_frequency: PostingFrequency =
            self.posting_frequency.parse().map_err(StoreError::Invalid)?;
        let api_mode: ApiMode = self.api_mode.parse().map_err(StoreError::Invalid)?;

        Ok(Pharmacy {
            id: self.id,
            name: self.name,
            facebook_page_id: self.facebook_page_id,
            posting_day,
            posting_frequency,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            radius_km: self.radius_km,
            api_mode,
            duty_api_token: self.duty_api_token,
            page_access_token: self.page_access_token,
        })
    }
}
