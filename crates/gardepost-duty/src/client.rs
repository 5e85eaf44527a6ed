use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gardepost_core::types::GeoPoint;

use crate::error::{DutyError, Result};
use crate::types::{Duty, DutyShift, DutyWindow};

/// Source of duty data: the raw per-window dataset and the formatted report.
///
/// The resolver only talks to this trait, so tests can substitute a canned
/// dataset and assert that no report is fetched on coverage exhaustion.
#[async_trait]
pub trait DutyFeed: Send + Sync {
    /// Fetch every duty in the window, regardless of distance. One call per
    /// resolution attempt — radius probing filters locally.
    async fn fetch_duties(&self, window: &DutyWindow, bearer: &str) -> Result<Vec<Duty>>;

    /// Fetch the formatted roster report (PDF) for the final radius and
    /// return the path it was saved to.
    async fn fetch_report(
        &self,
        radius_km: u32,
        anchor: GeoPoint,
        address: &str,
        window: &DutyWindow,
        bearer: &str,
    ) -> Result<PathBuf>;
}

/// HTTP client for the duty-roster service.
#[derive(Clone)]
pub struct DutyFeedClient {
    client: reqwest::Client,
    base_url: String,
    report_language: String,
    pdf_dir: PathBuf,
}

impl DutyFeedClient {
    pub fn new(base_url: String, report_language: String, pdf_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            report_language,
            pdf_dir: pdf_dir.into(),
        }
    }
}

#[async_trait]
impl DutyFeed for DutyFeedClient {
    async fn fetch_duties(&self, window: &DutyWindow, bearer: &str) -> Result<Vec<Duty>> {
        let url = format!(
            "{}/api/dutyAssignment/public?From={}&To={}",
            self.base_url,
            iso(window.start),
            iso(window.end),
        );
        debug!(%url, "fetching duty dataset");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {bearer}"))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, body = %body, "duty feed error");
            return Err(DutyError::Api { status, body });
        }

        let wire: Vec<WireDuty> = resp.json().await?;
        let duties: Vec<Duty> = wire.into_iter().filter_map(WireDuty::into_duty).collect();
        info!(count = duties.len(), "duty dataset fetched");
        Ok(duties)
    }

    async fn fetch_report(
        &self,
        radius_km: u32,
        anchor: GeoPoint,
        address: &str,
        window: &DutyWindow,
        bearer: &str,
    ) -> Result<PathBuf> {
        // The report endpoint expects spaces in the location as '+'.
        let location = address.replace(' ', "+");
        let url = format!(
            "{}/api/report/PublicDuty?Radius={}&From={}&To={}&Location={}&Lat={}&Long={}&language={}",
            self.base_url,
            radius_km,
            iso(window.start),
            iso(window.end),
            location,
            anchor.latitude,
            anchor.longitude,
            self.report_language,
        );
        debug!(%url, "fetching roster report");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {bearer}"))
            .header("Accept", "application/octet-stream")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, body = %body, "report fetch error");
            return Err(DutyError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        tokio::fs::create_dir_all(&self.pdf_dir).await?;
        let path = self.pdf_dir.join(format!("{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "report saved");
        Ok(path)
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Wire shape of one duty record as the feed returns it.
#[derive(Debug, Deserialize)]
struct WireDuty {
    #[serde(rename = "dutyDate")]
    duty_date: WireDutyDate,
    #[serde(rename = "dutyType")]
    duty_type: WireDutyType,
    pharmacy: Option<WirePharmacy>,
}

#[derive(Debug, Deserialize)]
struct WireDutyDate {
    date: String,
}

#[derive(Debug, Deserialize)]
struct WireDutyType {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct WirePharmacy {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl WireDuty {
    /// Map the wire record into the domain type. Records with an unknown
    /// shift type or an unparseable date are dropped — they can never count
    /// toward coverage anyway.
    fn into_duty(self) -> Option<Duty> {
        let date = self.duty_date.date.get(..10)?.parse().ok()?;
        let shift = match self.duty_type.kind.as_str() {
            "DAY" => DutyShift::Day,
            "NIGHT" => DutyShift::Night,
            _ => return None,
        };
        let location = self.pharmacy.and_then(|p| match (p.latitude, p.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        });
        Some(Duty {
            date,
            shift,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn wire_duty_parses_feed_shape() {
        let json = r#"{
            "dutyDate": { "date": "2024-05-06T00:00:00" },
            "dutyType": { "type": "NIGHT" },
            "pharmacy": { "latitude": 50.85, "longitude": 4.35 }
        }"#;
        let wire: WireDuty = serde_json::from_str(json).unwrap();
        let duty = wire.into_duty().unwrap();
        assert_eq!(duty.date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert_eq!(duty.shift, DutyShift::Night);
        assert_eq!(duty.location.unwrap().latitude, 50.85);
    }

    #[test]
    fn wire_duty_without_pharmacy_keeps_no_location() {
        let json = r#"{
            "dutyDate": { "date": "2024-05-06T00:00:00" },
            "dutyType": { "type": "DAY" },
            "pharmacy": null
        }"#;
        let wire: WireDuty = serde_json::from_str(json).unwrap();
        assert!(wire.into_duty().unwrap().location.is_none());
    }

    #[test]
    fn unknown_shift_type_is_dropped() {
        let json = r#"{
            "dutyDate": { "date": "2024-05-06T00:00:00" },
            "dutyType": { "type": "HOLIDAY" },
            "pharmacy": null
        }"#;
        let wire: WireDuty = serde_json::from_str(json).unwrap();
        assert!(wire.into_duty().is_none());
    }

    #[test]
    fn iso_matches_feed_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
        assert_eq!(iso(ts), "2024-05-06T08:00:00.000Z");
    }
}
