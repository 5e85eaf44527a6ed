use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A WGS-84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// How often a pharmacy's roster post recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingFrequency {
    Weekly,
    Biweekly,
}

impl PostingFrequency {
    /// How many days past the reference start a single generation run may
    /// schedule. A weekly pharmacy gets one slot per calendar week, a
    /// biweekly one per fortnight.
    pub fn max_advance_days(self) -> i64 {
        match self {
            PostingFrequency::Weekly => 6,
            PostingFrequency::Biweekly => 13,
        }
    }
}

impl std::fmt::Display for PostingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostingFrequency::Weekly => "weekly",
            PostingFrequency::Biweekly => "biweekly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PostingFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(PostingFrequency::Weekly),
            "biweekly" => Ok(PostingFrequency::Biweekly),
            other => Err(format!("unknown posting frequency: {other}")),
        }
    }
}

/// Which duty-feed coverage rule applies to a pharmacy.
///
/// `Threshold` sources require two pharmacies on call per shift per day
/// before a report is considered usable; `Boolean` sources only need one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiMode {
    Threshold,
    Boolean,
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiMode::Threshold => "threshold",
            ApiMode::Boolean => "boolean",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "threshold" => Ok(ApiMode::Threshold),
            "boolean" => Ok(ApiMode::Boolean),
            other => Err(format!("unknown api mode: {other}")),
        }
    }
}

/// A pharmacy whose on-duty roster is published to its Facebook page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pharmacy {
    /// UUID v4 string — primary key.
    pub id: String,
    pub name: String,
    /// Facebook page the roster image is posted to. Validated at generation
    /// time: a pharmacy without one is skipped with a validation error.
    pub facebook_page_id: Option<String>,
    /// Weekday the recurring post lands on.
    pub posting_day: Weekday,
    pub posting_frequency: PostingFrequency,
    /// Free-text address, geocoded lazily into `latitude`/`longitude`.
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Initial duty-roster search radius in kilometres.
    pub radius_km: u32,
    pub api_mode: ApiMode,
    /// Bearer token for the duty-roster feed.
    pub duty_api_token: String,
    /// Page-level access token for the Facebook Graph API.
    pub page_access_token: String,
}

impl Pharmacy {
    /// Cached coordinates, if geocoding has already run for this pharmacy.
    ///
    /// Once populated the pharmacy must never be re-geocoded; the
    /// orchestrator backfills these exactly once.
    pub fn anchor(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Persisted lifecycle state of a post.
///
/// `archived` is deliberately absent: it is a read-time view, see
/// [`Post::display_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Accepted by the platform for future publication.
    Scheduled,
    /// Forced live by an operator. Terminal.
    Published,
    /// Withdrawn; the remote post (if any) was deleted first. Terminal.
    Cancelled,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
            PostStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            "cancelled" => Ok(PostStatus::Cancelled),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// What a reader of the post list sees: the persisted state plus the
/// computed `Archived` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Scheduled,
    Published,
    Cancelled,
    /// Still `scheduled` in the store but its slot has passed.
    Archived,
}

/// A locally recorded Facebook publication for one pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// UUID v4 string — primary key.
    pub id: String,
    pub pharmacy_id: String,
    /// First page of the rasterized roster report.
    pub image_path: String,
    /// UTC instant the platform will publish the post.
    pub scheduled_at: DateTime<Utc>,
    pub status: PostStatus,
    /// Remote post id, present once the platform accepted the post.
    pub fb_post_id: Option<String>,
}

impl Post {
    /// Derive the read-time status. Never persisted — deriving at read time
    /// avoids clock skew between write time and read time.
    pub fn display_status(&self, now: DateTime<Utc>) -> DisplayStatus {
        match self.status {
            PostStatus::Scheduled if self.scheduled_at <= now => DisplayStatus::Archived,
            PostStatus::Scheduled => DisplayStatus::Scheduled,
            PostStatus::Published => DisplayStatus::Published,
            PostStatus::Cancelled => DisplayStatus::Cancelled,
        }
    }
}

/// The operator on whose behalf an orchestrator or lifecycle call runs.
///
/// Threaded explicitly through every entry point instead of living in
/// ambient request state; used for log attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorContext {
    pub id: String,
    pub name: String,
}

impl OperatorContext {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for OperatorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
