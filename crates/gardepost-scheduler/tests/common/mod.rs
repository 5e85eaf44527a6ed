#![allow(dead_code)]

//! Shared fixtures: file-backed stores and collaborator doubles.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Weekday;
use rusqlite::Connection;
use uuid::Uuid;

use gardepost_core::types::{ApiMode, GeoPoint, OperatorContext, PostingFrequency};
use gardepost_duty::{CoveragePolicy, DutyError, DutyWindow};
use gardepost_facebook::FacebookError;
use gardepost_geocode::GeocodeError;
use gardepost_render::RenderError;
use gardepost_scheduler::{Geocoder, Orchestrator, Platform, Rasterizer, ReportSource};
use gardepost_store::{db::init_db, MessageStore, PharmacyDraft, PharmacyStore, PostStore};

pub struct Stores {
    pub pharmacies: Arc<PharmacyStore>,
    pub posts: Arc<PostStore>,
    pub messages: Arc<MessageStore>,
    pub db_path: PathBuf,
}

/// One migrated database file, a separate connection per store — the same
/// arrangement the binary uses.
pub fn open_stores() -> Stores {
    let db_path = std::env::temp_dir().join(format!("gardepost-test-{}.db", Uuid::new_v4()));
    let conn = Connection::open(&db_path).unwrap();
    init_db(&conn).unwrap();

    Stores {
        pharmacies: Arc::new(PharmacyStore::new(Connection::open(&db_path).unwrap())),
        posts: Arc::new(PostStore::new(Connection::open(&db_path).unwrap())),
        messages: Arc::new(MessageStore::new(conn)),
        db_path,
    }
}

pub fn operator() -> OperatorContext {
    OperatorContext::new("op-1", "test-operator")
}

pub fn pharmacy_draft(name: &str, posting_day: Weekday) -> PharmacyDraft {
    PharmacyDraft {
        name: name.to_string(),
        facebook_page_id: Some("page-1".into()),
        posting_day,
        posting_frequency: PostingFrequency::Weekly,
        address: "Rue Haute 12 Bruxelles".into(),
        latitude: Some(50.8467),
        longitude: Some(4.3499),
        radius_km: Some(1),
        api_mode: ApiMode::Boolean,
        duty_api_token: "duty-token".into(),
        page_access_token: "page-token".into(),
    }
}

// --- collaborator doubles --------------------------------------------------

pub struct MockGeocoder {
    pub point: GeoPoint,
    pub fail: bool,
    pub calls: Arc<AtomicU32>,
}

impl MockGeocoder {
    pub fn ok(calls: Arc<AtomicU32>) -> Self {
        Self {
            point: GeoPoint::new(50.8467, 4.3499),
            fail: false,
            calls,
        }
    }

    pub fn failing(calls: Arc<AtomicU32>) -> Self {
        Self {
            point: GeoPoint::new(0.0, 0.0),
            fail: true,
            calls,
        }
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(GeocodeError::NoResult {
                address: address.to_string(),
            })
        } else {
            Ok(self.point)
        }
    }
}

pub struct MockReports {
    pub exhausted: bool,
    pub report_path: PathBuf,
    pub calls: Arc<AtomicU32>,
    pub last_initial_radius: Arc<AtomicU32>,
}

impl MockReports {
    pub fn ok(calls: Arc<AtomicU32>, last_initial_radius: Arc<AtomicU32>) -> Self {
        Self {
            exhausted: false,
            report_path: PathBuf::from("/tmp/gardepost-test-report.pdf"),
            calls,
            last_initial_radius,
        }
    }

    pub fn exhausted(calls: Arc<AtomicU32>, last_initial_radius: Arc<AtomicU32>) -> Self {
        Self {
            exhausted: true,
            report_path: PathBuf::new(),
            calls,
            last_initial_radius,
        }
    }
}

#[async_trait]
impl ReportSource for MockReports {
    async fn fetch_report(
        &self,
        initial_radius: u32,
        _anchor: GeoPoint,
        _address: &str,
        _window: &DutyWindow,
        _policy: CoveragePolicy,
        _bearer: &str,
    ) -> Result<PathBuf, DutyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_initial_radius
            .store(initial_radius, Ordering::SeqCst);
        if self.exhausted {
            Err(DutyError::CoverageExhausted { max_radius_km: 35 })
        } else {
            Ok(self.report_path.clone())
        }
    }
}

pub struct MockRasterizer {
    pub pages: Vec<PathBuf>,
}

impl MockRasterizer {
    pub fn single_page() -> Self {
        Self {
            pages: vec![PathBuf::from("/tmp/gardepost-test-page-0.png")],
        }
    }
}

#[async_trait]
impl Rasterizer for MockRasterizer {
    async fn rasterize(&self, _pdf: &std::path::Path) -> Result<Vec<PathBuf>, RenderError> {
        Ok(self.pages.clone())
    }
}

#[derive(Default)]
pub struct MockPlatform {
    /// Uploads for this page id fail with a platform-worded error.
    pub fail_upload_page: Mutex<Option<String>>,
    pub fail_delete: AtomicBool,
    pub uploads: AtomicU32,
    pub deletes: AtomicU32,
    /// `scheduled_publish_time` of every create_post call, in order.
    pub schedule_times: Mutex<Vec<Option<i64>>>,
}

#[async_trait]
impl Platform for MockPlatform {
    async fn upload_photo(
        &self,
        _page_access_token: &str,
        page_id: &str,
        _image: &std::path::Path,
    ) -> Result<String, FacebookError> {
        if self.fail_upload_page.lock().unwrap().as_deref() == Some(page_id) {
            return Err(FacebookError::Api {
                status: 400,
                message: "Invalid OAuth access token.".into(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("media-{n}"))
    }

    async fn create_post(
        &self,
        _page_access_token: &str,
        _page_id: &str,
        _message: &str,
        _media_id: &str,
        scheduled_publish_time: Option<i64>,
    ) -> Result<String, FacebookError> {
        let mut times = self.schedule_times.lock().unwrap();
        times.push(scheduled_publish_time);
        Ok(format!("fb-post-{}", times.len()))
    }

    async fn delete_post(
        &self,
        _fb_post_id: &str,
        _page_access_token: &str,
    ) -> Result<(), FacebookError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(FacebookError::Api {
                status: 400,
                message: "Unsupported delete request.".into(),
            });
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Rig {
    pub stores: Stores,
    pub platform: Arc<MockPlatform>,
    pub geocoder_calls: Arc<AtomicU32>,
    pub report_calls: Arc<AtomicU32>,
    pub last_initial_radius: Arc<AtomicU32>,
    pub orchestrator: Orchestrator,
}

/// A fully wired orchestrator over fresh stores and well-behaved doubles.
pub fn rig() -> Rig {
    rig_with(|_| {})
}

/// Same as [`rig`], with a hook to tweak the platform double before wiring.
pub fn rig_with(configure_platform: impl FnOnce(&MockPlatform)) -> Rig {
    let stores = open_stores();
    let platform = Arc::new(MockPlatform::default());
    configure_platform(&platform);

    let geocoder_calls = Arc::new(AtomicU32::new(0));
    let report_calls = Arc::new(AtomicU32::new(0));
    let last_initial_radius = Arc::new(AtomicU32::new(0));

    let orchestrator = Orchestrator::new(
        Arc::clone(&stores.pharmacies),
        Arc::clone(&stores.posts),
        Arc::clone(&stores.messages),
        Box::new(MockGeocoder::ok(Arc::clone(&geocoder_calls))),
        Box::new(MockReports::ok(
            Arc::clone(&report_calls),
            Arc::clone(&last_initial_radius),
        )),
        Box::new(MockRasterizer::single_page()),
        Arc::clone(&platform) as Arc<dyn Platform>,
    );

    Rig {
        stores,
        platform,
        geocoder_calls,
        report_calls,
        last_initial_radius,
        orchestrator,
    }
}
