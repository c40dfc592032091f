#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use uuid::Uuid;

use wayantrails_booking::{
    error::{CatalogError, SubmissionError},
    models::{
        bookings::{BookingResponse, CreateBookingPayload},
        draft::{BookingDraft, DraftKey},
        room::RoomType,
    },
    routes,
    services::{
        draft_saver::DraftSaver,
        draft_store::{DraftStore, MemoryDraftStore},
        platform_client::PlatformApi,
        wizard_service::SessionRegistry,
    },
    AppState,
};

pub const RESORT_ID: i64 = 12;

/// Stand-in for the tourism platform: a fixed catalog and a recorder for
/// booking calls.
pub struct FakePlatform {
    pub rooms: Vec<RoomType>,
    pub reject_with: Mutex<Option<String>>,
    pub booking_delay: Duration,
    pub bookings: Mutex<Vec<CreateBookingPayload>>,
    pub catalog_calls: AtomicUsize,
}

impl FakePlatform {
    pub fn new(rooms: Vec<RoomType>) -> Self {
        Self {
            rooms,
            reject_with: Mutex::new(None),
            booking_delay: Duration::ZERO,
            bookings: Mutex::new(vec![]),
            catalog_calls: AtomicUsize::new(0),
        }
    }

    pub fn reject_next(&self, detail: &str) {
        *self.reject_with.lock().unwrap() = Some(detail.to_string());
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn fetch_room_types(&self, resort_id: i64) -> Result<Vec<RoomType>, CatalogError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if resort_id == RESORT_ID {
            Ok(self.rooms.clone())
        } else {
            Err(CatalogError::Status(404))
        }
    }

    async fn create_booking(
        &self,
        payload: &CreateBookingPayload,
    ) -> Result<BookingResponse, SubmissionError> {
        if !self.booking_delay.is_zero() {
            tokio::time::sleep(self.booking_delay).await;
        }
        if let Some(detail) = self.reject_with.lock().unwrap().take() {
            return Err(SubmissionError::Rejected { status: 400, detail });
        }

        let mut bookings = self.bookings.lock().unwrap();
        bookings.push(payload.clone());
        let id = bookings.len() as i64;
        Ok(BookingResponse {
            id,
            booking_id: None,
            booking_number: Some(format!("WT-2026-{:03}", id)),
            status: Some("pending".to_string()),
            whatsapp_link: Some("https://wa.me/919876543210".to_string()),
        })
    }

    fn base_url(&self) -> &str {
        "http://platform.test/api"
    }
}

pub fn test_rooms() -> Vec<RoomType> {
    vec![
        RoomType {
            id: 1,
            name: "Premium Pool Villa".to_string(),
            price_per_night: Decimal::from(12000),
            max_guests: 4,
            description: Some("Private pool and valley view".to_string()),
            features: vec!["Private Pool".to_string(), "King Bed".to_string()],
        },
        RoomType {
            id: 2,
            name: "Garden Cottage".to_string(),
            price_per_night: Decimal::from(4500),
            max_guests: 2,
            description: None,
            features: vec![],
        },
    ]
}

pub struct TestApp {
    pub platform: Arc<FakePlatform>,
    pub store: Arc<MemoryDraftStore>,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_platform(FakePlatform::new(test_rooms()))
    }

    pub fn with_platform(platform: FakePlatform) -> Self {
        let platform = Arc::new(platform);
        let store = Arc::new(MemoryDraftStore::new());
        let drafts = DraftSaver::spawn(store.clone(), Duration::from_millis(20));
        let state = web::Data::new(AppState::new(
            platform.clone(),
            drafts,
            SessionRegistry::default(),
            "919876543210",
        ));

        Self {
            platform,
            store,
            state,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }

    /// Stored draft for `draft_token` at the test resort, after any pending
    /// save lands.
    pub async fn stored_draft(&self, draft_token: &str) -> Option<BookingDraft> {
        let owner = Uuid::parse_str(draft_token).unwrap();
        self.state.drafts.flush().await;
        self.store
            .load(&DraftKey::new(owner, RESORT_ID))
            .await
            .unwrap()
    }
}
