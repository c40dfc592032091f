//! Client for the tourism platform's REST API.
//!
//! Only the two calls the booking flow needs: the room catalog for a property
//! and booking creation. Transport concerns (auth headers, retries) are left
//! to the platform; a failed call is reported once and never retried.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{CatalogError, SubmissionError, GENERIC_SUBMISSION_FAILURE},
    models::{
        bookings::{BookingResponse, CreateBookingPayload},
        room::{RoomCatalogResponse, RoomType},
    },
};

#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn fetch_room_types(&self, resort_id: i64) -> Result<Vec<RoomType>, CatalogError>;

    async fn create_booking(
        &self,
        payload: &CreateBookingPayload,
    ) -> Result<BookingResponse, SubmissionError>;

    fn base_url(&self) -> &str;
}

pub struct HttpPlatformClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpPlatformClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformClient {
    async fn fetch_room_types(&self, resort_id: i64) -> Result<Vec<RoomType>, CatalogError> {
        let response = self
            .http_client
            .get(self.endpoint("resorts/room-types/"))
            .query(&[("resort", resort_id.to_string()), ("is_active", "true".to_string())])
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!(
                "Room catalog for resort {} returned status {}",
                resort_id,
                status
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let catalog: RoomCatalogResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        Ok(catalog.into_rooms())
    }

    async fn create_booking(
        &self,
        payload: &CreateBookingPayload,
    ) -> Result<BookingResponse, SubmissionError> {
        let response = self
            .http_client
            .post(self.endpoint("bookings/bookings/"))
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<BookingResponse>()
                .await
                .map_err(|e| SubmissionError::InvalidResponse(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers `detail`, then field errors (`{"guest_email": ["Enter a valid
/// email address."]}`), then the generic fallback.
pub fn error_detail(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return GENERIC_SUBMISSION_FAILURE.to_string(),
    };

    if let Some(detail) = value.get("detail").and_then(Value::as_str) {
        return detail.to_string();
    }

    let Some(fields) = value.as_object() else {
        return GENERIC_SUBMISSION_FAILURE.to_string();
    };

    let messages: Vec<String> = fields
        .iter()
        .filter_map(|(field, errors)| {
            let text = match errors {
                Value::String(message) => message.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => return None,
            };
            if text.is_empty() {
                None
            } else if field == "non_field_errors" {
                Some(text)
            } else {
                Some(format!("{}: {}", field, text))
            }
        })
        .collect();

    if messages.is_empty() {
        GENERIC_SUBMISSION_FAILURE.to_string()
    } else {
        messages.join("; ")
    }
}
