use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::models::wizard::WizardStep;

/// Shown when the booking endpoint fails without saying why.
pub const GENERIC_SUBMISSION_FAILURE: &str = "Failed to create booking. Please try again.";

/// A wizard step whose inputs are not good enough to move forward.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select check-in and check-out dates")]
    MissingDates,

    #[error("Check-out must be after check-in")]
    InvalidDateRange,

    #[error("At least one adult is required")]
    NoAdults,

    #[error("Selected room supports maximum {max_guests} guests. Please select a different room or reduce guests.")]
    OverCapacity { guests: u32, max_guests: u32 },

    #[error("Select a room type")]
    RoomNotSelected,

    #[error("Price for the selected room is unavailable. Please choose another room.")]
    PriceUnavailable,

    #[error("Guest {0} is required")]
    MissingContact(&'static str),

    #[error("Review is the last step, submit the booking instead")]
    FinalStep,

    #[error("Bookings can only be submitted from the review step")]
    NotAtReview,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The endpoint answered with an error; `detail` is its own message.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("{0}")]
    Network(String),

    #[error("Unexpected response from booking service: {0}")]
    InvalidResponse(String),

    #[error("A booking submission is already in progress")]
    AlreadySubmitting,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch room types: {0}")]
    Request(String),

    #[error("Room catalog responded with status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Draft saver is not running")]
    SaverStopped,
}

/// Everything a route handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{source}")]
    Validation {
        step: WizardStep,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    DraftStore(#[from] DraftStoreError),
}

impl ApiError {
    pub fn validation(step: WizardStep, source: ValidationError) -> Self {
        ApiError::Validation { step, source }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Submission(SubmissionError::AlreadySubmitting) => StatusCode::CONFLICT,
            ApiError::Submission(SubmissionError::Rejected { status, .. })
                if (400..500).contains(status) =>
            {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Submission(_) | ApiError::Catalog(_) => StatusCode::BAD_GATEWAY,
            ApiError::DraftStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation { step, source } => json!({
                "error": source.to_string(),
                "step": step.number(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
