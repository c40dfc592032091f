use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Resort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingMethod {
    /// Form submission followed by a WhatsApp confirmation.
    Hybrid,
}

/// Body of the platform's booking-creation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingPayload {
    pub booking_type: BookingType,
    pub booking_method: BookingMethod,
    pub object_id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub adults: u32,
    pub children: u32,
    pub total_guests: u32,
    pub booking_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(with = "crate::models::money")]
    pub base_amount: Decimal,
    #[serde(with = "crate::models::money")]
    pub tax_amount: Decimal,
    #[serde(with = "crate::models::money")]
    pub total_amount: Decimal,
    pub special_requests: String,
}

/// What the platform sends back for a created booking.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingResponse {
    pub id: i64,
    pub booking_id: Option<String>,
    pub booking_number: Option<String>,
    pub status: Option<String>,
    pub whatsapp_link: Option<String>,
}

/// Returned to the client after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingConfirmation {
    pub id: i64,
    pub booking_number: String,
    pub status: String,
    pub whatsapp_link: Option<String>,
    pub redirect_path: String,
}

impl From<BookingResponse> for BookingConfirmation {
    fn from(response: BookingResponse) -> Self {
        // Older bookings have no human-friendly number; the confirmation page
        // also resolves plain ids.
        let booking_number = response
            .booking_number
            .filter(|number| !number.is_empty())
            .unwrap_or_else(|| response.id.to_string());

        Self {
            id: response.id,
            redirect_path: format!("/bookings/{}/confirmation", booking_number),
            booking_number,
            status: response.status.unwrap_or_else(|| "pending".to_string()),
            whatsapp_link: response.whatsapp_link,
        }
    }
}
