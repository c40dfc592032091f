use chrono::NaiveDate;

use crate::{
    error::SubmissionError,
    models::{
        bookings::{BookingConfirmation, BookingMethod, BookingType, CreateBookingPayload},
        draft::{BookingDraft, DraftKey},
        quote::PriceQuote,
    },
    services::{draft_saver::DraftSaver, platform_client::PlatformApi},
};

pub struct BookingService;

impl BookingService {
    /// Booking-creation body for a resort stay confirmed over WhatsApp.
    pub fn build_payload(
        draft: &BookingDraft,
        quote: &PriceQuote,
        booking_date: NaiveDate,
    ) -> CreateBookingPayload {
        CreateBookingPayload {
            booking_type: BookingType::Resort,
            booking_method: BookingMethod::Hybrid,
            object_id: draft.resort_id,
            guest_name: draft.guest_name.trim().to_string(),
            guest_email: draft.guest_email.trim().to_string(),
            guest_phone: draft.guest_phone.trim().to_string(),
            adults: draft.adults,
            children: draft.children,
            total_guests: draft.total_guests(),
            booking_date,
            check_in_date: draft.check_in,
            check_out_date: draft.check_out,
            base_amount: quote.base_amount,
            tax_amount: quote.tax_amount,
            total_amount: quote.total_amount,
            special_requests: draft.special_requests.clone(),
        }
    }

    /// Send the booking once. On success the stored draft is cleared; on
    /// failure it is left untouched so the guest can fix it and resubmit.
    ///
    /// There is no idempotency key: a retry after a timeout that actually
    /// succeeded upstream creates a second booking.
    pub async fn submit(
        platform: &dyn PlatformApi,
        drafts: &DraftSaver,
        draft_key: &DraftKey,
        draft: &BookingDraft,
        quote: &PriceQuote,
        booking_date: NaiveDate,
    ) -> Result<BookingConfirmation, SubmissionError> {
        let payload = Self::build_payload(draft, quote, booking_date);

        let response = match platform.create_booking(&payload).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Booking submission for resort {} failed: {}", draft.resort_id, e);
                return Err(e);
            }
        };

        let confirmation = BookingConfirmation::from(response);
        log::info!(
            "Created booking {} for resort {}",
            confirmation.booking_number,
            draft.resort_id
        );

        if let Err(e) = drafts.clear(draft_key).await {
            log::warn!(
                "Booking {} created but draft for resort {} was not cleared: {}",
                confirmation.booking_number,
                draft.resort_id,
                e
            );
        }

        Ok(confirmation)
    }
}
