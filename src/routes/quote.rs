use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::ApiError,
    models::draft::BookingDraft,
    services::pricing_service::PricingService,
    AppState,
};

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub room_type_id: i64,
}

/// Price a stay without opening a wizard (listing and detail pages).
pub async fn get_quote(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<QuoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let resort_id = path.into_inner();
    let input = input.into_inner();

    let rooms = state.platform.fetch_room_types(resort_id).await?;
    let room = rooms
        .iter()
        .find(|room| room.id == input.room_type_id)
        .ok_or_else(|| ApiError::NotFound(format!("Room type {}", input.room_type_id)))?;

    let mut draft = BookingDraft::new(resort_id, &rooms);
    draft.room_type_id = Some(room.id);
    draft.check_in = input.check_in;
    draft.check_out = input.check_out;

    Ok(HttpResponse::Ok().json(PricingService::compute_quote(&draft, Some(room))))
}
