use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::{error::ApiError, AppState};

pub async fn get_room_types(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let resort_id = path.into_inner();

    match state.platform.fetch_room_types(resort_id).await {
        Ok(rooms) => HttpResponse::Ok().json(rooms),
        Err(err) => {
            log::error!("Failed to fetch room types for resort {}: {}", resort_id, err);
            ApiError::from(err).error_response()
        }
    }
}
