use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        draft::{BookingDraft, DraftKey, DraftUpdate, InitialProps},
        quote::PriceQuote,
        room::RoomType,
        wizard::WizardStep,
    },
    services::{
        booking_service::BookingService,
        whatsapp_service::WhatsAppService,
        wizard_service::{BeginSubmitError, Wizard},
    },
    AppState,
};

#[derive(Deserialize, Default)]
pub struct OpenWizardRequest {
    /// Returned by an earlier open; without it the guest starts a fresh draft.
    pub draft_token: Option<Uuid>,
    pub resort_name: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
}

#[derive(Serialize)]
pub struct WizardView<'a> {
    pub session_id: Uuid,
    pub draft_token: Uuid,
    pub resort_name: &'a str,
    pub step: WizardStep,
    pub step_title: &'static str,
    pub total_steps: u8,
    pub draft: &'a BookingDraft,
    pub rooms: &'a [RoomType],
    pub selected_room: Option<&'a RoomType>,
    pub quote: PriceQuote,
    pub can_advance: bool,
    pub validation_message: Option<String>,
    pub submitting: bool,
}

impl<'a> WizardView<'a> {
    fn new(session_id: Uuid, wizard: &'a Wizard) -> Self {
        let validation = wizard.validate();
        Self {
            session_id,
            draft_token: wizard.owner(),
            resort_name: wizard.resort_name(),
            step: wizard.step(),
            step_title: wizard.step().title(),
            total_steps: WizardStep::TOTAL,
            draft: wizard.draft(),
            rooms: wizard.rooms(),
            selected_room: wizard.selected_room(),
            quote: wizard.quote(),
            can_advance: validation.is_ok(),
            validation_message: validation.err().map(|err| err.to_string()),
            submitting: wizard.is_submitting(),
        }
    }
}

#[derive(Serialize)]
struct WhatsAppInquiry {
    message: String,
    link: String,
}

async fn find_session(
    state: &AppState,
    session_id: &Uuid,
) -> Result<Arc<Mutex<Wizard>>, ApiError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Wizard session".to_string()))
}

/// Start a booking for a property, picking up any draft left from a previous visit.
pub async fn open(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<OpenWizardRequest>,
) -> Result<HttpResponse, ApiError> {
    let resort_id = path.into_inner();
    let input = input.into_inner();
    let owner = input.draft_token.unwrap_or_else(Uuid::new_v4);
    let draft_key = DraftKey::new(owner, resort_id);

    let (rooms, saved) = futures::join!(
        state.platform.fetch_room_types(resort_id),
        state.drafts.load(&draft_key)
    );
    let rooms = rooms?;
    let saved = saved.unwrap_or_else(|e| {
        log::warn!("Could not load saved draft for resort {}: {}", resort_id, e);
        None
    });

    let initial = InitialProps {
        check_in: input.check_in,
        check_out: input.check_out,
        adults: input.adults,
        children: input.children,
    };
    let resumed = saved.is_some();
    let draft = saved
        .unwrap_or_else(|| BookingDraft::new(resort_id, &rooms))
        .with_overrides(&initial);
    state.drafts.schedule(draft_key, draft.clone());

    let resort_name = input
        .resort_name
        .unwrap_or_else(|| format!("Resort {}", resort_id));
    let (session_id, session) = state
        .sessions
        .insert(Wizard::new(owner, draft, rooms, resort_name))
        .await;

    log::info!(
        "Opened booking wizard {} for resort {} (resumed draft: {})",
        session_id,
        resort_id,
        resumed
    );

    let wizard = session.lock().await;
    Ok(HttpResponse::Created().json(WizardView::new(session_id, &wizard)))
}

pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let wizard = session.lock().await;
    Ok(HttpResponse::Ok().json(WizardView::new(session_id, &wizard)))
}

pub async fn update_draft(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<DraftUpdate>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let mut wizard = session.lock().await;
    wizard.ensure_idle()?;
    wizard.update(input.into_inner());
    state.drafts.schedule(wizard.draft_key(), wizard.draft().clone());

    Ok(HttpResponse::Ok().json(WizardView::new(session_id, &wizard)))
}

pub async fn next(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let mut wizard = session.lock().await;
    wizard.ensure_idle()?;
    if let Err(err) = wizard.advance() {
        return Err(ApiError::validation(wizard.step(), err));
    }

    Ok(HttpResponse::Ok().json(WizardView::new(session_id, &wizard)))
}

pub async fn back(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let mut wizard = session.lock().await;
    wizard.ensure_idle()?;
    wizard.back();

    Ok(HttpResponse::Ok().json(WizardView::new(session_id, &wizard)))
}

/// Create the booking. The session lock is released during the platform call;
/// while the submission is in flight every other mutating handler answers 409.
pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let (draft_key, draft, quote) = {
        let mut wizard = session.lock().await;
        match wizard.begin_submit() {
            Ok((draft, quote)) => (wizard.draft_key(), draft, quote),
            Err(BeginSubmitError::Invalid(step, err)) => {
                return Err(ApiError::validation(step, err))
            }
            Err(BeginSubmitError::Submission(err)) => return Err(err.into()),
        }
    };

    let result = BookingService::submit(
        state.platform.as_ref(),
        &state.drafts,
        &draft_key,
        &draft,
        &quote,
        Local::now().date_naive(),
    )
    .await;

    // A booked wizard stays marked as submitting until it is removed.
    let mut wizard = session.lock().await;
    match result {
        Ok(confirmation) => {
            state.sessions.remove(&session_id).await;
            Ok(HttpResponse::Created().json(confirmation))
        }
        Err(err) => {
            wizard.finish_submit();
            Err(err.into())
        }
    }
}

pub async fn whatsapp(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let wizard = session.lock().await;
    let message = WhatsAppService::build_inquiry_message(
        wizard.resort_name(),
        wizard.draft(),
        wizard.selected_room(),
        &wizard.quote(),
    );
    let link = WhatsAppService::whatsapp_link(&state.whatsapp_number, &message);

    Ok(HttpResponse::Ok().json(WhatsAppInquiry { message, link }))
}

/// Abandon the booking and forget the saved draft.
pub async fn cancel(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let session = find_session(&state, &session_id).await?;

    let wizard = session.lock().await;
    wizard.ensure_idle()?;
    state
        .sessions
        .remove(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Wizard session".to_string()))?;

    let draft_key = wizard.draft_key();
    state.drafts.clear(&draft_key).await?;
    log::info!(
        "Cancelled booking wizard {} for resort {}",
        session_id,
        draft_key.resort_id
    );

    Ok(HttpResponse::NoContent().finish())
}
