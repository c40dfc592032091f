use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use uuid::Uuid;

use crate::{
    error::{SubmissionError, ValidationError},
    models::{
        draft::{BookingDraft, DraftKey, DraftUpdate},
        quote::PriceQuote,
        room::RoomType,
        wizard::WizardStep,
    },
    services::pricing_service::PricingService,
};

/// Check whether `step` is complete enough to move past it.
///
/// `room` is the draft's selected room, already resolved against the offered
/// set; `None` means nothing valid is selected.
pub fn validate_step(
    step: WizardStep,
    draft: &BookingDraft,
    room: Option<&RoomType>,
) -> Result<(), ValidationError> {
    match step {
        WizardStep::Dates => {
            if draft.check_in.is_none() || draft.check_out.is_none() {
                return Err(ValidationError::MissingDates);
            }
            if PricingService::compute_nights(draft.check_in, draft.check_out) == 0 {
                return Err(ValidationError::InvalidDateRange);
            }
            Ok(())
        }
        WizardStep::Guests => {
            if draft.adults < 1 {
                return Err(ValidationError::NoAdults);
            }
            let max_guests = room.map(|room| room.max_guests).unwrap_or(0);
            if draft.total_guests() > max_guests {
                return Err(ValidationError::OverCapacity {
                    guests: draft.total_guests(),
                    max_guests,
                });
            }
            Ok(())
        }
        WizardStep::Room => match (room, draft.room_type_id) {
            (Some(room), Some(room_type_id)) if room.id == room_type_id => {
                PricingService::try_compute_quote(draft, Some(room))
                    .map(|_| ())
                    .ok_or(ValidationError::PriceUnavailable)
            }
            _ => Err(ValidationError::RoomNotSelected),
        },
        WizardStep::Contact => {
            if draft.guest_name.trim().is_empty() {
                return Err(ValidationError::MissingContact("name"));
            }
            if draft.guest_email.trim().is_empty() {
                return Err(ValidationError::MissingContact("email"));
            }
            if draft.guest_phone.trim().is_empty() {
                return Err(ValidationError::MissingContact("phone"));
            }
            Ok(())
        }
        WizardStep::Review => Ok(()),
    }
}

pub fn can_advance(step: WizardStep, draft: &BookingDraft, room: Option<&RoomType>) -> bool {
    validate_step(step, draft, room).is_ok()
}

/// One guest's pass through the booking flow for a single property.
#[derive(Debug)]
pub struct Wizard {
    owner: Uuid,
    step: WizardStep,
    draft: BookingDraft,
    rooms: Vec<RoomType>,
    resort_name: String,
    submitting: bool,
}

impl Wizard {
    pub fn new(
        owner: Uuid,
        draft: BookingDraft,
        rooms: Vec<RoomType>,
        resort_name: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            step: WizardStep::Dates,
            draft,
            rooms,
            resort_name: resort_name.into(),
            submitting: false,
        }
    }

    /// Token the guest presents to pick this draft up again later.
    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn draft_key(&self) -> DraftKey {
        DraftKey::new(self.owner, self.draft.resort_id)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn rooms(&self) -> &[RoomType] {
        &self.rooms
    }

    pub fn resort_name(&self) -> &str {
        &self.resort_name
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Progress is frozen while a submission is outstanding.
    pub fn ensure_idle(&self) -> Result<(), SubmissionError> {
        if self.submitting {
            Err(SubmissionError::AlreadySubmitting)
        } else {
            Ok(())
        }
    }

    pub fn selected_room(&self) -> Option<&RoomType> {
        PricingService::selected_room(&self.draft, &self.rooms)
    }

    pub fn quote(&self) -> PriceQuote {
        PricingService::compute_quote(&self.draft, self.selected_room())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_step(self.step, &self.draft, self.selected_room())
    }

    pub fn can_advance(&self) -> bool {
        self.validate().is_ok()
    }

    /// Edits never fail; a bad value only blocks the forward transition.
    pub fn update(&mut self, update: DraftUpdate) {
        self.draft.apply(update);
    }

    pub fn advance(&mut self) -> Result<WizardStep, ValidationError> {
        self.validate()?;
        let next = self.step.next().ok_or(ValidationError::FinalStep)?;
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Mark the wizard as submitting and hand out what the booking call needs.
    ///
    /// Every step is re-checked so a draft edited after review never reaches
    /// the network.
    pub fn begin_submit(&mut self) -> Result<(BookingDraft, PriceQuote), BeginSubmitError> {
        self.ensure_idle().map_err(BeginSubmitError::Submission)?;
        if self.step != WizardStep::Review {
            return Err(BeginSubmitError::Invalid(self.step, ValidationError::NotAtReview));
        }
        let room = self.selected_room();
        for step in [
            WizardStep::Dates,
            WizardStep::Guests,
            WizardStep::Room,
            WizardStep::Contact,
        ] {
            validate_step(step, &self.draft, room)
                .map_err(|err| BeginSubmitError::Invalid(step, err))?;
        }

        self.submitting = true;
        Ok((self.draft.clone(), self.quote()))
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }
}

#[derive(Debug)]
pub enum BeginSubmitError {
    Invalid(WizardStep, ValidationError),
    Submission(SubmissionError),
}

/// How long an untouched wizard is kept before it is dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    wizard: Arc<Mutex<Wizard>>,
    last_seen: Instant,
}

/// Open wizards, keyed by session id.
///
/// Sessions idle for longer than `idle_timeout` are evicted on the next
/// insert or reaper pass. Evicting a session never touches its saved draft.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub async fn insert(&self, wizard: Wizard) -> (Uuid, Arc<Mutex<Wizard>>) {
        let session_id = Uuid::new_v4();
        let wizard = Arc::new(Mutex::new(wizard));

        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        sessions.insert(
            session_id,
            SessionEntry {
                wizard: wizard.clone(),
                last_seen: Instant::now(),
            },
        );
        (session_id, wizard)
    }

    /// Look a session up and mark it as active.
    pub async fn get(&self, session_id: &Uuid) -> Option<Arc<Mutex<Wizard>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;
        entry.last_seen = Instant::now();
        Some(entry.wizard.clone())
    }

    pub async fn remove(&self, session_id: &Uuid) -> Option<Arc<Mutex<Wizard>>> {
        self.sessions
            .write()
            .await
            .remove(session_id)
            .map(|entry| entry.wizard)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop idle sessions now. Returns how many were removed.
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions)
    }

    /// Prune every `period`, for the life of the process.
    pub async fn run_reaper(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = self.prune_idle().await;
            if evicted > 0 {
                log::info!("Evicted {} idle wizard sessions", evicted);
            }
        }
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>) -> usize {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|session_id, entry| {
            if now.duration_since(entry.last_seen) < self.idle_timeout {
                return true;
            }
            // A session mid-submission or in use by a handler stays.
            let busy = match entry.wizard.try_lock() {
                Ok(wizard) => wizard.is_submitting(),
                Err(_) => true,
            };
            if !busy {
                log::debug!("Dropping idle wizard session {}", session_id);
            }
            busy
        });
        before - sessions.len()
    }
}
