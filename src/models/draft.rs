use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::room::RoomType;

const DEFAULT_ADULTS: u32 = 2;

/// The in-progress reservation a guest edits while walking through the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub resort_id: i64,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub room_type_id: Option<i64>,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default)]
    pub special_requests: String,
}

/// Where one guest's draft for one property is kept.
///
/// `owner` is the opaque token handed back to the client when a wizard opens;
/// drafts from different owners never see each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub owner: Uuid,
    pub resort_id: i64,
}

impl DraftKey {
    pub fn new(owner: Uuid, resort_id: i64) -> Self {
        Self { owner, resort_id }
    }
}

/// Values handed to the wizard when it is opened from a listing page.
///
/// Anything set here wins over a rehydrated draft.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitialProps {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
}

/// Partial edit of a draft. The property id is not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub room_type_id: Option<i64>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub special_requests: Option<String>,
}

impl BookingDraft {
    /// Fresh draft for a property, preselecting the first offered room.
    pub fn new(resort_id: i64, rooms: &[RoomType]) -> Self {
        Self {
            resort_id,
            check_in: None,
            check_out: None,
            adults: DEFAULT_ADULTS,
            children: 0,
            room_type_id: rooms.first().map(|room| room.id),
            guest_name: String::new(),
            guest_email: String::new(),
            guest_phone: String::new(),
            special_requests: String::new(),
        }
    }

    /// Saturates so an absurd count can never wrap under a room's capacity.
    pub fn total_guests(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    pub fn with_overrides(mut self, initial: &InitialProps) -> Self {
        if let Some(check_in) = initial.check_in {
            self.check_in = Some(check_in);
        }
        if let Some(check_out) = initial.check_out {
            self.check_out = Some(check_out);
        }
        if let Some(adults) = initial.adults {
            self.adults = adults;
        }
        if let Some(children) = initial.children {
            self.children = children;
        }
        self
    }

    pub fn apply(&mut self, update: DraftUpdate) {
        if let Some(check_in) = update.check_in {
            self.check_in = Some(check_in);
        }
        if let Some(check_out) = update.check_out {
            self.check_out = Some(check_out);
        }
        if let Some(adults) = update.adults {
            self.adults = adults;
        }
        if let Some(children) = update.children {
            self.children = children;
        }
        if let Some(room_type_id) = update.room_type_id {
            self.room_type_id = Some(room_type_id);
        }
        if let Some(guest_name) = update.guest_name {
            self.guest_name = guest_name;
        }
        if let Some(guest_email) = update.guest_email {
            self.guest_email = guest_email;
        }
        if let Some(guest_phone) = update.guest_phone {
            self.guest_phone = guest_phone;
        }
        if let Some(special_requests) = update.special_requests {
            self.special_requests = special_requests;
        }
    }
}
