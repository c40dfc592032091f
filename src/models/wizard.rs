use serde::{Serialize, Serializer};

/// The five screens of the booking flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Dates = 1,
    Guests = 2,
    Room = 3,
    Contact = 4,
    Review = 5,
}

impl WizardStep {
    pub const TOTAL: u8 = 5;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::Dates),
            2 => Some(WizardStep::Guests),
            3 => Some(WizardStep::Room),
            4 => Some(WizardStep::Contact),
            5 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Dates => "Select Dates",
            WizardStep::Guests => "Number of Guests",
            WizardStep::Room => "Select Room Type",
            WizardStep::Contact => "Guest Details",
            WizardStep::Review => "Review & Confirm",
        }
    }
}

impl Serialize for WizardStep {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}
