use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::models::{draft::BookingDraft, quote::PriceQuote, room::RoomType};

/// GST charged on the discounted room cost (12%).
pub const TAX_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Flat platform fee per booking, in rupees.
pub const SERVICE_FEE: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub struct PricingService;

impl PricingService {
    /// Nights between two calendar dates; zero when either is missing or
    /// check-out is not after check-in.
    pub fn compute_nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
        match (check_in, check_out) {
            (Some(check_in), Some(check_out)) => {
                Self::compute_nights_between(
                    check_in.and_time(NaiveTime::MIN),
                    check_out.and_time(NaiveTime::MIN),
                )
            }
            _ => 0,
        }
    }

    /// Nights between two instants, counting any partial day as a full night.
    pub fn compute_nights_between(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
        let seconds = (end - start).num_seconds();
        if seconds <= 0 {
            return 0;
        }
        let nights = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        u32::try_from(nights).unwrap_or(u32::MAX)
    }

    /// Length-of-stay discount, highest tier first.
    pub fn compute_discount_percent(nights: u32) -> u32 {
        match nights {
            n if n >= 7 => 15,
            n if n >= 5 => 10,
            n if n >= 3 => 5,
            _ => 0,
        }
    }

    /// Nudge shown next to the price for the current stay length.
    pub fn discount_hint(nights: u32) -> Option<&'static str> {
        match nights {
            n if n >= 7 => Some("15% off for 7+ nights!"),
            n if n >= 5 => Some("10% off for 5+ nights!"),
            n if n >= 3 => Some("5% off for 3+ nights"),
            2 => Some("Stay 3+ nights for discount"),
            _ => None,
        }
    }

    /// Full price breakdown for a draft. Without a room or a valid date range
    /// nothing is charged, not even the service fee. A price too large to
    /// compute also quotes zero; the room step refuses it.
    pub fn compute_quote(draft: &BookingDraft, room: Option<&RoomType>) -> PriceQuote {
        Self::try_compute_quote(draft, room).unwrap_or_else(|| {
            log::warn!(
                "Quote overflowed for resort {} room {:?}",
                draft.resort_id,
                draft.room_type_id
            );
            let nights = Self::compute_nights(draft.check_in, draft.check_out);
            PriceQuote {
                nights,
                discount_hint: Self::discount_hint(nights),
                ..PriceQuote::empty()
            }
        })
    }

    /// Like [`compute_quote`](Self::compute_quote), but `None` when the amounts
    /// overflow.
    pub fn try_compute_quote(draft: &BookingDraft, room: Option<&RoomType>) -> Option<PriceQuote> {
        let nights = Self::compute_nights(draft.check_in, draft.check_out);
        let room = match room {
            Some(room) if nights > 0 => room,
            _ => {
                return Some(PriceQuote {
                    nights,
                    price_per_night: room.map(|r| r.price_per_night).unwrap_or_default(),
                    discount_hint: Self::discount_hint(nights),
                    ..PriceQuote::empty()
                })
            }
        };

        let base_amount = room.price_per_night.checked_mul(Decimal::from(nights))?;
        let discount_percent = Self::compute_discount_percent(nights);
        let discount_amount = base_amount
            .checked_mul(Decimal::from(discount_percent))?
            .checked_div(Decimal::ONE_HUNDRED)?;
        let taxable = base_amount.checked_sub(discount_amount)?;
        let tax_amount = taxable.checked_mul(TAX_RATE)?;
        let total_amount = taxable.checked_add(tax_amount)?.checked_add(SERVICE_FEE)?;

        Some(PriceQuote {
            nights,
            price_per_night: room.price_per_night,
            base_amount,
            discount_percent,
            discount_amount,
            tax_amount,
            service_fee: SERVICE_FEE,
            total_amount,
            discount_hint: Self::discount_hint(nights),
        })
    }

    /// Quote against the room the draft currently points at.
    pub fn quote_for(draft: &BookingDraft, rooms: &[RoomType]) -> PriceQuote {
        Self::compute_quote(draft, Self::selected_room(draft, rooms))
    }

    pub fn selected_room<'a>(draft: &BookingDraft, rooms: &'a [RoomType]) -> Option<&'a RoomType> {
        let room_type_id = draft.room_type_id?;
        rooms.iter().find(|room| room.id == room_type_id)
    }
}
