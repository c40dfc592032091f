use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use url::form_urlencoded;

use crate::models::{draft::BookingDraft, quote::PriceQuote, room::RoomType};

pub struct WhatsAppService;

impl WhatsAppService {
    /// Plain-text inquiry a guest sends to the property to confirm a stay.
    pub fn build_inquiry_message(
        resort_name: &str,
        draft: &BookingDraft,
        room: Option<&RoomType>,
        quote: &PriceQuote,
    ) -> String {
        let mut message = format!("Hi! I'm interested in booking at *{}*\n\n", resort_name);
        message += &format!("📅 *Check-in:* {}\n", format_date(draft.check_in));
        message += &format!("📅 *Check-out:* {}\n", format_date(draft.check_out));
        message += &format!(
            "🛏️ *Room Type:* {}\n",
            room.map(|room| room.name.as_str()).unwrap_or("")
        );
        message += &format!("👥 *Guests:* {}\n", draft.total_guests());
        message += &format!("🌙 *Nights:* {}\n\n", quote.nights);

        if quote.discount_amount > Decimal::ZERO {
            message += &format!("💰 *Room Cost:* ₹{}\n", format_inr(quote.base_amount));
            message += &format!("🎉 *Discount:* -₹{}\n", format_inr(quote.discount_amount));
        }
        message += &format!("💳 *Total Amount:* ₹{}\n\n", format_inr(quote.total_amount));

        if !draft.special_requests.trim().is_empty() {
            message += &format!("📝 *Special Requests:*\n{}\n\n", draft.special_requests.trim());
        }

        message += "Please confirm availability and share booking details. Thank you!";
        message
    }

    pub fn whatsapp_link(number: &str, message: &str) -> String {
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("text", message)
            .finish();
        format!("https://wa.me/{}?{}", digits, query)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%-d %b %Y").to_string())
        .unwrap_or_default()
}

/// Whole rupees with Indian digit grouping (`1,20,000`).
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    if digits.len() <= 3 {
        return format!("{}{}", sign, digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{}{},{}", sign, groups.join(","), tail)
}
