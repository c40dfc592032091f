//! Serde helpers for currency amounts.
//!
//! The platform exchanges amounts as fixed-point strings (`"60000.00"`), so every
//! money field is written with exactly two decimal places. Incoming values may be
//! strings or bare JSON numbers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_fixed(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer)
}

/// Format an amount with two decimal places, rounding half away from zero.
pub fn to_fixed(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
