use rust_decimal::Decimal;
use serde::Serialize;

/// Cost breakdown derived from a draft and its selected room.
///
/// Recomputed on every read; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub nights: u32,
    #[serde(with = "crate::models::money")]
    pub price_per_night: Decimal,
    #[serde(with = "crate::models::money")]
    pub base_amount: Decimal,
    pub discount_percent: u32,
    #[serde(with = "crate::models::money")]
    pub discount_amount: Decimal,
    #[serde(with = "crate::models::money")]
    pub tax_amount: Decimal,
    #[serde(with = "crate::models::money")]
    pub service_fee: Decimal,
    #[serde(with = "crate::models::money")]
    pub total_amount: Decimal,
    pub discount_hint: Option<&'static str>,
}

impl PriceQuote {
    pub fn empty() -> Self {
        Self {
            nights: 0,
            price_per_night: Decimal::ZERO,
            base_amount: Decimal::ZERO,
            discount_percent: 0,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            discount_hint: None,
        }
    }
}
