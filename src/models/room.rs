use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable room category offered by a property.
///
/// The platform's room catalog names the price and occupancy fields
/// `base_price` / `max_occupancy`; the booking widgets use `price_per_night` /
/// `max_guests`. Both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: i64,
    pub name: String,
    #[serde(alias = "base_price", with = "crate::models::money")]
    pub price_per_night: Decimal,
    #[serde(alias = "max_occupancy")]
    pub max_guests: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "amenities")]
    pub features: Vec<String>,
}

/// Room catalog payloads come back either paginated or as a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoomCatalogResponse {
    Paginated { results: Vec<RoomType> },
    List(Vec<RoomType>),
}

impl RoomCatalogResponse {
    pub fn into_rooms(self) -> Vec<RoomType> {
        match self {
            RoomCatalogResponse::Paginated { results } => results,
            RoomCatalogResponse::List(rooms) => rooms,
        }
    }
}
