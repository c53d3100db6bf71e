// Catalog entities returned to callers. They are built fresh for every listing
// and never mutated once handed out.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEntity {
    pub id: u64,
    pub owner_id: u64,
    pub title: String,
    pub price: f64,
    pub surface: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(rename = "type")]
    pub room_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelEntity {
    pub id: u64,
    pub name: String,
    pub address: Address,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    pub image_url: Option<String>,
    pub phone: Option<String>,
    // None whenever rating_count is 0
    pub rating: Option<i64>,
    pub rating_count: u64,
    pub cheapest_room: RoomEntity,
    // Only set when the listing was given an origin and a radius
    pub distance: Option<f64>,
}
