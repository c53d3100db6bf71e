// Listing filters and the typed room predicates derived from them

use serde::{Deserialize, Serialize};

use crate::{entities::RoomEntity, error::CatalogError, geo::GeoPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

// Every field is optional, an absent field imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelFilters {
    // Free text, carried but not used for filtering
    pub search: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    // Search radius in kilometers
    pub distance: Option<f64>,
    pub price: Bounds,
    pub surface: Bounds,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    pub origin: GeoPoint,
    pub radius_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    Price,
    Surface,
    Bedrooms,
    Bathrooms,
    Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    AtLeast(f64),
    AtMost(f64),
    OneOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomPredicate {
    pub field: RoomField,
    pub comparison: Comparison,
}

impl RoomPredicate {
    pub fn new(field: RoomField, comparison: Comparison) -> Self {
        Self { field, comparison }
    }

    pub fn matches(&self, room: &RoomEntity) -> bool {
        match (&self.comparison, self.field) {
            (Comparison::OneOf(types), RoomField::Type) => types.contains(&room.room_type),
            // a set comparison on a numeric field never holds
            (Comparison::OneOf(_), _) => false,
            (Comparison::AtLeast(bound), field) => {
                numeric_value(room, field).map_or(false, |v| v >= *bound)
            }
            (Comparison::AtMost(bound), field) => {
                numeric_value(room, field).map_or(false, |v| v <= *bound)
            }
        }
    }
}

fn numeric_value(room: &RoomEntity, field: RoomField) -> Option<f64> {
    match field {
        RoomField::Price => Some(room.price),
        RoomField::Surface => Some(room.surface),
        RoomField::Bedrooms => Some(room.bedrooms as f64),
        RoomField::Bathrooms => Some(room.bathrooms as f64),
        RoomField::Type => None,
    }
}

// True when the room satisfies every predicate. An empty list accepts all rooms.
pub fn matches_all(predicates: &[RoomPredicate], room: &RoomEntity) -> bool {
    predicates.iter().all(|p| p.matches(room))
}

impl HotelFilters {
    // Origin and radius, only when latitude, longitude and distance are all set.
    pub fn geo_radius(&self) -> Option<GeoRadius> {
        match (self.lat, self.lng, self.distance) {
            (Some(lat), Some(lng), Some(radius_km)) => Some(GeoRadius {
                origin: GeoPoint::new(lat, lng),
                radius_km,
            }),
            _ => None,
        }
    }

    // One predicate per present room filter, each bound to its own value.
    pub fn room_predicates(&self) -> Vec<RoomPredicate> {
        let mut predicates = Vec::new();

        if let Some(min) = self.surface.min {
            predicates.push(RoomPredicate::new(RoomField::Surface, Comparison::AtLeast(min)));
        }
        if let Some(max) = self.surface.max {
            predicates.push(RoomPredicate::new(RoomField::Surface, Comparison::AtMost(max)));
        }
        if let Some(min) = self.price.min {
            predicates.push(RoomPredicate::new(RoomField::Price, Comparison::AtLeast(min)));
        }
        if let Some(max) = self.price.max {
            predicates.push(RoomPredicate::new(RoomField::Price, Comparison::AtMost(max)));
        }
        if let Some(n) = self.bedrooms {
            predicates.push(RoomPredicate::new(
                RoomField::Bedrooms,
                Comparison::AtLeast(n as f64),
            ));
        }
        if let Some(n) = self.bathrooms {
            predicates.push(RoomPredicate::new(
                RoomField::Bathrooms,
                Comparison::AtLeast(n as f64),
            ));
        }
        match &self.types {
            Some(types) if !types.is_empty() => {
                predicates.push(RoomPredicate::new(
                    RoomField::Type,
                    Comparison::OneOf(types.clone()),
                ));
            }
            _ => {}
        }

        predicates
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let numbers = [
            ("lat", self.lat),
            ("lng", self.lng),
            ("distance", self.distance),
            ("price.min", self.price.min),
            ("price.max", self.price.max),
            ("surface.min", self.surface.min),
            ("surface.max", self.surface.max),
        ];
        for (name, value) in numbers {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CatalogError::InvalidFilter(format!("{name} is not finite")));
                }
            }
        }

        if let Some(lat) = self.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CatalogError::InvalidFilter(format!(
                    "lat {lat} outside [-90, 90]"
                )));
            }
        }
        if let Some(lng) = self.lng {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(CatalogError::InvalidFilter(format!(
                    "lng {lng} outside [-180, 180]"
                )));
            }
        }
        if let Some(radius) = self.distance {
            if radius < 0.0 {
                return Err(CatalogError::InvalidFilter(format!(
                    "distance {radius} is negative"
                )));
            }
        }

        Ok(())
    }
}
