// Per-entity attribute lookup over the sparse key/value store

use std::collections::HashMap;

use crate::{
    entities::Address,
    error::CatalogError,
    store::CatalogStore,
};

pub const ADDRESS_1: &str = "address_1";
pub const ADDRESS_2: &str = "address_2";
pub const ADDRESS_CITY: &str = "address_city";
pub const ADDRESS_ZIP: &str = "address_zip";
pub const ADDRESS_COUNTRY: &str = "address_country";
pub const GEO_LAT: &str = "geo_lat";
pub const GEO_LNG: &str = "geo_lng";
pub const COVER_IMAGE: &str = "coverImage";
pub const PHONE: &str = "phone";

pub const HOTEL_META_KEYS: [&str; 9] = [
    ADDRESS_1,
    ADDRESS_2,
    ADDRESS_CITY,
    ADDRESS_ZIP,
    ADDRESS_COUNTRY,
    GEO_LAT,
    GEO_LNG,
    COVER_IMAGE,
    PHONE,
];

// Attribute-derived part of a hotel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelMetas {
    pub address: Address,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    pub image_url: Option<String>,
    pub phone: Option<String>,
}

pub struct AttributeReader<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
    batch: bool,
}

impl<'a, S: CatalogStore + ?Sized> AttributeReader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store, batch: false }
    }

    pub fn batched(store: &'a S) -> Self {
        Self { store, batch: true }
    }

    // Single attribute of a single entity. Blank stored values count as absent.
    pub async fn get(&self, id: u64, key: &str) -> Result<Option<String>, CatalogError> {
        let value = self.store.principal_meta(id, key).await?;
        Ok(value.and_then(non_blank))
    }

    pub async fn hotel_metas(&self, id: u64) -> Result<HotelMetas, CatalogError> {
        let mut values: HashMap<String, String> = if self.batch {
            self.store
                .principal_metas(id, &HOTEL_META_KEYS)
                .await?
                .into_iter()
                .filter_map(|(k, v)| non_blank(v).map(|v| (k, v)))
                .collect()
        } else {
            let mut values = HashMap::with_capacity(HOTEL_META_KEYS.len());
            for key in HOTEL_META_KEYS {
                if let Some(value) = self.get(id, key).await? {
                    values.insert(key.to_string(), value);
                }
            }
            values
        };

        let geo_lat = parse_coordinate(id, GEO_LAT, values.remove(GEO_LAT))?;
        let geo_lng = parse_coordinate(id, GEO_LNG, values.remove(GEO_LNG))?;

        Ok(HotelMetas {
            address: Address {
                line1: values.remove(ADDRESS_1),
                line2: values.remove(ADDRESS_2),
                city: values.remove(ADDRESS_CITY),
                zip: values.remove(ADDRESS_ZIP),
                country: values.remove(ADDRESS_COUNTRY),
            },
            geo_lat,
            geo_lng,
            image_url: values.remove(COVER_IMAGE),
            phone: values.remove(PHONE),
        })
    }
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_coordinate(id: u64, key: &str, value: Option<String>) -> Result<Option<f64>, CatalogError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(CatalogError::malformed(format!("hotel {id}"), key, &raw)),
        },
    }
}
