// Turns one principal row into one hotel, or into an exclusion

use std::fmt;

use tracing::debug;

use crate::{
    attributes::AttributeReader,
    entities::HotelEntity,
    error::CatalogError,
    filters::{HotelFilters, RoomPredicate},
    geo::{distance_km, GeoPoint},
    reviews::ReviewAggregator,
    rooms::SubResourceSelector,
    store::{CatalogStore, PrincipalRow},
    timers::Timers,
};

// Why a candidate was left out of a listing. Never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exclusion {
    NoQualifyingRoom,
    MissingCoordinates,
    OutsideRadius { distance_km: f64, radius_km: f64 },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::NoQualifyingRoom => write!(f, "no room matches the criteria"),
            Exclusion::MissingCoordinates => write!(f, "no coordinates for a radius search"),
            Exclusion::OutsideRadius {
                distance_km,
                radius_km,
            } => write!(f, "{distance_km:.3}km is outside the {radius_km}km radius"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    Included(HotelEntity),
    Excluded(Exclusion),
}

impl Assembly {
    pub fn into_hotel(self) -> Option<HotelEntity> {
        match self {
            Assembly::Included(hotel) => Some(hotel),
            Assembly::Excluded(_) => None,
        }
    }
}

pub struct EntityAssembler<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
    timers: &'a Timers,
    batch_attributes: bool,
}

impl<'a, S: CatalogStore + ?Sized> EntityAssembler<'a, S> {
    pub fn new(store: &'a S, timers: &'a Timers) -> Self {
        Self {
            store,
            timers,
            batch_attributes: false,
        }
    }

    pub fn with_batched_attributes(mut self, batch: bool) -> Self {
        self.batch_attributes = batch;
        self
    }

    pub async fn assemble(
        &self,
        row: &PrincipalRow,
        filters: &HotelFilters,
    ) -> Result<Assembly, CatalogError> {
        let predicates = filters.room_predicates();
        self.assemble_with(row, filters, &predicates).await
    }

    // Same as `assemble`, with room predicates built once by the caller
    pub async fn assemble_with(
        &self,
        row: &PrincipalRow,
        filters: &HotelFilters,
        predicates: &[RoomPredicate],
    ) -> Result<Assembly, CatalogError> {
        self.timers
            .time("assemble", self.assemble_timed(row, filters, predicates))
            .await
    }

    async fn assemble_timed(
        &self,
        row: &PrincipalRow,
        filters: &HotelFilters,
        predicates: &[RoomPredicate],
    ) -> Result<Assembly, CatalogError> {
        let attributes = if self.batch_attributes {
            AttributeReader::batched(self.store)
        } else {
            AttributeReader::new(self.store)
        };
        let metas = self.timers.time("meta", attributes.hotel_metas(row.id)).await?;

        let reviews = self
            .timers
            .time("reviews", ReviewAggregator::new(self.store).aggregate(row.id))
            .await?;

        let cheapest_room = self
            .timers
            .time(
                "cheapest_room",
                SubResourceSelector::new(self.store).select_cheapest(row.id, predicates),
            )
            .await?;

        let Some(cheapest_room) = cheapest_room else {
            return Ok(self.exclude(row, Exclusion::NoQualifyingRoom));
        };

        let mut distance = None;
        if let Some(radius) = filters.geo_radius() {
            let (Some(lat), Some(lng)) = (metas.geo_lat, metas.geo_lng) else {
                return Ok(self.exclude(row, Exclusion::MissingCoordinates));
            };

            let d = distance_km(radius.origin, GeoPoint::new(lat, lng))?;
            if d > radius.radius_km {
                return Ok(self.exclude(
                    row,
                    Exclusion::OutsideRadius {
                        distance_km: d,
                        radius_km: radius.radius_km,
                    },
                ));
            }
            distance = Some(d);
        }

        Ok(Assembly::Included(HotelEntity {
            id: row.id,
            name: row.display_name.clone(),
            address: metas.address,
            geo_lat: metas.geo_lat,
            geo_lng: metas.geo_lng,
            image_url: metas.image_url,
            phone: metas.phone,
            rating: reviews.rating,
            rating_count: reviews.count,
            cheapest_room,
            distance,
        }))
    }

    fn exclude(&self, row: &PrincipalRow, reason: Exclusion) -> Assembly {
        debug!(hotel_id = row.id, %reason, "hotel excluded");
        Assembly::Excluded(reason)
    }
}
