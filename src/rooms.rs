// Cheapest qualifying room selection

use std::collections::HashMap;

use tracing::debug;

use crate::{
    entities::RoomEntity,
    error::CatalogError,
    filters::{matches_all, RoomPredicate},
    store::{CatalogStore, PostRow, POST_TYPE_ROOM},
};

pub const PRICE: &str = "price";
pub const SURFACE: &str = "surface";
pub const BEDROOMS: &str = "bedrooms_count";
pub const BATHROOMS: &str = "bathrooms_count";
pub const ROOM_TYPE: &str = "type";

pub const ROOM_META_KEYS: [&str; 5] = [PRICE, SURFACE, BEDROOMS, BATHROOMS, ROOM_TYPE];

pub struct SubResourceSelector<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> SubResourceSelector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    // Rooms of `owner_id` that carry every room attribute, ordered by id.
    pub async fn rooms(&self, owner_id: u64) -> Result<Vec<RoomEntity>, CatalogError> {
        let posts = self.store.posts_by_author(owner_id, POST_TYPE_ROOM).await?;

        let mut rooms = Vec::with_capacity(posts.len());
        for post in posts {
            let metas = self.store.post_metas(post.id, &ROOM_META_KEYS).await?;
            match room_from_metas(&post, metas)? {
                Some(room) => rooms.push(room),
                None => debug!(room_id = post.id, owner_id, "room skipped, incomplete attributes"),
            }
        }
        Ok(rooms)
    }

    // Lowest priced room satisfying every predicate, ties going to the lowest id.
    // `None` means no room qualifies and the owner must be excluded.
    pub async fn select_cheapest(
        &self,
        owner_id: u64,
        predicates: &[RoomPredicate],
    ) -> Result<Option<RoomEntity>, CatalogError> {
        let rooms = self.rooms(owner_id).await?;
        Ok(cheapest(rooms, predicates))
    }
}

pub fn cheapest(rooms: Vec<RoomEntity>, predicates: &[RoomPredicate]) -> Option<RoomEntity> {
    let mut best: Option<RoomEntity> = None;
    for room in rooms.into_iter().filter(|room| matches_all(predicates, room)) {
        let better = match &best {
            None => true,
            Some(current) => {
                room.price < current.price || (room.price == current.price && room.id < current.id)
            }
        };
        if better {
            best = Some(room);
        }
    }
    best
}

fn room_from_metas(
    post: &PostRow,
    mut metas: HashMap<String, String>,
) -> Result<Option<RoomEntity>, CatalogError> {
    let mut take = |key: &str| metas.remove(key).filter(|v| !v.trim().is_empty());

    let (Some(price), Some(surface), Some(bedrooms), Some(bathrooms), Some(room_type)) = (
        take(PRICE),
        take(SURFACE),
        take(BEDROOMS),
        take(BATHROOMS),
        take(ROOM_TYPE),
    ) else {
        return Ok(None);
    };

    Ok(Some(RoomEntity {
        id: post.id,
        owner_id: post.author_id,
        title: post.title.clone(),
        price: parse_amount(post.id, PRICE, &price)?,
        surface: parse_amount(post.id, SURFACE, &surface)?,
        bedrooms: parse_count(post.id, BEDROOMS, &bedrooms)?,
        bathrooms: parse_count(post.id, BATHROOMS, &bathrooms)?,
        room_type: room_type.trim().to_string(),
    }))
}

fn parse_amount(room_id: u64, key: &str, raw: &str) -> Result<f64, CatalogError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CatalogError::malformed(format!("room {room_id}"), key, raw))
}

fn parse_count(room_id: u64, key: &str, raw: &str) -> Result<u32, CatalogError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| CatalogError::malformed(format!("room {room_id}"), key, raw))
}
