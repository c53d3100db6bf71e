// Hotel catalog assembly and filtering over a fragmented relational store

pub mod assembler;
pub mod attributes;
pub mod catalog;
pub mod config;
pub mod control;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod filters;
pub mod geo;
pub mod memory_store;
pub mod reviews;
pub mod rooms;
pub mod store;
pub mod timers;

// Re-export key types for convenience
pub use assembler::{Assembly, EntityAssembler, Exclusion};
pub use catalog::{CatalogLister, Listing};
pub use config::CatalogConfig;
pub use control::{CancellationToken, ListControl};
pub use entities::{Address, HotelEntity, RoomEntity};
pub use error::{CatalogError, StoreError};
pub use filters::{Bounds, HotelFilters};
pub use memory_store::MemoryStore;
pub use store::CatalogStore;
pub use timers::Timers;
