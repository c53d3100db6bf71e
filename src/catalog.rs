// Catalog listing: every principal row is assembled independently and only
// the hotels that survive the filters are returned, in storage order.

use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{
    assembler::{Assembly, EntityAssembler, Exclusion},
    config::CatalogConfig,
    control::ListControl,
    entities::HotelEntity,
    error::CatalogError,
    filters::{HotelFilters, RoomPredicate},
    store::{CatalogStore, PrincipalRow},
    timers::Timers,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub hotels: Vec<HotelEntity>,
    // (hotel id, reason), in storage order
    pub excluded: Vec<(u64, Exclusion)>,
}

pub struct CatalogLister {
    store: Arc<dyn CatalogStore>,
    timers: Arc<Timers>,
    config: CatalogConfig,
}

impl CatalogLister {
    pub fn new(store: Arc<dyn CatalogStore>, timers: Arc<Timers>, config: CatalogConfig) -> Self {
        Self {
            store,
            timers,
            config,
        }
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // Hotels matching `filters`, bounded by the configured deadline and row timeout.
    pub async fn list(&self, filters: &HotelFilters) -> Result<Vec<HotelEntity>, CatalogError> {
        let control = ListControl::from_config(&self.config);
        Ok(self.list_with(filters, &control).await?.hotels)
    }

    pub async fn list_with(
        &self,
        filters: &HotelFilters,
        control: &ListControl,
    ) -> Result<Listing, CatalogError> {
        let started = Instant::now();

        match self.run(filters, control).await {
            Ok(listing) => {
                info!(
                    included = listing.hotels.len(),
                    excluded = listing.excluded.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "catalog listed"
                );
                Ok(listing)
            }
            Err(e) => {
                warn!(error = %e, elapsed_ms = started.elapsed().as_millis() as u64, "catalog listing aborted");
                Err(e)
            }
        }
    }

    async fn run(&self, filters: &HotelFilters, control: &ListControl) -> Result<Listing, CatalogError> {
        filters.validate()?;
        if let Some(search) = &filters.search {
            debug!(search = %search, "free text search is not applied");
        }

        control.check()?;
        let rows = self.store.principals().await?;
        let predicates = filters.room_predicates();
        let assembler = EntityAssembler::new(&*self.store, &self.timers)
            .with_batched_attributes(self.config.batch_attributes);

        let mut listing = Listing::default();
        let concurrency = self.config.effective_concurrency();

        if concurrency == 1 {
            for row in &rows {
                let assembly = assemble_row(&assembler, row, filters, &predicates, control).await?;
                listing.push(row, assembly);
            }
        } else {
            let (assembler, predicates) = (&assembler, &predicates);
            // `buffered` yields in input order, so storage order is kept
            let mut assemblies = stream::iter(rows.iter())
                .map(|row| async move {
                    let assembly = assemble_row(assembler, row, filters, predicates, control).await;
                    (row, assembly)
                })
                .buffered(concurrency);

            while let Some((row, assembly)) = assemblies.next().await {
                listing.push(row, assembly?);
            }
        }

        Ok(listing)
    }
}

impl Listing {
    fn push(&mut self, row: &PrincipalRow, assembly: Assembly) {
        match assembly {
            Assembly::Included(hotel) => self.hotels.push(hotel),
            Assembly::Excluded(reason) => self.excluded.push((row.id, reason)),
        }
    }
}

async fn assemble_row(
    assembler: &EntityAssembler<'_, dyn CatalogStore>,
    row: &PrincipalRow,
    filters: &HotelFilters,
    predicates: &[RoomPredicate],
    control: &ListControl,
) -> Result<Assembly, CatalogError> {
    control.check()?;

    let timed = async {
        let assembly = assembler.assemble_with(row, filters, predicates);
        match control.row_budget() {
            None => assembly.await,
            Some((budget, bounded_by_deadline)) => match tokio::time::timeout(budget, assembly).await {
                Ok(result) => result,
                Err(_) if bounded_by_deadline => Err(CatalogError::DeadlineExceeded),
                Err(_) => Err(CatalogError::RowTimeout(budget.as_millis() as u64)),
            },
        }
    };

    // a row in flight is dropped as soon as the token fires
    tokio::select! {
        _ = control.token.cancelled() => Err(CatalogError::Cancelled),
        result = timed => result,
    }
}
