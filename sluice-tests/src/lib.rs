mod bulk;
mod cancellation;
mod caching;
mod connection;
mod contexts;
mod entities;
mod reconciliation;
mod schema;

use crate::{
    bulk::bulk, cancellation::cancellation, caching::caching, contexts::contexts,
    reconciliation::reconciliation,
};
pub use connection::*;
pub use entities::*;
use log::LevelFilter;
pub use schema::*;
use sluice_core::{Driver, Engine, EntityMappings};
use std::{env, sync::Arc};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Mappings of the test entities, as declared on their properties.
pub fn standard_mappings() -> EntityMappings {
    let mut mappings = EntityMappings::new();
    mappings.register::<Person>().register::<LedgerEntry>();
    mappings
}

/// Engine with the dialect of `driver` reading the tables of `provider`.
pub fn engine<D: Driver>(driver: D, provider: Arc<InMemorySchemaProvider>) -> Engine {
    Engine::builder()
        .schema_provider(provider)
        .mappings(standard_mappings())
        .dialect(driver)
        .build()
        .expect("Could not build the engine")
}

/// Engine behavior every dialect must share.
pub async fn execute_tests<D: Driver + Clone>(driver: D) {
    caching(driver.clone()).await;
    reconciliation(driver.clone()).await;
    contexts(driver.clone()).await;
    bulk(driver.clone()).await;
    cancellation(driver).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
