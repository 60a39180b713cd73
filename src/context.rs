use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{AssetSource, BlobStorage, Clock};
use crate::store::TicketStore;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: TicketStore,
    pub logo: Arc<dyn AssetSource>,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn BlobStorage>,
        logo: Arc<dyn AssetSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store: TicketStore::new(storage, clock.clone()),
            logo,
            clock,
        }
    }
}
