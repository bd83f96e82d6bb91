use std::sync::Arc;

use anyhow::Error;
use tracing::info;

use super::{
    catalog::Catalog,
    config::{Config, DatastoreConfig},
    gateway::{Gateway, memory::MemoryGateway, postgrest::PostgrestGateway},
};

pub struct State {
    pub config: Config,
    pub catalog: Catalog,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, Error> {
        let gateway: Arc<dyn Gateway> = match &config.datastore {
            DatastoreConfig::Hosted { url, key } => {
                info!("Using hosted datastore at {url}");
                Arc::new(PostgrestGateway::new(url, key)?)
            }
            DatastoreConfig::Fixtures(path) => Arc::new(MemoryGateway::from_path(path)?),
        };

        Ok(Self::with_gateway(config, gateway))
    }

    pub fn with_gateway(config: Config, gateway: Arc<dyn Gateway>) -> Arc<Self> {
        Arc::new(Self {
            config,
            catalog: Catalog::new(gateway),
        })
    }
}
