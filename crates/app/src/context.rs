//! App Context

use std::sync::Arc;

use posy::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    api::{
        ApiError, CartApi, GeocodeApi, HttpApi, OrdersApi, ProductsApi, PromoApi, ShopsApi,
    },
    config::{AppConfig, ConfigError},
    notify::Notifier,
    platform::PlatformBridge,
    storage::{ContactStorage, JsonFileStorage},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build API client")]
    Api(#[source] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Clone)]
pub struct AppContext {
    pub cart: Arc<dyn CartApi>,
    pub products: Arc<dyn ProductsApi>,
    pub shops: Arc<dyn ShopsApi>,
    pub orders: Arc<dyn OrdersApi>,
    pub promo: Arc<dyn PromoApi>,
    pub geocode: Arc<dyn GeocodeApi>,
    pub storage: Arc<dyn ContactStorage>,
    pub platform: Arc<dyn PlatformBridge>,
    pub notifier: Arc<dyn Notifier>,
    pub aliases: Arc<CityAliases>,
    pub delivery_fee: Decimal,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("aliases", &self.aliases.len())
            .field("delivery_fee", &self.delivery_fee)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context talking to the backend over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error when the API client cannot be built or the city alias
    /// table cannot be loaded.
    pub async fn from_config(
        config: &AppConfig,
        platform: Arc<dyn PlatformBridge>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppInitError> {
        let api = Arc::new(HttpApi::new(config.api.to_api_config()?).map_err(AppInitError::Api)?);
        let aliases = config.checkout.load_aliases().await?;
        let delivery_fee = config.checkout.delivery_fee()?;

        Ok(Self {
            cart: api.clone(),
            products: api.clone(),
            shops: api.clone(),
            orders: api.clone(),
            promo: api.clone(),
            geocode: api,
            storage: Arc::new(JsonFileStorage::new(&config.checkout.storage_dir)),
            platform,
            notifier,
            aliases: Arc::new(aliases),
            delivery_fee,
        })
    }
}
