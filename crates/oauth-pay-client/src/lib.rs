pub mod amount;
pub mod auth;
pub mod config;
pub mod connector;
pub mod error;
pub mod identity;
pub mod payment;
pub mod token;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

// Re-exports for convenience
pub use auth::AuthApi;
pub use config::{ClientConfig, Network};
pub use connector::{AuthActor, Connector, LedgerActor};
pub use error::{AmountError, Error, TransportError};
pub use identity::{Identity, StaticIdentity};
pub use payment::{AllowanceDetails, PaymentApi};
pub use token::{TokenInfo, TokenInfoCache, TokenResolver};

/// Entry point bundling the authorization relay and the payment API over one
/// connector and one token metadata cache.
#[derive(Clone)]
pub struct Client {
    pub auth: AuthApi,
    pub payments: PaymentApi,
}

impl Client {
    /// Client with a fresh token metadata cache.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_cache(connector, TokenInfoCache::new())
    }

    /// Client sharing an existing cache, e.g. one kept for the whole session.
    pub fn with_cache(connector: Arc<dyn Connector>, cache: TokenInfoCache) -> Self {
        Self {
            auth: AuthApi::new(connector.clone()),
            payments: PaymentApi::new(connector, cache),
        }
    }
}
