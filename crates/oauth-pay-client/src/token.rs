use std::collections::HashMap;
use std::sync::Arc;

use candid::Principal;
use tokio::sync::RwLock;
use tracing::debug;

use crate::connector::Connector;
use crate::error::Error;
use crate::identity::Identity;
use crate::types::ledger::MetadataValue;

pub const DECIMALS_KEY: &str = "icrc1:decimals";
pub const NAME_KEY: &str = "icrc1:name";
pub const SYMBOL_KEY: &str = "icrc1:symbol";

/// Token metadata of an ICRC ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub canister_id: Principal,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    /// Extract name, symbol and decimals from an `icrc1_metadata` reply.
    ///
    /// Keys are looked up first-match. A missing or non-numeric decimals
    /// entry, or an empty or missing name or symbol, is
    /// [`Error::MetadataIncomplete`].
    pub fn from_metadata(
        canister_id: Principal,
        metadata: &[(String, MetadataValue)],
    ) -> Result<Self, Error> {
        let find = |key: &str| {
            metadata
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value)
        };

        let decimals = match find(DECIMALS_KEY) {
            Some(MetadataValue::Nat(n)) => u8::try_from(&n.0).ok(),
            Some(other) => {
                debug!(key = DECIMALS_KEY, value = %other, "unexpected metadata value");
                None
            }
            None => None,
        };
        let text = |key: &str| match find(key) {
            Some(MetadataValue::Text(t)) if !t.is_empty() => Some(t.clone()),
            _ => None,
        };

        match (decimals, text(NAME_KEY), text(SYMBOL_KEY)) {
            (Some(decimals), Some(name), Some(symbol)) => Ok(Self {
                canister_id,
                name,
                symbol,
                decimals,
            }),
            _ => Err(Error::MetadataIncomplete {
                canister_id: canister_id.to_text(),
            }),
        }
    }
}

/// Process-lifetime cache of token metadata keyed by the ledger's textual
/// principal. Entries are never evicted. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct TokenInfoCache {
    entries: Arc<RwLock<HashMap<String, TokenInfo>>>,
}

impl TokenInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, canister_id: &Principal) -> Option<TokenInfo> {
        self.entries
            .read()
            .await
            .get(&canister_id.to_text())
            .cloned()
    }

    /// Insert or replace the entry for `info.canister_id`.
    pub async fn insert(&self, info: TokenInfo) {
        self.entries
            .write()
            .await
            .insert(info.canister_id.to_text(), info);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Resolves [`TokenInfo`] through the cache, querying the ledger on a miss.
#[derive(Clone)]
pub struct TokenResolver {
    connector: Arc<dyn Connector>,
    cache: TokenInfoCache,
}

impl TokenResolver {
    pub fn new(connector: Arc<dyn Connector>, cache: TokenInfoCache) -> Self {
        Self { connector, cache }
    }

    pub fn cache(&self) -> &TokenInfoCache {
        &self.cache
    }

    /// Return the metadata of `canister_id`, issuing at most one
    /// `icrc1_metadata` call per uncached ledger.
    ///
    /// The cache lock is not held across the remote call; concurrent first
    /// resolutions of one ledger each query it and the last write wins.
    pub async fn resolve(
        &self,
        identity: &dyn Identity,
        canister_id: Principal,
    ) -> Result<TokenInfo, Error> {
        if let Some(info) = self.cache.get(&canister_id).await {
            debug!(ledger = %canister_id, "token metadata cache hit");
            return Ok(info);
        }

        debug!(ledger = %canister_id, "fetching token metadata");
        let ledger = self.connector.ledger(identity, canister_id);
        let metadata = ledger.icrc1_metadata().await?;
        let info = TokenInfo::from_metadata(canister_id, &metadata)?;

        self.cache.insert(info.clone()).await;
        debug!(
            ledger = %canister_id,
            symbol = %info.symbol,
            decimals = info.decimals,
            "cached token metadata"
        );
        Ok(info)
    }
}
