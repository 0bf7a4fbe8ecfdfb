//! Client configuration: target network, canister ids and the identity
//! provider URL.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use candid::Principal;
use tracing::debug;

use crate::error::Error;

pub const AUTH_CANISTER: &str = "oauth_backend";
pub const IDENTITY_CANISTER: &str = "internet_identity";

const CANISTER_ID_PREFIX: &str = "CANISTER_ID_";
const LOCAL_HOST: &str = "http://127.0.0.1:4943";
const IC_HOST: &str = "https://icp-api.io";
const IC_IDENTITY_PROVIDER: &str = "https://identity.ic0.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Local,
    Ic,
}

impl Network {
    /// `DFX_NETWORK` if set, otherwise `ic` for `NODE_ENV=production` and
    /// `local` for anything else.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, Error> {
        match vars.get("DFX_NETWORK").map(String::as_str) {
            Some("local") => Ok(Network::Local),
            Some("ic") => Ok(Network::Ic),
            Some(other) => Err(Error::Config(format!("unsupported DFX_NETWORK: {other}"))),
            None if vars.get("NODE_ENV").map(String::as_str) == Some("production") => {
                Ok(Network::Ic)
            }
            None => Ok(Network::Local),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Local => "local",
            Network::Ic => "ic",
        }
    }

    /// Where dfx records canister ids for this network.
    pub fn canister_ids_path(&self) -> &'static str {
        match self {
            Network::Local => ".dfx/local/canister_ids.json",
            Network::Ic => "canister_ids.json",
        }
    }

    pub fn default_host(&self) -> &'static str {
        match self {
            Network::Local => LOCAL_HOST,
            Network::Ic => IC_HOST,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub network: Network,
    /// Replica URL calls are sent to.
    pub host: String,
    /// Canister name (lower-case) to id.
    pub canister_ids: BTreeMap<String, Principal>,
    pub identity_provider_url: String,
}

impl ClientConfig {
    /// Load from the process environment (after `.env`) and the dfx
    /// `canister_ids.json` of the selected network, relative to the
    /// working directory.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenvy::dotenv() {
            debug!(error = %e, "no .env loaded");
        }
        let vars: HashMap<String, String> = std::env::vars().collect();
        let network = Network::from_vars(&vars)?;
        let ids_json = read_canister_ids(Path::new(network.canister_ids_path()));
        Self::from_parts(network, ids_json.as_deref(), &vars)
    }

    /// Build from a dfx `canister_ids.json` document and environment
    /// variables. `CANISTER_ID_<NAME>` variables override the file.
    pub fn from_parts(
        network: Network,
        canister_ids_json: Option<&str>,
        vars: &HashMap<String, String>,
    ) -> Result<Self, Error> {
        let mut canister_ids = BTreeMap::new();

        if let Some(json) = canister_ids_json {
            let file: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)
                .map_err(|e| Error::Config(format!("invalid canister_ids.json: {e}")))?;
            for (name, per_network) in file {
                if let Some(id) = per_network.get(network.as_str()) {
                    canister_ids.insert(name.to_lowercase(), parse_principal(&name, id)?);
                }
            }
        }

        for (key, value) in vars {
            if let Some(name) = key.strip_prefix(CANISTER_ID_PREFIX) {
                if name.is_empty() || value.is_empty() {
                    continue;
                }
                canister_ids.insert(name.to_lowercase(), parse_principal(name, value)?);
            }
        }

        let identity_provider_url = match vars.get("II_URL").filter(|v| !v.is_empty()) {
            Some(url) => url.clone(),
            None => match network {
                Network::Ic => IC_IDENTITY_PROVIDER.to_string(),
                Network::Local => {
                    let id = canister_ids.get(IDENTITY_CANISTER).ok_or_else(|| {
                        Error::Config(format!(
                            "no {IDENTITY_CANISTER} canister id for the local network"
                        ))
                    })?;
                    format!("http://{}.localhost:4943/", id.to_text())
                }
            },
        };

        let host = vars
            .get("IC_HOST")
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| network.default_host().to_string());

        debug!(
            %network,
            %host,
            canisters = canister_ids.len(),
            "client config loaded"
        );

        Ok(Self {
            network,
            host,
            canister_ids,
            identity_provider_url,
        })
    }

    pub fn canister_id(&self, name: &str) -> Option<Principal> {
        self.canister_ids.get(&name.to_lowercase()).copied()
    }

    /// Id of the authorization backend canister.
    pub fn auth_canister_id(&self) -> Result<Principal, Error> {
        self.canister_id(AUTH_CANISTER)
            .ok_or_else(|| Error::Config(format!("no {AUTH_CANISTER} canister id configured")))
    }
}

fn read_canister_ids(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(json) => Some(json),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no canister ids file");
            None
        }
    }
}

fn parse_principal(name: &str, text: &str) -> Result<Principal, Error> {
    Principal::from_text(text)
        .map_err(|e| Error::Config(format!("invalid canister id for {name}: {e}")))
}
