use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The backend's `variant { ok: T; err: text }` reply shape.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendResult<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "err")]
    Err(String),
}

impl<T> BackendResult<T> {
    /// Map `ok` to the value and `err` to [`Error::Backend`] with the message verbatim.
    pub fn into_result(self) -> Result<T, Error> {
        match self {
            BackendResult::Ok(value) => Ok(value),
            BackendResult::Err(message) => Err(Error::Backend(message)),
        }
    }
}

/// What the front end should show after login.
#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextStep {
    /// The user still has to approve a payment allowance.
    #[serde(rename = "setup")]
    Setup,
    #[serde(rename = "consent")]
    Consent,
}

#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDetails {
    pub id: String,
    pub description: String,
}

#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentData {
    pub client_name: String,
    pub logo_uri: String,
    pub scopes: Vec<ScopeDetails>,
}

/// Reply of `confirm_login`.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmLoginOk {
    pub next_step: NextStep,
    pub consent_data: ConsentData,
    /// Ledgers the resource server accepts payment in.
    pub accepted_payment_canisters: Vec<Principal>,
}

/// Reply of `get_session_info`.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub client_name: String,
    pub resource_server_principal: Principal,
}
