//! Seams to the two remote collaborators: the ICRC ledger and the
//! authorization backend. Implementations own transport, encoding and retries.

use std::sync::Arc;

use async_trait::async_trait;
use candid::{Nat, Principal};

use crate::error::TransportError;
use crate::identity::Identity;
use crate::types::auth::{BackendResult, ConfirmLoginOk, SessionInfo};
use crate::types::ledger::{Account, Allowance, AllowanceArgs, ApproveArgs, ApproveResult, MetadataValue};

/// ICRC-1/ICRC-2 ledger endpoints used by the payment flow.
#[async_trait]
pub trait LedgerActor: Send + Sync {
    async fn icrc1_metadata(&self) -> Result<Vec<(String, MetadataValue)>, TransportError>;

    async fn icrc1_balance_of(&self, account: Account) -> Result<Nat, TransportError>;

    async fn icrc2_allowance(&self, args: AllowanceArgs) -> Result<Allowance, TransportError>;

    async fn icrc2_approve(&self, args: ApproveArgs) -> Result<ApproveResult, TransportError>;
}

/// Authorization backend endpoints. Each takes the session identifier.
#[async_trait]
pub trait AuthActor: Send + Sync {
    async fn confirm_login(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<ConfirmLoginOk>, TransportError>;

    async fn get_session_info(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<SessionInfo>, TransportError>;

    async fn complete_payment_setup(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<()>, TransportError>;

    async fn complete_authorize(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<String>, TransportError>;

    async fn deny_consent(&self, session_id: &str)
        -> Result<BackendResult<String>, TransportError>;
}

/// Builds actors that issue calls on behalf of an identity.
pub trait Connector: Send + Sync {
    fn ledger(&self, identity: &dyn Identity, canister_id: Principal) -> Arc<dyn LedgerActor>;

    fn auth(&self, identity: &dyn Identity) -> Arc<dyn AuthActor>;
}
