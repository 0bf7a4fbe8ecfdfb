//! In-memory actors for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use candid::{Nat, Principal};

use crate::connector::{AuthActor, Connector, LedgerActor};
use crate::error::TransportError;
use crate::identity::Identity;
use crate::token::{DECIMALS_KEY, NAME_KEY, SYMBOL_KEY};
use crate::types::auth::{BackendResult, ConfirmLoginOk, ConsentData, NextStep, SessionInfo};
use crate::types::ledger::{
    Account, Allowance, AllowanceArgs, ApproveArgs, ApproveResult, MetadataValue,
};

/// Deterministic principal for a test ledger.
pub(crate) fn ledger_id(n: u8) -> Principal {
    Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0, n, 1, 1])
}

pub(crate) fn user_id(n: u8) -> Principal {
    Principal::from_slice(&[n; 29])
}

pub(crate) fn token_metadata(name: &str, symbol: &str, decimals: u8) -> Vec<(String, MetadataValue)> {
    vec![
        (
            "icrc1:fee".to_string(),
            MetadataValue::Nat(Nat::from(10_000u64)),
        ),
        (NAME_KEY.to_string(), MetadataValue::Text(name.to_string())),
        (SYMBOL_KEY.to_string(), MetadataValue::Text(symbol.to_string())),
        (DECIMALS_KEY.to_string(), MetadataValue::Nat(Nat::from(decimals))),
    ]
}

pub(crate) struct MockLedger {
    metadata: Vec<(String, MetadataValue)>,
    pub balance: Nat,
    pub allowance: Allowance,
    pub approve_reply: ApproveResult,
    /// When set, every call fails with [`TransportError::Rejected`].
    pub unreachable: bool,
    metadata_calls: AtomicUsize,
    pub approvals: Mutex<Vec<ApproveArgs>>,
    pub balance_queries: Mutex<Vec<Account>>,
    pub allowance_queries: Mutex<Vec<AllowanceArgs>>,
}

impl MockLedger {
    pub fn with_metadata(metadata: Vec<(String, MetadataValue)>) -> Self {
        Self {
            metadata,
            balance: Nat::from(0u64),
            allowance: Allowance {
                allowance: Nat::from(0u64),
                expires_at: None,
            },
            approve_reply: Ok(Nat::from(0u64)),
            unreachable: false,
            metadata_calls: AtomicUsize::new(0),
            approvals: Mutex::new(Vec::new()),
            balance_queries: Mutex::new(Vec::new()),
            allowance_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(name: &str, symbol: &str, decimals: u8) -> Self {
        Self::with_metadata(token_metadata(name, symbol, decimals))
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    fn check(&self, method: &str) -> Result<(), TransportError> {
        if self.unreachable {
            return Err(rejected(method));
        }
        Ok(())
    }
}

fn rejected(method: &str) -> TransportError {
    TransportError::Rejected {
        method: method.to_string(),
        message: "canister unreachable".to_string(),
    }
}

#[async_trait]
impl LedgerActor for MockLedger {
    async fn icrc1_metadata(&self) -> Result<Vec<(String, MetadataValue)>, TransportError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        // Suspend like a real call so concurrent resolutions can interleave.
        tokio::task::yield_now().await;
        self.check("icrc1_metadata")?;
        Ok(self.metadata.clone())
    }

    async fn icrc1_balance_of(&self, account: Account) -> Result<Nat, TransportError> {
        self.check("icrc1_balance_of")?;
        self.balance_queries.lock().unwrap().push(account);
        Ok(self.balance.clone())
    }

    async fn icrc2_allowance(&self, args: AllowanceArgs) -> Result<Allowance, TransportError> {
        self.check("icrc2_allowance")?;
        self.allowance_queries.lock().unwrap().push(args);
        Ok(self.allowance.clone())
    }

    async fn icrc2_approve(&self, args: ApproveArgs) -> Result<ApproveResult, TransportError> {
        self.check("icrc2_approve")?;
        self.approvals.lock().unwrap().push(args);
        Ok(self.approve_reply.clone())
    }
}

pub(crate) struct MockAuth {
    pub confirm_login: BackendResult<ConfirmLoginOk>,
    pub session_info: BackendResult<SessionInfo>,
    pub payment_setup: BackendResult<()>,
    pub authorize: BackendResult<String>,
    pub deny: BackendResult<String>,
    /// When set, every call fails with [`TransportError::Rejected`].
    pub unreachable: bool,
    /// `(method, session_id)` in call order.
    pub calls: Mutex<Vec<(&'static str, String)>>,
}

impl MockAuth {
    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, session_id: &str) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((method, session_id.to_string()));
        if self.unreachable {
            return Err(rejected(method));
        }
        Ok(())
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self {
            confirm_login: BackendResult::Ok(ConfirmLoginOk {
                next_step: NextStep::Setup,
                consent_data: ConsentData {
                    client_name: "Demo App".into(),
                    logo_uri: "https://demo.app/logo.png".into(),
                    scopes: Vec::new(),
                },
                accepted_payment_canisters: vec![ledger_id(1)],
            }),
            session_info: BackendResult::Ok(SessionInfo {
                client_name: "Demo App".into(),
                resource_server_principal: user_id(9),
            }),
            payment_setup: BackendResult::Ok(()),
            authorize: BackendResult::Ok("https://demo.app/callback?code=abc".into()),
            deny: BackendResult::Ok("https://demo.app/callback?error=access_denied".into()),
            unreachable: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuthActor for MockAuth {
    async fn confirm_login(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<ConfirmLoginOk>, TransportError> {
        self.record("confirm_login", session_id)?;
        Ok(self.confirm_login.clone())
    }

    async fn get_session_info(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<SessionInfo>, TransportError> {
        self.record("get_session_info", session_id)?;
        Ok(self.session_info.clone())
    }

    async fn complete_payment_setup(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<()>, TransportError> {
        self.record("complete_payment_setup", session_id)?;
        Ok(self.payment_setup.clone())
    }

    async fn complete_authorize(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<String>, TransportError> {
        self.record("complete_authorize", session_id)?;
        Ok(self.authorize.clone())
    }

    async fn deny_consent(
        &self,
        session_id: &str,
    ) -> Result<BackendResult<String>, TransportError> {
        self.record("deny_consent", session_id)?;
        Ok(self.deny.clone())
    }
}

/// Hands out pre-registered ledgers; unknown ledgers get empty metadata.
pub(crate) struct MockConnector {
    ledgers: HashMap<Principal, Arc<MockLedger>>,
    auth: Arc<MockAuth>,
    /// Principals of the identities actors were built for.
    pub callers: Mutex<Vec<Principal>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            ledgers: HashMap::new(),
            auth: Arc::new(MockAuth::default()),
            callers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_ledger(mut self, canister_id: Principal, ledger: Arc<MockLedger>) -> Self {
        self.ledgers.insert(canister_id, ledger);
        self
    }

    pub fn with_auth(mut self, auth: Arc<MockAuth>) -> Self {
        self.auth = auth;
        self
    }
}

impl Connector for MockConnector {
    fn ledger(&self, identity: &dyn Identity, canister_id: Principal) -> Arc<dyn LedgerActor> {
        self.callers.lock().unwrap().push(identity.principal());
        match self.ledgers.get(&canister_id) {
            Some(ledger) => ledger.clone(),
            None => Arc::new(MockLedger::with_metadata(Vec::new())),
        }
    }

    fn auth(&self, identity: &dyn Identity) -> Arc<dyn AuthActor> {
        self.callers.lock().unwrap().push(identity.principal());
        self.auth.clone()
    }
}
