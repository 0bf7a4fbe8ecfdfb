use std::sync::Arc;

use candid::{Nat, Principal};
use num_bigint::BigUint;
use tracing::{debug, info, warn};

use crate::amount;
use crate::auth::AuthApi;
use crate::connector::Connector;
use crate::error::Error;
use crate::identity::Identity;
use crate::token::{TokenInfo, TokenInfoCache, TokenResolver};
use crate::types::ledger::{Account, AllowanceArgs, ApproveArgs};

/// Current allowance of a spender, with its expiry if the ledger reports one.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowanceDetails {
    pub amount: f64,
    /// `YYYY-MM-DD HH:MM:SS UTC`.
    pub expires_at: Option<String>,
}

/// Payment pre-authorization against ICRC-2 ledgers.
///
/// A flow runs approve, then complete setup. Ordering is the caller's
/// responsibility; the backend rejects out-of-order steps.
#[derive(Clone)]
pub struct PaymentApi {
    connector: Arc<dyn Connector>,
    tokens: TokenResolver,
    auth: AuthApi,
}

impl PaymentApi {
    pub fn new(connector: Arc<dyn Connector>, cache: TokenInfoCache) -> Self {
        Self {
            tokens: TokenResolver::new(connector.clone(), cache),
            auth: AuthApi::new(connector.clone()),
            connector,
        }
    }

    pub fn tokens(&self) -> &TokenResolver {
        &self.tokens
    }

    /// Name, symbol and decimals of a ledger, served from the cache when known.
    pub async fn token_info(
        &self,
        identity: &dyn Identity,
        ledger_id: Principal,
    ) -> Result<TokenInfo, Error> {
        self.tokens.resolve(identity, ledger_id).await
    }

    /// Approve `spender` to draw `amount` (a decimal string) from the caller's
    /// default account. Returns the ledger's block index for the approval.
    pub async fn approve_allowance(
        &self,
        identity: &dyn Identity,
        amount: &str,
        spender: Principal,
        ledger_id: Principal,
    ) -> Result<Nat, Error> {
        let token = self.tokens.resolve(identity, ledger_id).await?;
        let units = amount::to_ledger_amount(amount, token.decimals)?;
        self.submit_approval(identity, &token, units, spender).await
    }

    /// Same as [`approve_allowance`](Self::approve_allowance) for a UI float.
    pub async fn approve_allowance_f64(
        &self,
        identity: &dyn Identity,
        amount: f64,
        spender: Principal,
        ledger_id: Principal,
    ) -> Result<Nat, Error> {
        let token = self.tokens.resolve(identity, ledger_id).await?;
        let units = amount::to_ledger_amount_f64(amount, token.decimals)?;
        self.submit_approval(identity, &token, units, spender).await
    }

    async fn submit_approval(
        &self,
        identity: &dyn Identity,
        token: &TokenInfo,
        units: BigUint,
        spender: Principal,
    ) -> Result<Nat, Error> {
        let ledger_id = token.canister_id;
        debug!(ledger = %ledger_id, spender = %spender, units = %units, "submitting icrc2_approve");

        let args = ApproveArgs::new(Account::new(spender), Nat(units));
        let reply = self
            .connector
            .ledger(identity, ledger_id)
            .icrc2_approve(args)
            .await?;

        match reply {
            Ok(block_index) => {
                info!(
                    ledger = %ledger_id,
                    spender = %spender,
                    symbol = %token.symbol,
                    block_index = %block_index.0,
                    "allowance approved"
                );
                Ok(block_index)
            }
            Err(e) => {
                warn!(ledger = %ledger_id, spender = %spender, error = ?e, "allowance rejected");
                Err(Error::AllowanceRejected(e.tag().to_string()))
            }
        }
    }

    /// Caller's balance on the default account, in token units.
    pub async fn get_balance(
        &self,
        identity: &dyn Identity,
        ledger_id: Principal,
    ) -> Result<f64, Error> {
        let token = self.tokens.resolve(identity, ledger_id).await?;
        let owner = identity.principal();
        let raw = self
            .connector
            .ledger(identity, ledger_id)
            .icrc1_balance_of(Account::new(owner))
            .await?;
        debug!(ledger = %ledger_id, owner = %owner, raw = %raw.0, "balance");
        Ok(amount::to_decimal_amount(&raw.0, token.decimals))
    }

    /// Remaining allowance of `spender` over the caller's default account.
    pub async fn get_allowance(
        &self,
        identity: &dyn Identity,
        spender: Principal,
        ledger_id: Principal,
    ) -> Result<f64, Error> {
        Ok(self
            .get_allowance_details(identity, spender, ledger_id)
            .await?
            .amount)
    }

    /// Like [`get_allowance`](Self::get_allowance), with the expiry.
    pub async fn get_allowance_details(
        &self,
        identity: &dyn Identity,
        spender: Principal,
        ledger_id: Principal,
    ) -> Result<AllowanceDetails, Error> {
        let token = self.tokens.resolve(identity, ledger_id).await?;
        let args = AllowanceArgs {
            account: Account::new(identity.principal()),
            spender: Account::new(spender),
        };
        let reply = self
            .connector
            .ledger(identity, ledger_id)
            .icrc2_allowance(args)
            .await?;
        debug!(ledger = %ledger_id, spender = %spender, raw = %reply.allowance.0, "allowance");

        let expires_at = reply.expires_at.and_then(format_expiry);
        Ok(AllowanceDetails {
            amount: amount::to_decimal_amount(&reply.allowance.0, token.decimals),
            expires_at,
        })
    }

    /// Notify the authorization backend that the allowance is in place.
    pub async fn complete_payment_setup(
        &self,
        identity: &dyn Identity,
        session_id: &str,
    ) -> Result<(), Error> {
        self.auth.complete_payment_setup(identity, session_id).await
    }
}

/// Render a ledger timestamp (nanoseconds since epoch).
fn format_expiry(nanos: u64) -> Option<String> {
    let dt = time::OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos)).ok()?;
    let format = time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
    );
    dt.format(format).ok()
}
