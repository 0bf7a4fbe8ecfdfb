use std::sync::Arc;

use candid::Principal;
use tracing::{debug, info, warn};

use crate::connector::Connector;
use crate::error::Error;
use crate::identity::Identity;
use crate::types::auth::{BackendResult, ConfirmLoginOk, SessionInfo};

/// Relays session actions to the authorization backend.
///
/// Each call forwards to one backend endpoint and maps `err` to
/// [`Error::Backend`] with the backend's message. Nothing is validated or
/// retried locally; session state lives in the backend.
#[derive(Clone)]
pub struct AuthApi {
    connector: Arc<dyn Connector>,
}

impl AuthApi {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Check the requested scopes after login and learn the next step.
    pub async fn confirm_login(
        &self,
        identity: &dyn Identity,
        session_id: &str,
    ) -> Result<ConfirmLoginOk, Error> {
        debug!(session_id, "confirm_login");
        let reply = self.connector.auth(identity).confirm_login(session_id).await?;
        let ok = relay("confirm_login", session_id, reply)?;
        info!(session_id, next_step = ?ok.next_step, "login confirmed");
        Ok(ok)
    }

    /// Client name and resource server principal of the session.
    pub async fn get_session_info(
        &self,
        identity: &dyn Identity,
        session_id: &str,
    ) -> Result<SessionInfo, Error> {
        debug!(session_id, "get_session_info");
        let reply = self
            .connector
            .auth(identity)
            .get_session_info(session_id)
            .await?;
        relay("get_session_info", session_id, reply)
    }

    /// Tell the backend the payment allowance has been approved.
    pub async fn complete_payment_setup(
        &self,
        identity: &dyn Identity,
        session_id: &str,
    ) -> Result<(), Error> {
        debug!(session_id, "complete_payment_setup");
        let reply = self
            .connector
            .auth(identity)
            .complete_payment_setup(session_id)
            .await?;
        relay("complete_payment_setup", session_id, reply)?;
        info!(session_id, "payment setup completed");
        Ok(())
    }

    /// Grant consent. Returns the redirect URL carrying the authorization code.
    pub async fn complete_authorize(
        &self,
        identity: &dyn Identity,
        session_id: &str,
    ) -> Result<String, Error> {
        debug!(session_id, "complete_authorize");
        let reply = self
            .connector
            .auth(identity)
            .complete_authorize(session_id)
            .await?;
        let redirect = relay("complete_authorize", session_id, reply)?;
        info!(session_id, "authorization completed");
        Ok(redirect)
    }

    /// Deny consent. Returns the redirect URL carrying the error parameters.
    pub async fn deny_consent(
        &self,
        identity: &dyn Identity,
        session_id: &str,
    ) -> Result<String, Error> {
        debug!(session_id, "deny_consent");
        let reply = self.connector.auth(identity).deny_consent(session_id).await?;
        let redirect = relay("deny_consent", session_id, reply)?;
        info!(session_id, "consent denied");
        Ok(redirect)
    }

    /// Principal of the caller.
    pub fn own_principal(&self, identity: &dyn Identity) -> Principal {
        identity.principal()
    }
}

fn relay<T>(method: &str, session_id: &str, reply: BackendResult<T>) -> Result<T, Error> {
    reply.into_result().inspect_err(|e| {
        warn!(method, session_id, error = %e, "authorization backend returned an error");
    })
}
