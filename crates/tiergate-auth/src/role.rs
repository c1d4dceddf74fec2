//! Role resolution from delegated-capability tokens.

use crate::credentials::CredentialStore;
use tiergate_core::RoleDecision;
use tiergate_token::{Purpose, TokenService};

/// Resolve the role behind a delegated-capability token.
///
/// Total: every failure (no token, bad signature, expiry, wrong purpose,
/// unknown user, store unavailable) resolves to [`RoleDecision::public`].
pub async fn resolve_role(
    tokens: &TokenService,
    store: &dyn CredentialStore,
    token: Option<&str>,
) -> RoleDecision {
    let Some(token) = token else {
        tracing::debug!("No delegated token presented; resolving to public");
        return RoleDecision::public();
    };

    let verified = match tokens.verify(token, Purpose::Delegated) {
        Ok(verified) => verified,
        Err(e) => {
            tracing::info!(error = %e, "Delegated token rejected; resolving to public");
            return RoleDecision::public();
        }
    };

    match store.lookup(&verified.username).await {
        Ok(Some(record)) => {
            let decision = RoleDecision::for_user(record.username, record.role);
            tracing::debug!(
                user = %verified.username,
                role = %decision.role(),
                token_id = %verified.token_id,
                "Resolved role"
            );
            decision
        }
        Ok(None) => {
            tracing::warn!(user = %verified.username, "Token user no longer provisioned");
            RoleDecision::public()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Credential store unavailable; resolving to public");
            RoleDecision::public()
        }
    }
}
