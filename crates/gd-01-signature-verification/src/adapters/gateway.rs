//! [`SignatureGateway`] for the ledger and governance engines.

use shared_types::{AuthorityError, Role, SignatureGateway};

use crate::domain::errors::SignatureError;
use crate::ports::inbound::SignatureVerificationApi;
use crate::ports::outbound::SignatureScheme;
use crate::service::SignatureVerifier;

impl From<SignatureError> for AuthorityError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::RoleNotBound { identifier, role } => AuthorityError::RoleNotBound {
                signer: identifier,
                role: role.to_string(),
            },
            SignatureError::KeyNotFound(identifier) | SignatureError::SignatureInvalid(identifier) => {
                AuthorityError::SignatureRejected {
                    reason: format!("no valid signature by {identifier}"),
                    signer: identifier,
                }
            }
            other => AuthorityError::SignatureRejected {
                signer: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

fn rejected(signer: &str, err: SignatureError) -> AuthorityError {
    match AuthorityError::from(err) {
        AuthorityError::SignatureRejected { reason, .. } => AuthorityError::SignatureRejected {
            signer: signer.to_string(),
            reason,
        },
        role_error => role_error,
    }
}

impl<S: SignatureScheme> SignatureGateway for SignatureVerifier<S> {
    fn verify_with_context(
        &self,
        message: &[u8],
        signature: &[u8],
        signer: &str,
        context: &str,
    ) -> Result<(), AuthorityError> {
        SignatureVerificationApi::verify_with_context(self, message, signature, signer, context.as_bytes())
            .map_err(|e| rejected(signer, e))
    }

    fn verify_role(
        &self,
        message: &[u8],
        signature: &[u8],
        signer: &str,
        role: Role,
        context: &str,
    ) -> Result<(), AuthorityError> {
        SignatureVerificationApi::verify_role(self, message, signature, signer, role, context.as_bytes())
            .map_err(|e| rejected(signer, e))
    }

    fn roles_of(&self, signer: &str) -> Vec<Role> {
        SignatureVerificationApi::roles_of(self, signer)
    }
}
