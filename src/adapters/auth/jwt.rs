//! HS256 session token codec.
//!
//! Implements both `TokenSigner` and the signed-token `SessionVerifier`
//! strategy. Verification checks the signature, expiry and that the token
//! was minted for the codec's audience; it does not consult any store.
//!
//! # Example
//!
//! ```ignore
//! use rinawarp_site::adapters::auth::JwtCodec;
//! use rinawarp_site::ports::{SessionVerifier, TokenSigner};
//!
//! let codec = JwtCodec::new(secret, TokenAudience::Api);
//! let token = codec.sign(&claims)?;
//! let user = codec.verify(&token).await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::account::{SessionClaims, TokenAudience};
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{SessionVerifier, TokenSigner};

/// Signs and verifies HS256 session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    audience: TokenAudience,
}

impl JwtCodec {
    /// Signs any claims; verifies only tokens issued for `audience`.
    pub fn new(secret: &str, audience: TokenAudience) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            audience,
        }
    }

    /// Decodes and validates a token, returning its claims.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::debug!(error = %e, "Token validation failed");
                        AuthError::InvalidToken
                    }
                }
            })
    }
}

impl TokenSigner for JwtCodec {
    fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

#[async_trait]
impl SessionVerifier for JwtCodec {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode(token)?;

        let subject = claims.subject_for(self.audience).ok_or_else(|| {
            tracing::warn!(audience = ?self.audience, "Token has no subject for this audience");
            AuthError::InvalidToken
        })?;
        let user_id = UserId::new(subject).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(user_id, claims.email))
    }
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}
