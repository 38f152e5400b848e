//! HS256 access tokens.
//!
//! Tokens are self-contained: nothing is stored server side, so a token stays
//! valid until `exp` even if the account is later deactivated.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::TokenResponseDto;
use crate::features::auth::model::Claims;
use crate::features::users::models::User;

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: i64,
    leeway_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_secs: config.token_expiry.as_secs() as i64,
            leeway_secs: config.jwt_leeway.as_secs(),
        }
    }

    /// Issue an access token for a user whose credentials were just checked
    pub fn issue(&self, user: &User) -> Result<TokenResponseDto> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.email.clone(),
            role: user.role,
            id: user.id.to_string(),
            iat: now,
            exp: now + self.expiry_secs,
        };

        Ok(TokenResponseDto {
            access_token: self.sign(&claims)?,
            token_type: "bearer".to_string(),
            expires_in: self.expiry_secs,
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {}", e);
            AppError::Internal(format!("Failed to sign access token: {}", e))
        })
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}
