//! JWT token issuing and verification
//! Carries the caller's organization, role and member identity

use crate::{config::SecurityConfig, error::AppError};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (member email)
    pub sub: String,

    /// Organization the member belongs to
    pub org_id: i64,

    /// Role name, e.g. "Admin" or "Sales Rep"
    pub role: String,

    /// Member id
    pub member_id: i64,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Why a token was refused. Callers treat all of them as "no identity".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// JWT service
pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AppError> {
        let algorithm = parse_algorithm(&security.jwt_algorithm)?;

        let (encoding_key, decoding_key) = if security.uses_eddsa() {
            let private_pem = security
                .jwt_private_key_pem
                .as_ref()
                .ok_or_else(|| AppError::Config("EdDSA private key missing".to_string()))?;
            let public_pem = security
                .jwt_public_key_pem
                .as_ref()
                .ok_or_else(|| AppError::Config("EdDSA public key missing".to_string()))?;

            let encoding_key = EncodingKey::from_ed_pem(private_pem.expose_secret().as_bytes())
                .map_err(|e| AppError::Config(format!("Invalid EdDSA private key: {}", e)))?;
            let decoding_key = DecodingKey::from_ed_pem(public_pem.as_bytes())
                .map_err(|e| AppError::Config(format!("Invalid EdDSA public key: {}", e)))?;
            (encoding_key, decoding_key)
        } else {
            let secret = security.jwt_secret.expose_secret();

            // Ensure secret is at least 32 bytes for HMAC
            if secret.len() < 32 {
                return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
            }

            (
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
            )
        };

        Ok(Self {
            algorithm,
            encoding_key,
            decoding_key,
            token_exp_secs: security.token_exp_secs,
        })
    }

    pub fn token_exp_secs(&self) -> u64 {
        self.token_exp_secs
    }

    /// Issue a token valid for the configured lifetime
    pub fn issue(
        &self,
        subject: &str,
        org_id: i64,
        role: &str,
        member_id: i64,
    ) -> Result<String, AppError> {
        self.issue_at(subject, org_id, role, member_id, Utc::now().timestamp())
    }

    /// Issue a token as if the clock read `now` (unix seconds)
    pub fn issue_at(
        &self,
        subject: &str,
        org_id: i64,
        role: &str,
        member_id: i64,
        now: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            org_id,
            role: role.to_string(),
            member_id,
            iat: now,
            exp: now + self.token_exp_secs as i64,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Verify structure, signature and expiry against the current clock
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify as if the clock read `now`. A token is expired once `now >= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below so the boundary is exclusive and leeway-free
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::BadSignature
                    }
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                };
                tracing::debug!(reason = %reason, "Token validation failed: {:?}", e);
                reason
            })?
            .claims;

        if now >= claims.exp {
            tracing::debug!(exp = claims.exp, now, "Token validation failed: expired");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match name.to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        "EDDSA" => Ok(Algorithm::EdDSA),
        other => Err(AppError::Config(format!("Unsupported JWT algorithm: {}", other))),
    }
}
