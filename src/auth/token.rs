use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest signing secret accepted at startup, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch). The token is invalid from this
    /// instant on.
    pub exp: i64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no bearer token supplied")]
    Missing,

    #[error("token is malformed or its signature is invalid")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Encoding(String),
}

/// Issues and verifies HS256-signed, time-limited bearer tokens.
///
/// The secret is read once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Creates a token service. The secret length is checked by `Config`; the TTL is
    /// in seconds and may be zero (every token is born expired).
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issues a token for `user_id` that expires `ttl` seconds from now.
    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Checks the signature, then the expiry, and returns the claims.
    ///
    /// The signature is checked first, so a tampered token is reported as
    /// `Malformed` even if it is also past its expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below without leeway: `now >= exp` is expired.
        validation.validate_exp = false;
        // `sub` is numeric here; jsonwebtoken only recognises string subjects, so
        // the typed `Claims` deserialization enforces its presence instead.
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Verifies a token and returns the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// No header is `Missing`; anything other than `Bearer <token>` is `Malformed`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, TokenError> {
    let value = header.ok_or(TokenError::Missing)?;
    match value.trim().strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(TokenError::Malformed),
    }
}
