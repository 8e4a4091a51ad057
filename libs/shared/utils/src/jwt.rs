use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{AuthUser, JwtClaims};
use shared_models::error::AppError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("Authentication token is missing")]
    MissingToken,

    #[error("Invalid token")]
    Malformed,

    #[error("Invalid token")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("JWT secret is not set")]
    SecretUnset,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SecretUnset => AppError::Storage(err.to_string()),
            _ => AppError::Unauthenticated(err.to_string()),
        }
    }
}

/// Mint an HS256 token carrying the identity and the stored role.
pub fn issue_token(
    email: &str,
    role: &str,
    jwt_secret: &str,
    ttl_days: i64,
) -> Result<String, AuthError> {
    if jwt_secret.is_empty() {
        return Err(AuthError::SecretUnset);
    }

    let now = Utc::now();
    let header = serde_json::json!({ "alg": "HS256", "typ": "JWT" });
    let claims = serde_json::json!({
        "email": email,
        "role": role,
        "iat": now.timestamp(),
        "exp": (now + Duration::days(ttl_days)).timestamp(),
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac =
        HmacSha256::new_from_slice(jwt_secret.as_bytes()).map_err(|_| AuthError::SecretUnset)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verify an HS256 token and extract the identity/role claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, AuthError> {
    if jwt_secret.is_empty() {
        return Err(AuthError::SecretUnset);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Malformed);
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err(AuthError::Malformed);
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac =
        HmacSha256::new_from_slice(jwt_secret.as_bytes()).map_err(|_| AuthError::SecretUnset)?;
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(AuthError::InvalidSignature);
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(AuthError::Malformed)?;

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err(AuthError::Malformed);
        }
    };

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(AuthError::Expired);
    }

    debug!("Token validated successfully for {}", claims.email);
    Ok(AuthUser {
        email: claims.email,
        role: claims.role,
    })
}
