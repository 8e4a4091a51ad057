use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Claim set carried in the bearer token. Identity is the email address;
/// the role is the stored attribute resolved at signup, never re-derived.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub email: String,
    pub role: String,
    pub iat: Option<i64>,
    pub exp: i64,
}

/// Authenticated identity attached to the request by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub email: Option<String>,
    pub role: Option<String>,
}
