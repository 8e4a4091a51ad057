use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

/// Stored row in the `users` table. The `password` column holds the
/// argon2 hash, never the plaintext.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Public view of a user, safe to hand back to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone.unwrap_or_else(|| "+1234567890".to_string()),
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.password.is_none()
    }
}

/// Where a login attempt came from, for the login_history trail.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub ip_address: String,
    pub browser: String,
}

impl Default for ClientMeta {
    fn default() -> Self {
        Self {
            ip_address: "unknown".to_string(),
            browser: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("Nothing to update")]
    EmptyUpdate,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        let message = err.to_string();
        match err {
            AccountError::InvalidEmail
            | AccountError::EmailTaken
            | AccountError::EmptyUpdate => AppError::Validation(message),
            AccountError::InvalidCredentials => AppError::Unauthenticated(message),
            AccountError::NotFound => AppError::NotFound(message),
            AccountError::Hashing(_) | AccountError::Storage(_) => AppError::Storage(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn stored_user_tolerates_missing_phone() {
        let row = json!({
            "id": 7,
            "name": "Jane",
            "email": "jane@gmail.com",
            "password": "$argon2id$stub",
            "role": "patient"
        });

        let user: StoredUser = serde_json::from_value(row).unwrap();
        assert!(user.is_active);

        let profile = UserProfile::from(user);
        assert_eq!(profile.phone, "+1234567890");
    }

    #[test]
    fn account_errors_map_to_the_right_status() {
        assert_eq!(
            AppError::from(AccountError::EmailTaken).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(AccountError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AccountError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
