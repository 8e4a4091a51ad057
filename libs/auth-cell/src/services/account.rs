use std::sync::{Arc, OnceLock};

use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::supabase::{DbError, SupabaseClient};
use shared_utils::jwt::issue_token;

use crate::models::{
    AccountError, ClientMeta, LoginRequest, SignupRequest, StoredUser, UpdateProfileRequest,
    UserProfile,
};
use crate::services::password::{hash_password, verify_password};

fn email_is_valid(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
        .is_match(email)
}

fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => email.to_string(),
    }
}

pub struct AccountService {
    supabase: Arc<SupabaseClient>,
    jwt_secret: String,
    token_ttl_days: i64,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_days: config.token_ttl_days,
        }
    }

    /// Register a new patient account. The role is fixed at signup and is
    /// the single source of truth for authorization from here on.
    pub async fn signup(
        &self,
        request: SignupRequest,
    ) -> Result<(String, UserProfile), AccountError> {
        if !email_is_valid(&request.email) {
            return Err(AccountError::InvalidEmail);
        }

        let existing = self.find_user(&request.email).await?;
        if existing.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| display_name_from_email(&request.email));
        let password_hash =
            hash_password(&request.password).map_err(|e| AccountError::Hashing(e.to_string()))?;

        let rows = self
            .supabase
            .insert(
                "users",
                json!({
                    "name": name,
                    "email": request.email,
                    "password": password_hash,
                    "role": "patient",
                    "is_active": true,
                    "created_at": Utc::now().to_rfc3339(),
                }),
            )
            .await
            .map_err(|err| match err {
                DbError::Conflict(_) => AccountError::EmailTaken,
                other => AccountError::Storage(other.to_string()),
            })?;

        let user = parse_first_user(rows).ok_or_else(|| {
            AccountError::Storage("insert returned no representation".to_string())
        })?;

        let token = self.issue(&user.email, &user.role)?;
        info!("New account registered for {}", user.email);

        Ok((token, user.into()))
    }

    /// Authenticate against the stored hash and issue a token carrying the
    /// STORED role. Both outcomes leave a login_history record.
    pub async fn login(
        &self,
        request: LoginRequest,
        meta: &ClientMeta,
    ) -> Result<(String, UserProfile), AccountError> {
        let user = match self.find_user(&request.email).await? {
            Some(user) => user,
            None => {
                self.record_login(&request.email, "patient", "failed", meta)
                    .await;
                return Err(AccountError::InvalidCredentials);
            }
        };

        let verified = verify_password(&request.password, &user.password)
            .map_err(|e| AccountError::Hashing(e.to_string()))?;
        if !verified {
            self.record_login(&user.email, &user.role, "failed", meta)
                .await;
            return Err(AccountError::InvalidCredentials);
        }

        self.record_login(&user.email, &user.role, "success", meta)
            .await;

        let token = self.issue(&user.email, &user.role)?;
        info!("Login for {} ({})", user.email, user.role);

        Ok((token, user.into()))
    }

    pub async fn profile(&self, email: &str) -> Result<UserProfile, AccountError> {
        self.find_user(email)
            .await?
            .map(UserProfile::from)
            .ok_or(AccountError::NotFound)
    }

    pub async fn update_profile(
        &self,
        email: &str,
        request: UpdateProfileRequest,
    ) -> Result<(), AccountError> {
        if request.is_empty() {
            return Err(AccountError::EmptyUpdate);
        }

        let mut patch = serde_json::Map::new();
        if let Some(name) = request.name {
            patch.insert("name".to_string(), Value::String(name));
        }
        if let Some(phone) = request.phone {
            patch.insert("phone".to_string(), Value::String(phone));
        }
        if let Some(password) = request.password {
            let hash =
                hash_password(&password).map_err(|e| AccountError::Hashing(e.to_string()))?;
            patch.insert("password".to_string(), Value::String(hash));
        }

        let rows = self
            .supabase
            .update("users", &format!("email=eq.{}", email), Value::Object(patch))
            .await
            .map_err(|e| AccountError::Storage(e.to_string()))?;

        if rows.is_empty() {
            return Err(AccountError::NotFound);
        }

        info!("Profile updated for {}", email);
        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<Option<StoredUser>, AccountError> {
        let rows = self
            .supabase
            .select("users", &format!("email=eq.{}", email))
            .await
            .map_err(|e| AccountError::Storage(e.to_string()))?;

        Ok(parse_first_user(rows))
    }

    /// Appends to the login trail. Trail failures are logged and swallowed
    /// so they never block the login itself.
    async fn record_login(&self, email: &str, role: &str, status: &str, meta: &ClientMeta) {
        let record = json!({
            "user_email": email,
            "user_role": role,
            "status": status,
            "timestamp": Utc::now().to_rfc3339(),
            "ip_address": meta.ip_address,
            "browser": meta.browser,
        });

        if let Err(err) = self.supabase.insert("login_history", record).await {
            warn!("Failed to record login attempt for {}: {}", email, err);
        }
    }

    fn issue(&self, email: &str, role: &str) -> Result<String, AccountError> {
        issue_token(email, role, &self.jwt_secret, self.token_ttl_days)
            .map_err(|e| AccountError::Storage(e.to_string()))
    }
}

fn parse_first_user(rows: Vec<Value>) -> Option<StoredUser> {
    rows.into_iter()
        .find_map(|row| match serde_json::from_value::<StoredUser>(row) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Skipping malformed user row: {}", err);
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_validation() {
        assert!(email_is_valid("jane@gmail.com"));
        assert!(email_is_valid("a.b+c@clinic.example.org"));
        assert!(!email_is_valid("not-an-email"));
        assert!(!email_is_valid("two@@signs.com"));
        assert!(!email_is_valid("spaces in@local.com"));
    }

    #[test]
    fn signup_name_defaults_to_local_part() {
        assert_eq!(display_name_from_email("jane@gmail.com"), "Jane");
    }
}
