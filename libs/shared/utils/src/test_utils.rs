use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;

use crate::jwt::issue_token;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_env();
    config.supabase_url = "http://localhost:54321".to_string();
    config.supabase_anon_key = "test-anon-key".to_string();
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    config
}

pub fn test_config_with_store(supabase_url: &str) -> Arc<AppConfig> {
    let mut config = test_config();
    config.supabase_url = supabase_url.to_string();
    Arc::new(config)
}

pub struct TestUser {
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::patient("test@gmail.com")
    }
}

impl TestUser {
    pub fn patient(email: &str) -> Self {
        Self {
            email: email.to_string(),
            role: "patient".to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self {
            email: email.to_string(),
            role: "admin".to_string(),
        }
    }

    pub fn token(&self, secret: &str) -> String {
        issue_token(&self.email, &self.role, secret, 30).expect("test token")
    }

    pub fn expired_token(&self, secret: &str) -> String {
        issue_token(&self.email, &self.role, secret, -1).expect("test token")
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

pub struct MockSupabaseRows;

impl MockSupabaseRows {
    pub fn user(email: &str, role: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "name": "Test User",
            "email": email,
            "password": password_hash,
            "phone": "+1234567890",
            "role": role,
            "is_active": true,
            "created_at": "2026-01-01T00:00:00+00:00"
        })
    }

    pub fn appointment(
        appointment_id: &str,
        email: &str,
        date: &str,
        time: &str,
        status: &str,
        payment_status: &str,
    ) -> serde_json::Value {
        json!({
            "id": 1,
            "appointment_id": appointment_id,
            "patient_name": "Test User",
            "patient_email": email,
            "patient_phone": "+1234567890",
            "department": "Cardiology",
            "date": date,
            "time": time,
            "mode": "In-person",
            "symptoms": "",
            "status": status,
            "payment_status": payment_status,
            "consultation_fee": 500.0,
            "created_at": "2026-01-01T00:00:00+00:00"
        })
    }

    pub fn review(name: &str, rating: i32, review: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "name": name,
            "rating": rating,
            "review": review,
            "created_at": "2026-01-01T00:00:00+00:00"
        })
    }

    pub fn login_activity(email: &str, role: &str, status: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "user_email": email,
            "user_role": role,
            "status": status,
            "timestamp": "2026-01-01T00:00:00+00:00",
            "ip_address": "127.0.0.1",
            "browser": "test-agent"
        })
    }

    pub fn contact_message(name: &str, email: &str, message: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "name": name,
            "email": email,
            "subject": "General Inquiry",
            "message": message,
            "status": "unread",
            "created_at": "2026-01-01T00:00:00+00:00"
        })
    }
}
