use std::env;

use chrono::NaiveTime;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,

    pub hospital_name: String,
    pub departments: Vec<String>,
    pub consultation_modes: Vec<String>,
    pub currency: String,
    pub consultation_fee: f64,
    pub tax_rate: f64,
    pub payment_gateway_key: String,

    pub booking_opens_at: NaiveTime,
    pub booking_closes_at: NaiveTime,
    pub min_slot_gap_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL").unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            }),
            supabase_anon_key: env::var("SUPABASE_KEY").unwrap_or_else(|_| {
                warn!("SUPABASE_KEY not set, using empty value");
                String::new()
            }),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using empty value");
                String::new()
            }),
            token_ttl_days: parse_env("TOKEN_TTL_DAYS", 30),

            hospital_name: env::var("HOSPITAL_NAME")
                .unwrap_or_else(|_| "City General Hospital".to_string()),
            departments: env::var("DEPARTMENTS")
                .map(|v| v.split(',').map(|d| d.trim().to_string()).collect())
                .unwrap_or_else(|_| default_departments()),
            consultation_modes: vec![
                "In-person".to_string(),
                "Video Call".to_string(),
                "Phone Call".to_string(),
            ],
            currency: env::var("CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            consultation_fee: parse_env("CONSULTATION_FEE", 500.0),
            tax_rate: parse_env("TAX_RATE", 0.18),
            payment_gateway_key: env::var("RAZORPAY_KEY_ID")
                .unwrap_or_else(|_| "rzp_test_demo123456789".to_string()),

            booking_opens_at: parse_time_env("BOOKING_OPENS_AT", "08:00"),
            booking_closes_at: parse_time_env("BOOKING_CLOSES_AT", "20:00"),
            min_slot_gap_minutes: parse_env("MIN_SLOT_GAP_MINUTES", 20),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    /// Tax rate expressed in percent for the public config endpoint.
    pub fn tax_rate_percent(&self) -> f64 {
        self.tax_rate * 100.0
    }
}

fn default_departments() -> Vec<String> {
    [
        "General Medicine",
        "Pediatrics",
        "Cardiology",
        "Orthopedics",
        "Neurology",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value, using default", key);
            default
        }),
        Err(_) => default,
    }
}

fn parse_time_env(key: &str, default: &str) -> NaiveTime {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
        warn!("{} is not a valid HH:MM time, using default", key);
        NaiveTime::parse_from_str(default, "%H:%M").expect("default time is valid")
    })
}
