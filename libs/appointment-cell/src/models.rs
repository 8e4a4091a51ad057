use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

/// Serde helper for `HH:MM` slot times. Accepts `HH:MM:SS` on the way in
/// because Supabase time columns render seconds.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub department: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub mode: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    pub consultation_fee: f64,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Decode a PostgREST result set, skipping rows that fail to parse.
    pub fn from_rows(rows: Vec<serde_json::Value>) -> Vec<Appointment> {
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<Appointment>(row) {
                Ok(apt) => Some(apt),
                Err(err) => {
                    tracing::warn!("Skipping malformed appointment row: {}", err);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
    Cancelled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub department: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub mode: String,
    #[serde(default)]
    pub symptoms: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    pub appointment_id: String,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Fee + 18% tax, both rounded to two decimal places.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FeeBreakdown {
    pub consultation_fee: f64,
    pub tax: f64,
    pub total: f64,
}

impl FeeBreakdown {
    pub fn quote(consultation_fee: f64, tax_rate: f64) -> Self {
        let tax = round2(consultation_fee * tax_rate);
        Self {
            consultation_fee: round2(consultation_fee),
            tax,
            total: round2(consultation_fee + tax),
        }
    }

    /// Amount in the currency's minor units, as payment gateways expect.
    pub fn total_minor_units(&self) -> i64 {
        (self.total * 100.0).round() as i64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Payment order handed back to the client alongside a fresh booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub gateway_key: String,
    pub invoice_no: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Appointments can only be booked between 8:00 AM and 8:00 PM.")]
    OutOfHours,

    #[error("This time slot is already allotted to another person.")]
    SlotTaken,

    #[error("Please maintain a 20-minute gap. Slot at {existing} is already booked.")]
    InsufficientGap { existing: String },

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Appointment not found")]
    NotFound,

    #[error("Payment error: {0}")]
    Payment(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::OutOfHours => AppError::OutOfHours(message),
            BookingError::SlotTaken => AppError::SlotTaken(message),
            BookingError::InsufficientGap { .. } => AppError::InsufficientGap(message),
            BookingError::InvalidTime(_) => AppError::Validation(message),
            BookingError::NotFound => AppError::NotFound(message),
            BookingError::Payment(_) | BookingError::Storage(_) => AppError::Storage(message),
        }
    }
}
