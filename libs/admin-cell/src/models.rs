use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline numbers for the admin dashboard. Cancelled bookings are
/// excluded everywhere except the refund side of the revenue figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_patients: usize,
    pub todays_appointments: usize,
    pub pending_appointments: usize,
    pub completed_appointments: usize,
    pub total_appointments: usize,
    pub monthly_revenue: f64,
}

/// One roster line, aggregated from a patient's booking history.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_appointments: usize,
    pub last_visit: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_email: String,
    #[serde(default)]
    pub recipient_name: Option<String>,
    pub message: String,
}
