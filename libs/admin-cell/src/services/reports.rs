use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::info;

use appointment_cell::models::{Appointment, AppointmentStatus, PaymentStatus};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{DashboardStats, PatientSummary, SendMessageRequest};

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Dashboard numbers over the full booking history. Revenue covers the
/// reference month only: completed payments gross of tax, minus refunds
/// gross of tax.
pub fn compute_stats(
    appointments: &[Appointment],
    today: NaiveDate,
    tax_rate: f64,
) -> DashboardStats {
    let active: Vec<&Appointment> = appointments
        .iter()
        .filter(|apt| apt.status != AppointmentStatus::Cancelled)
        .collect();

    let completed_base: f64 = active
        .iter()
        .filter(|apt| apt.payment_status == PaymentStatus::Completed && same_month(apt.date, today))
        .map(|apt| apt.consultation_fee)
        .sum();

    // Refunds come from cancelled bookings, so this side scans everything.
    let refunded_base: f64 = appointments
        .iter()
        .filter(|apt| apt.payment_status == PaymentStatus::Refunded && same_month(apt.date, today))
        .map(|apt| apt.consultation_fee)
        .sum();

    let monthly_revenue =
        round2(completed_base * (1.0 + tax_rate) - refunded_base * (1.0 + tax_rate));

    let mut patients: Vec<&str> = active.iter().map(|apt| apt.patient_email.as_str()).collect();
    patients.sort_unstable();
    patients.dedup();

    DashboardStats {
        total_patients: patients.len(),
        todays_appointments: active
            .iter()
            .filter(|apt| apt.date == today && apt.payment_status == PaymentStatus::Completed)
            .count(),
        pending_appointments: active
            .iter()
            .filter(|apt| apt.status == AppointmentStatus::Pending)
            .count(),
        completed_appointments: active
            .iter()
            .filter(|apt| apt.payment_status == PaymentStatus::Completed)
            .count(),
        total_appointments: active.len(),
        monthly_revenue,
    }
}

/// Patient roster aggregated from booking history, in order of first
/// appearance. Cancelled bookings still count as visits.
pub fn compute_roster(appointments: &[Appointment]) -> Vec<PatientSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut roster: Vec<PatientSummary> = Vec::new();

    for apt in appointments {
        match index.get(apt.patient_email.as_str()) {
            Some(&i) => {
                roster[i].total_appointments += 1;
                if apt.date > roster[i].last_visit {
                    roster[i].last_visit = apt.date;
                }
            }
            None => {
                index.insert(apt.patient_email.as_str(), roster.len());
                roster.push(PatientSummary {
                    name: apt.patient_name.clone(),
                    email: apt.patient_email.clone(),
                    phone: apt.patient_phone.clone(),
                    total_appointments: 1,
                    last_visit: apt.date,
                });
            }
        }
    }

    roster
}

pub struct AdminService {
    supabase: Arc<SupabaseClient>,
    tax_rate: f64,
}

impl AdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            tax_rate: config.tax_rate,
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let rows = self.supabase.select("appointments", "").await?;
        let appointments = Appointment::from_rows(rows);

        Ok(compute_stats(
            &appointments,
            Utc::now().date_naive(),
            self.tax_rate,
        ))
    }

    pub async fn patients(&self) -> Result<Vec<PatientSummary>, AppError> {
        let rows = self.supabase.select("appointments", "").await?;
        Ok(compute_roster(&Appointment::from_rows(rows)))
    }

    /// Contact messages, newest first, as stored.
    pub async fn messages(&self) -> Result<Vec<Value>, AppError> {
        Ok(self
            .supabase
            .select("contact_messages", "order=created_at.desc")
            .await?)
    }

    pub async fn send_message(&self, request: SendMessageRequest) -> Result<(), AppError> {
        let record = json!({
            "recipient_email": request.recipient_email,
            "recipient_name": request.recipient_name,
            "message": request.message,
            "sent_by": "admin",
            "sent_at": Utc::now().to_rfc3339(),
            "status": "sent",
        });

        self.supabase.insert("admin_messages", record).await?;
        info!("Admin message sent to {}", request.recipient_email);
        Ok(())
    }

    /// The 50 most recent login attempts.
    pub async fn login_activity(&self) -> Result<Vec<Value>, AppError> {
        Ok(self
            .supabase
            .select("login_history", "order=timestamp.desc&limit=50")
            .await?)
    }
}
