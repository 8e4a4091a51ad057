use std::sync::Arc;

use chrono::Utc;
use chrono::Datelike;
use rand::Rng;
use serde_json::{json, Value};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::supabase::{DbError, SupabaseClient};
use shared_models::auth::AuthUser;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingError, FeeBreakdown,
    PaymentOrder, PaymentStatus, VerifyPaymentRequest,
};
use crate::services::payment::{MockPaymentProvider, PaymentProvider};
use crate::services::slots::SlotPolicy;

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
    payment: Arc<dyn PaymentProvider>,
    policy: SlotPolicy,
    consultation_fee: f64,
    tax_rate: f64,
    currency: String,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        let payment = Arc::new(MockPaymentProvider::new(&config.payment_gateway_key));
        Self::with_provider(config, payment)
    }

    /// Build the service around a specific payment provider. Production
    /// wiring passes the mock; tests pass their own double.
    pub fn with_provider(config: &AppConfig, payment: Arc<dyn PaymentProvider>) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            payment,
            policy: SlotPolicy::from_config(config),
            consultation_fee: config.consultation_fee,
            tax_rate: config.tax_rate,
            currency: config.currency.clone(),
        }
    }

    /// Book a slot for the authenticated patient. Validation runs against
    /// a fresh read of the day's bookings; the insert itself is guarded by
    /// the store's partial unique index on `(date, time)` (scoped to
    /// non-cancelled rows, since cancellation frees the slot and rows are
    /// never deleted), so a racing insert comes back as a conflict and is
    /// reported as a taken slot.
    pub async fn book(
        &self,
        user: &AuthUser,
        request: BookAppointmentRequest,
    ) -> Result<(Appointment, PaymentOrder), BookingError> {
        self.policy.check_window(request.time)?;

        let existing = self
            .appointments_matching(&format!("date=eq.{}", request.date))
            .await?;
        self.policy
            .check_against_existing(request.date, request.time, &existing)?;

        let (patient_name, patient_phone) = self.patient_contact(&user.email).await;

        let quote = FeeBreakdown::quote(self.consultation_fee, self.tax_rate);
        let appointment_id = format!("APT{}", rand::thread_rng().gen_range(1000..10_000));
        let invoice_no = format!(
            "INV-{}-{}",
            Utc::now().year(),
            rand::thread_rng().gen_range(1000..10_000)
        );

        let record = json!({
            "appointment_id": appointment_id,
            "patient_name": patient_name,
            "patient_email": user.email,
            "patient_phone": patient_phone,
            "department": request.department,
            "date": request.date.to_string(),
            "time": request.time.format("%H:%M").to_string(),
            "mode": request.mode,
            "symptoms": request.symptoms.unwrap_or_default(),
            "status": AppointmentStatus::Pending.to_string(),
            "payment_status": PaymentStatus::Pending.to_string(),
            "consultation_fee": quote.consultation_fee,
            "created_at": Utc::now().to_rfc3339(),
        });

        let rows = self
            .supabase
            .insert("appointments", record)
            .await
            .map_err(|err| match err {
                DbError::Conflict(_) => BookingError::SlotTaken,
                other => BookingError::Storage(other.to_string()),
            })?;

        let appointment = first_appointment(rows).ok_or_else(|| {
            BookingError::Storage("insert returned no representation".to_string())
        })?;

        let order = self
            .payment
            .create_order(
                &appointment.appointment_id,
                &invoice_no,
                quote.total_minor_units(),
                &self.currency,
            )
            .await?;

        info!(
            "Booked appointment {} for {} on {} at {}",
            appointment.appointment_id,
            user.email,
            appointment.date,
            appointment.time.format("%H:%M")
        );

        Ok((appointment, order))
    }

    /// Confirm a booking once its payment clears the provider.
    pub async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> Result<Appointment, BookingError> {
        self.payment
            .verify_payment(
                &request.appointment_id,
                request.payment_reference.as_deref(),
            )
            .await?;

        let rows = self
            .supabase
            .update(
                "appointments",
                &format!("appointment_id=eq.{}", request.appointment_id),
                json!({
                    "status": AppointmentStatus::Confirmed.to_string(),
                    "payment_status": PaymentStatus::Completed.to_string(),
                }),
            )
            .await
            .map_err(storage)?;

        first_appointment(rows).ok_or(BookingError::NotFound)
    }

    /// Cancel a booking. Records are never deleted; the status flips to
    /// cancelled and a completed payment is marked refunded.
    pub async fn cancel(&self, appointment_id: &str) -> Result<Appointment, BookingError> {
        let appointment = self.get(appointment_id).await?;

        let payment_status = if appointment.payment_status == PaymentStatus::Completed {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::Cancelled
        };

        let rows = self
            .supabase
            .update(
                "appointments",
                &format!("appointment_id=eq.{}", appointment_id),
                json!({
                    "status": AppointmentStatus::Cancelled.to_string(),
                    "payment_status": payment_status.to_string(),
                }),
            )
            .await
            .map_err(storage)?;

        info!(
            "Cancelled appointment {} (payment {})",
            appointment_id, payment_status
        );

        first_appointment(rows).ok_or(BookingError::NotFound)
    }

    pub async fn get(&self, appointment_id: &str) -> Result<Appointment, BookingError> {
        let rows = self
            .appointments_matching(&format!("appointment_id=eq.{}", appointment_id))
            .await?;

        rows.into_iter().next().ok_or(BookingError::NotFound)
    }

    /// The caller's paid bookings, cancelled ones excluded.
    pub async fn list_for_patient(&self, email: &str) -> Result<Vec<Appointment>, BookingError> {
        let rows = self
            .appointments_matching(&format!(
                "patient_email=eq.{}&payment_status=eq.completed",
                email
            ))
            .await?;

        Ok(rows
            .into_iter()
            .filter(|apt| apt.status != AppointmentStatus::Cancelled)
            .collect())
    }

    /// Every non-cancelled booking, newest first, with the distinct
    /// patient count for the admin listing.
    pub async fn list_all(&self) -> Result<(Vec<Appointment>, usize), BookingError> {
        let rows = self.appointments_matching("order=created_at.desc").await?;

        let active: Vec<Appointment> = rows
            .into_iter()
            .filter(|apt| apt.status != AppointmentStatus::Cancelled)
            .collect();

        let mut patients: Vec<&str> = active.iter().map(|apt| apt.patient_email.as_str()).collect();
        patients.sort_unstable();
        patients.dedup();
        let total_patients = patients.len();

        Ok((active, total_patients))
    }

    async fn appointments_matching(&self, filters: &str) -> Result<Vec<Appointment>, BookingError> {
        let rows = self
            .supabase
            .select("appointments", filters)
            .await
            .map_err(storage)?;

        Ok(Appointment::from_rows(rows))
    }

    async fn patient_contact(&self, email: &str) -> (String, String) {
        match self
            .supabase
            .select("users", &format!("email=eq.{}", email))
            .await
        {
            Ok(rows) => {
                if let Some(row) = rows.first() {
                    let name = row
                        .get("name")
                        .and_then(Value::as_str)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| display_name_from_email(email));
                    let phone = row
                        .get("phone")
                        .and_then(Value::as_str)
                        .filter(|p| !p.is_empty())
                        .unwrap_or("+1234567890")
                        .to_string();
                    return (name, phone);
                }
                (display_name_from_email(email), "+1234567890".to_string())
            }
            Err(err) => {
                warn!("Profile lookup failed for {}: {}", email, err);
                (display_name_from_email(email), "+1234567890".to_string())
            }
        }
    }
}

fn storage(err: DbError) -> BookingError {
    match err {
        DbError::NotFound(_) => BookingError::NotFound,
        other => BookingError::Storage(other.to_string()),
    }
}

fn first_appointment(rows: Vec<Value>) -> Option<Appointment> {
    Appointment::from_rows(rows).into_iter().next()
}

fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_local_part_becomes_display_name() {
        assert_eq!(display_name_from_email("jane@gmail.com"), "Jane");
        assert_eq!(display_name_from_email("bob.smith@x.org"), "Bob.smith");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows = vec![
            json!({"appointment_id": "broken"}),
            shared_utils::test_utils::MockSupabaseRows::appointment(
                "APT1001",
                "jane@gmail.com",
                "2026-09-01",
                "10:00",
                "pending",
                "pending",
            ),
        ];

        let parsed = Appointment::from_rows(rows);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].appointment_id, "APT1001");
    }
}
