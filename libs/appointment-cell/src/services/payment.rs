use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use crate::models::{BookingError, PaymentOrder};

/// Seam for the payment gateway. The production wiring uses the mock
/// provider; tests can substitute their own double.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment order for a freshly booked appointment.
    async fn create_order(
        &self,
        appointment_id: &str,
        invoice_no: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentOrder, BookingError>;

    /// Verify that a payment went through. The mock always succeeds.
    async fn verify_payment(
        &self,
        appointment_id: &str,
        payment_reference: Option<&str>,
    ) -> Result<(), BookingError>;
}

/// Always-succeeding gateway stub. Order ids follow the gateway's
/// `order_######` shape.
pub struct MockPaymentProvider {
    gateway_key: String,
}

impl MockPaymentProvider {
    pub fn new(gateway_key: &str) -> Self {
        Self {
            gateway_key: gateway_key.to_string(),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_order(
        &self,
        appointment_id: &str,
        invoice_no: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentOrder, BookingError> {
        let order_id = format!("order_{}", rand::thread_rng().gen_range(100_000..1_000_000));
        info!(
            "Created mock payment order {} for appointment {} ({} {})",
            order_id, appointment_id, amount_minor, currency
        );

        Ok(PaymentOrder {
            order_id,
            amount: amount_minor,
            currency: currency.to_string(),
            gateway_key: self.gateway_key.clone(),
            invoice_no: invoice_no.to_string(),
        })
    }

    async fn verify_payment(
        &self,
        appointment_id: &str,
        _payment_reference: Option<&str>,
    ) -> Result<(), BookingError> {
        info!("Mock payment verified for appointment {}", appointment_id);
        Ok(())
    }
}
