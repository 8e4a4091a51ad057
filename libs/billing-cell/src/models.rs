use chrono::NaiveDate;
use serde::Serialize;

use appointment_cell::models::{Appointment, FeeBreakdown, PaymentStatus};

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItem {
    pub description: String,
    pub amount: f64,
}

/// A billing line derived from a paid (or refunded) appointment. There is
/// no separate invoices table; the appointment record is the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub invoice_no: String,
    pub appointment_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub date: NaiveDate,
    pub total: f64,
    pub payment_status: PaymentStatus,
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn from_appointment(apt: &Appointment, tax_rate: f64) -> Self {
        let quote = FeeBreakdown::quote(apt.consultation_fee, tax_rate);

        Self {
            invoice_no: format!("INV-{}", apt.appointment_id),
            appointment_id: apt.appointment_id.clone(),
            patient_name: apt.patient_name.clone(),
            patient_email: apt.patient_email.clone(),
            date: apt.date,
            total: quote.total,
            payment_status: apt.payment_status,
            items: vec![
                InvoiceItem {
                    description: format!("Consultation Fee - {}", apt.department),
                    amount: quote.consultation_fee,
                },
                InvoiceItem {
                    description: format!("Tax ({:.0}%)", tax_rate * 100.0),
                    amount: quote.tax,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingSummary {
    pub collected: f64,
    pub refunded: f64,
    pub total_invoices: usize,
}
