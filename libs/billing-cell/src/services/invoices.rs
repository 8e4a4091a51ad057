use std::sync::Arc;

use chrono::Utc;

use appointment_cell::models::{Appointment, PaymentStatus};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{BillingSummary, Invoice};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct BillingService {
    supabase: Arc<SupabaseClient>,
    hospital_name: String,
    tax_rate: f64,
}

impl BillingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            hospital_name: config.hospital_name.clone(),
            tax_rate: config.tax_rate,
        }
    }

    async fn billed_appointments(&self) -> Result<Vec<Appointment>, AppError> {
        let rows = self
            .supabase
            .select(
                "appointments",
                "payment_status=in.(completed,refunded)&order=created_at.desc",
            )
            .await?;

        Ok(Appointment::from_rows(rows))
    }

    pub async fn invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self
            .billed_appointments()
            .await?
            .iter()
            .map(|apt| Invoice::from_appointment(apt, self.tax_rate))
            .collect())
    }

    pub async fn summary(&self) -> Result<BillingSummary, AppError> {
        let invoices = self.invoices().await?;

        let collected: f64 = invoices
            .iter()
            .filter(|inv| inv.payment_status == PaymentStatus::Completed)
            .map(|inv| inv.total)
            .sum();
        let refunded: f64 = invoices
            .iter()
            .filter(|inv| inv.payment_status == PaymentStatus::Refunded)
            .map(|inv| inv.total)
            .sum();

        Ok(BillingSummary {
            collected: round2(collected),
            refunded: round2(refunded),
            total_invoices: invoices.len(),
        })
    }

    /// Printable invoice for one appointment. Clients open this in a new
    /// tab, so it is a self-contained HTML page.
    pub async fn render_invoice(&self, appointment_id: &str) -> Result<String, AppError> {
        let rows = self
            .supabase
            .select(
                "appointments",
                &format!("appointment_id=eq.{}", appointment_id),
            )
            .await?;

        let apt = Appointment::from_rows(rows)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let invoice = Invoice::from_appointment(&apt, self.tax_rate);
        Ok(self.render_html(&invoice))
    }

    fn render_html(&self, invoice: &Invoice) -> String {
        let items: String = invoice
            .items
            .iter()
            .map(|item| {
                format!(
                    "            <tr><td>{}</td><td>{:.2}</td></tr>\n",
                    item.description, item.amount
                )
            })
            .collect();

        let status = match invoice.payment_status {
            PaymentStatus::Completed => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
            _ => "PENDING",
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Invoice - {invoice_no}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .header {{ text-align: center; margin-bottom: 30px; }}
        table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}
        th, td {{ padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }}
        th {{ background-color: #2196F3; color: white; }}
        .total {{ font-size: 18px; font-weight: bold; text-align: right; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>{hospital}</h1>
    </div>

    <h2>INVOICE</h2>

    <div class="invoice-details">
        <p><strong>Invoice No:</strong> {invoice_no}</p>
        <p><strong>Date:</strong> {rendered_on}</p>
        <p><strong>Patient Name:</strong> {patient}</p>
        <p><strong>Appointment ID:</strong> {appointment_id}</p>
    </div>

    <table>
        <thead>
            <tr><th>Description</th><th>Amount</th></tr>
        </thead>
        <tbody>
{items}        </tbody>
    </table>

    <p class="total">Total Amount: {total:.2}</p>
    <p class="total">Payment Status: {status}</p>

    <div style="margin-top: 40px; text-align: center; color: #666;">
        <p>Thank you for choosing {hospital}!</p>
    </div>
</body>
</html>
"#,
            invoice_no = invoice.invoice_no,
            hospital = self.hospital_name,
            rendered_on = Utc::now().format("%B %d, %Y"),
            patient = invoice.patient_name,
            appointment_id = invoice.appointment_id,
            items = items,
            total = invoice.total,
            status = status,
        )
    }
}
