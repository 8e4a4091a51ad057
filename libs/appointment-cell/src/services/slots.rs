use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{Appointment, AppointmentStatus, BookingError};

/// Business-hours and minimum-gap rules for proposed slots. Pure checks;
/// the booking service supplies the day's existing bookings.
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    min_gap_minutes: i64,
}

impl SlotPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            opens_at: config.booking_opens_at,
            closes_at: config.booking_closes_at,
            min_gap_minutes: config.min_slot_gap_minutes,
        }
    }

    /// The daily window is inclusive at both ends.
    pub fn check_window(&self, time: NaiveTime) -> Result<(), BookingError> {
        if time < self.opens_at || time > self.closes_at {
            debug!("Proposed time {} is outside {}..{}", time, self.opens_at, self.closes_at);
            return Err(BookingError::OutOfHours);
        }
        Ok(())
    }

    /// Validate a proposed slot against the day's existing bookings.
    /// Cancelled bookings free their slot for both the exact-match and the
    /// gap check.
    pub fn check_against_existing(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        existing: &[Appointment],
    ) -> Result<(), BookingError> {
        let same_day: Vec<&Appointment> = existing
            .iter()
            .filter(|apt| apt.date == date && apt.status != AppointmentStatus::Cancelled)
            .collect();

        if same_day.iter().any(|apt| apt.time == time) {
            return Err(BookingError::SlotTaken);
        }

        for apt in same_day {
            let diff = (apt.time - time).num_minutes().abs();
            if diff < self.min_gap_minutes {
                return Err(BookingError::InsufficientGap {
                    existing: apt.time.format("%H:%M").to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            opens_at: NaiveTime::from_hms_opt(8, 0, 0).expect("valid opening time"),
            closes_at: NaiveTime::from_hms_opt(20, 0, 0).expect("valid closing time"),
            min_gap_minutes: 20,
        }
    }
}
