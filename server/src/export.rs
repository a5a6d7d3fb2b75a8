//! CSV export for the booking and order ledgers.
//!
//! Column order is fixed; empty ledgers export as a header-only file rather
//! than erroring.

use crate::error::{Error, Result};
use crate::types::{Booking, Order};

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Upstream(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::Upstream(format!("CSV was not UTF-8: {e}")))
}

fn csv_err(e: csv::Error) -> Error {
    Error::Upstream(format!("CSV write failed: {e}"))
}

/// Renders bookings as CSV in the documented column order.
///
/// # Errors
///
/// Returns `Upstream` if serialization fails.
pub fn bookings_csv(bookings: &[Booking]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Booking ID",
            "Customer Name",
            "Email",
            "Phone",
            "Program",
            "Trainer",
            "Date",
            "Time Slot",
            "Attendance",
            "Amount",
            "Status",
            "Payment Status",
            "Created At",
        ])
        .map_err(csv_err)?;

    for booking in bookings {
        let mode = match booking.attendance_mode {
            crate::types::AttendanceMode::Gym => "gym",
            crate::types::AttendanceMode::HomeVisit => "home_visit",
        };
        writer
            .write_record([
                booking.id.to_string(),
                booking.user_name.clone(),
                booking.user_email.clone(),
                booking.user_phone.clone().unwrap_or_default(),
                booking.program_title.clone(),
                booking.trainer_name.clone(),
                booking.booking_date.to_string(),
                booking.time_slot.to_string(),
                mode.to_string(),
                format!("{:.2}", booking.amount.rupees()),
                booking.status.to_string(),
                booking.payment_status.to_string(),
                booking.created_at.to_rfc3339(),
            ])
            .map_err(csv_err)?;
    }
    finish(writer)
}

/// Renders orders as CSV in the documented column order.
///
/// # Errors
///
/// Returns `Upstream` if serialization fails.
pub fn orders_csv(orders: &[Order]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Order ID",
            "Customer Name",
            "Email",
            "Phone",
            "Total Amount",
            "Order Status",
            "Payment Status",
            "Order Date",
        ])
        .map_err(csv_err)?;

    for order in orders {
        writer
            .write_record([
                order.id.to_string(),
                order.customer_name.clone(),
                order.customer_email.clone(),
                order.customer_phone.clone(),
                format!("{:.2}", order.total_amount.rupees()),
                order.order_status.to_string(),
                order.payment_status.to_string(),
                order.created_at.to_rfc3339(),
            ])
            .map_err(csv_err)?;
    }
    finish(writer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_export_is_header_only() {
        let csv = orders_csv(&[]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Order ID,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn bookings_header_columns() {
        let csv = bookings_csv(&[]).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header.split(',').count(), 13);
        assert!(header.contains("Time Slot"));
        assert!(header.contains("Payment Status"));
    }
}
