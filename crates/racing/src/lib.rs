//! `paddock-racing` — race events, riders and the attendance join record.

pub mod attendee;
pub mod event;
pub mod rider;

pub use attendee::Attendee;
pub use event::{Event, EventDetails};
pub use rider::{Rider, RiderDetails, RiderSummary};

/// Minimum trimmed character count for a required text field.
pub(crate) fn require_min_chars(
    field: &str,
    value: &str,
    min: usize,
) -> paddock_core::DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        return Err(paddock_core::DomainError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(trimmed.to_string())
}
