//! Time-slot enumeration for trainer bookings.
//!
//! The bookable day is a fixed, finite set of hour-wide labels; nothing is
//! derived from trainer calendars. A slot label is the atomic unit of
//! booking capacity: availability for a (trainer, date) pair is this universe
//! minus the labels held by live bookings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The full enumeration of bookable slots in a day, in chronological order.
pub const SLOT_UNIVERSE: [&str; 12] = [
    "08:00-09:00",
    "09:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "12:00-13:00",
    "13:00-14:00",
    "14:00-15:00",
    "15:00-16:00",
    "16:00-17:00",
    "17:00-18:00",
    "18:00-19:00",
    "19:00-20:00",
];

/// A validated slot label, e.g. `"09:00-10:00"`.
///
/// Only members of [`SLOT_UNIVERSE`] construct successfully, so a stored
/// label is always a real slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SlotLabel(String);

impl SlotLabel {
    /// Parses a slot label, accepting only members of the fixed universe.
    ///
    /// # Errors
    ///
    /// Returns the rejected input when the label is not in [`SLOT_UNIVERSE`].
    pub fn parse(label: &str) -> Result<Self, String> {
        if SLOT_UNIVERSE.contains(&label) {
            Ok(Self(label.to_string()))
        } else {
            Err(format!("'{label}' is not a valid time slot"))
        }
    }

    /// Returns the label as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SlotLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Availability partition for one (trainer, date) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotPartition {
    /// Slots with no live booking, in universe order
    pub available: Vec<String>,
    /// Slots held by a live booking, in universe order
    pub booked: Vec<String>,
}

/// Splits the universe into available and booked slots given the labels of
/// live bookings.
///
/// Labels outside the universe are ignored; cancelled/completed bookings
/// must be filtered out by the caller (the ledger query selects live
/// statuses only).
#[must_use]
pub fn partition(live_labels: &[SlotLabel]) -> SlotPartition {
    let mut available = Vec::new();
    let mut booked = Vec::new();
    for slot in SLOT_UNIVERSE {
        if live_labels.iter().any(|l| l.as_str() == slot) {
            booked.push(slot.to_string());
        } else {
            available.push(slot.to_string());
        }
    }
    SlotPartition { available, booked }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn universe_members_parse() {
        for slot in SLOT_UNIVERSE {
            assert!(SlotLabel::parse(slot).is_ok());
        }
    }

    #[test]
    fn invalid_labels_rejected() {
        for bad in ["07:00-08:00", "09:00-11:00", "9:00-10:00", "morning", ""] {
            assert!(SlotLabel::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn empty_ledger_means_all_available() {
        let p = partition(&[]);
        assert_eq!(p.available.len(), SLOT_UNIVERSE.len());
        assert!(p.booked.is_empty());
    }

    #[test]
    fn booked_slots_are_subtracted() {
        let held = vec![
            SlotLabel::parse("09:00-10:00").unwrap(),
            SlotLabel::parse("16:00-17:00").unwrap(),
        ];
        let p = partition(&held);
        assert_eq!(p.booked, vec!["09:00-10:00", "16:00-17:00"]);
        assert_eq!(p.available.len(), SLOT_UNIVERSE.len() - 2);
        assert!(!p.available.contains(&"09:00-10:00".to_string()));
    }

    #[test]
    fn partition_preserves_universe_order() {
        let held = vec![SlotLabel::parse("19:00-20:00").unwrap()];
        let p = partition(&held);
        assert_eq!(p.available.first().map(String::as_str), Some("08:00-09:00"));
        assert_eq!(p.booked, vec!["19:00-20:00"]);
    }

    #[test]
    fn slot_label_round_trips_through_serde() {
        let label: SlotLabel = serde_json::from_str("\"09:00-10:00\"").unwrap();
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"09:00-10:00\"");
        assert!(serde_json::from_str::<SlotLabel>("\"25:00-26:00\"").is_err());
    }
}
