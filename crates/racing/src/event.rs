use chrono::NaiveDate;
use serde::Serialize;

use paddock_core::{DomainError, DomainResult, Entity, EventId, Owned, UserId};

use crate::require_min_chars;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A race event. `owner_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}

impl Event {
    pub fn from_details(id: EventId, owner_id: UserId, details: EventDetails) -> Self {
        Self {
            id,
            owner_id,
            name: details.name,
            description: details.description,
            date: details.date,
            location: details.location,
        }
    }

    /// Replace the mutable fields; id and owner are untouched.
    pub fn apply(&mut self, details: EventDetails) {
        self.name = details.name;
        self.description = details.description;
        self.date = details.date;
        self.location = details.location;
    }
}

impl Entity for Event {
    type Id = EventId;

    fn id(&self) -> EventId {
        self.id
    }
}

impl Owned for Event {
    const KIND: &'static str = "event";

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// The caller-editable part of an event, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}

impl EventDetails {
    pub fn parse(name: &str, description: &str, date: &str, location: &str) -> DomainResult<Self> {
        let name = require_min_chars("name", name, 3)?;
        let description = require_min_chars("description", description, 10)?;
        let location = require_min_chars("location", location, 3)?;
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| DomainError::validation("date must be formatted as YYYY-MM-DD"))?;

        Ok(Self {
            name,
            description,
            date,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> EventDetails {
        EventDetails::parse("Hangtown", "Season opener in the foothills", "2025-05-24", "Rancho Cordova")
            .unwrap()
    }

    #[test]
    fn parse_trims_and_reads_date() {
        let d = EventDetails::parse("  Pala ", "National round one", " 2025-05-31 ", " Pala, CA ").unwrap();
        assert_eq!(d.name, "Pala");
        assert_eq!(d.location, "Pala, CA");
        assert_eq!(d.date, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
    }

    #[test]
    fn parse_rejects_short_fields_and_bad_dates() {
        let cases = [
            ("Pa", "National round one", "2025-05-31", "Pala"),
            ("Pala", "too short", "2025-05-31", "Pala"),
            ("Pala", "National round one", "2025-05-31", "CA"),
            ("Pala", "National round one", "31/05/2025", "Pala"),
            ("Pala", "National round one", "2025-02-30", "Pala"),
        ];
        for (n, desc, date, loc) in cases {
            let err = EventDetails::parse(n, desc, date, loc).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{n}/{desc}/{date}/{loc}");
        }
    }

    #[test]
    fn apply_keeps_identity_and_owner() {
        let mut event = Event::from_details(EventId::new(4), UserId::new(9), details());
        let update = EventDetails::parse("Thunder Valley", "High altitude round", "2025-06-07", "Lakewood")
            .unwrap();
        event.apply(update);
        assert_eq!(event.id, EventId::new(4));
        assert_eq!(event.owner_id, UserId::new(9));
        assert_eq!(event.name, "Thunder Valley");
    }

    #[test]
    fn serializes_camel_case_with_iso_date() {
        let event = Event::from_details(EventId::new(1), UserId::new(2), details());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["ownerId"], 2);
        assert_eq!(json["date"], "2025-05-24");
    }
}
