use serde::Serialize;

use paddock_core::{DomainError, DomainResult, Entity, Owned, RiderId, UserId};

use crate::require_min_chars;

pub const DEFAULT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: RiderId,
    pub owner_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub number: i32,
    pub team: String,
    pub bike_brand: String,
    pub class: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub career_points: i64,
    pub status: String,
}

impl Rider {
    pub fn from_details(id: RiderId, owner_id: UserId, details: RiderDetails) -> Self {
        Self {
            id,
            owner_id,
            first_name: details.first_name,
            last_name: details.last_name,
            number: details.number,
            team: details.team,
            bike_brand: details.bike_brand,
            class: details.class,
            nationality: details.nationality,
            date_of_birth: details.date_of_birth,
            career_points: details.career_points,
            status: details.status,
        }
    }

    pub fn apply(&mut self, details: RiderDetails) {
        let RiderDetails {
            first_name,
            last_name,
            number,
            team,
            bike_brand,
            class,
            nationality,
            date_of_birth,
            career_points,
            status,
        } = details;
        self.first_name = first_name;
        self.last_name = last_name;
        self.number = number;
        self.team = team;
        self.bike_brand = bike_brand;
        self.class = class;
        self.nationality = nationality;
        self.date_of_birth = date_of_birth;
        self.career_points = career_points;
        self.status = status;
    }

    pub fn summary(&self) -> RiderSummary {
        RiderSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

impl Entity for Rider {
    type Id = RiderId;

    fn id(&self) -> RiderId {
        self.id
    }
}

impl Owned for Rider {
    const KIND: &'static str = "rider";

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Minimal rider identity returned by attendee listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderSummary {
    pub id: RiderId,
    pub first_name: String,
    pub last_name: String,
}

/// Caller-editable rider fields.
///
/// Build it from raw input, then call [`RiderDetails::validated`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RiderDetails {
    pub first_name: String,
    pub last_name: String,
    pub number: i32,
    pub team: String,
    pub bike_brand: String,
    pub class: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub career_points: i64,
    pub status: String,
}

impl RiderDetails {
    pub fn validated(self) -> DomainResult<Self> {
        let first_name = require_min_chars("firstName", &self.first_name, 3)?;
        let last_name = require_min_chars("lastName", &self.last_name, 3)?;

        if self.number <= 0 {
            return Err(DomainError::validation("number must be a positive integer"));
        }
        if self.career_points < 0 {
            return Err(DomainError::validation("careerPoints cannot be negative"));
        }

        let status = match self.status.trim() {
            "" => DEFAULT_STATUS.to_string(),
            s => s.to_string(),
        };

        Ok(Self {
            first_name,
            last_name,
            number: self.number,
            team: self.team.trim().to_string(),
            bike_brand: self.bike_brand.trim().to_string(),
            class: self.class.trim().to_string(),
            nationality: self.nationality.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
            career_points: self.career_points,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw() -> RiderDetails {
        RiderDetails {
            first_name: "Jett".to_string(),
            last_name: "Lawrence".to_string(),
            number: 18,
            team: " Honda HRC ".to_string(),
            class: "450".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn validated_defaults_status_and_trims() {
        let d = raw().validated().unwrap();
        assert_eq!(d.status, DEFAULT_STATUS);
        assert_eq!(d.team, "Honda HRC");
        assert_eq!(d.career_points, 0);
    }

    #[test]
    fn rejects_short_names() {
        let mut d = raw();
        d.first_name = "Jo".to_string();
        assert!(matches!(d.validated(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn summary_projects_identity_only() {
        let rider = Rider::from_details(RiderId::new(3), UserId::new(1), raw().validated().unwrap());
        let json = serde_json::to_value(rider.summary()).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "firstName": "Jett", "lastName": "Lawrence"}));
    }

    #[test]
    fn apply_keeps_owner() {
        let mut rider = Rider::from_details(RiderId::new(3), UserId::new(1), raw().validated().unwrap());
        let mut update = raw();
        update.number = 1;
        rider.apply(update.validated().unwrap());
        assert_eq!(rider.number, 1);
        assert_eq!(rider.owner_id, UserId::new(1));
    }

    proptest! {
        #[test]
        fn non_positive_numbers_are_rejected(n in i32::MIN..=0) {
            let mut d = raw();
            d.number = n;
            prop_assert!(d.validated().is_err());
        }
    }
}
