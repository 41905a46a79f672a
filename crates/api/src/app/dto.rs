use serde::{Deserialize, Serialize};

use paddock_core::DomainResult;
use paddock_racing::{EventDetails, RiderDetails};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub secret: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub name: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub location: String,
}

impl EventRequest {
    pub fn into_details(self) -> DomainResult<EventDetails> {
        EventDetails::parse(&self.name, &self.description, &self.date, &self.location)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderRequest {
    pub first_name: String,
    pub last_name: String,
    pub number: i32,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub bike_brand: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub career_points: i64,
    #[serde(default)]
    pub status: String,
}

impl RiderRequest {
    pub fn into_details(self) -> DomainResult<RiderDetails> {
        RiderDetails {
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            team: self.team,
            bike_brand: self.bike_brand,
            class: self.class,
            nationality: self.nationality,
            date_of_birth: self.date_of_birth,
            career_points: self.career_points,
            status: self.status,
        }
        .validated()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rider_request_reads_camel_case_and_defaults_optionals() {
        let req: RiderRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Ken",
            "lastName": "Roczen",
            "number": 94,
            "bikeBrand": "Suzuki",
        }))
        .unwrap();
        let details = req.into_details().unwrap();
        assert_eq!(details.bike_brand, "Suzuki");
        assert_eq!(details.career_points, 0);
        assert_eq!(details.status, "active");
    }
}
