use serde::{Deserialize, Serialize};

use super::EstimateError;

/// Raw prediction request as submitted by the client.
///
/// Required fields are modeled as `Option` so that absence surfaces as an
/// [`EstimateError::MissingFields`] rejection instead of a deserialization
/// failure; the contract is a 400 with `{"error": "Missing required fields"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub bhk: Option<u32>,
    #[serde(default)]
    pub total_area: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub floor_number: Option<u32>,
    #[serde(default)]
    pub total_floors: Option<u32>,
    #[serde(default)]
    pub property_age: Option<f64>,
    #[serde(default)]
    pub furnishing_status: Option<String>,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub facing_direction: Option<String>,
    #[serde(default)]
    pub has_lift: bool,
    #[serde(default)]
    pub has_security: bool,
    #[serde(default)]
    pub has_power_backup: bool,
}

/// A submission whose required fields have all been checked present.
///
/// A required field that is absent, an empty string, or zero counts as
/// missing. Optional fields stay optional; their absence only skips the
/// associated price adjustment.
#[derive(Debug, Clone)]
pub struct PropertyDetails {
    pub city: String,
    pub locality: String,
    pub pincode: Option<String>,
    pub bhk: u32,
    pub total_area: f64,
    pub bathrooms: u32,
    pub floor_number: Option<u32>,
    pub total_floors: Option<u32>,
    pub property_age: Option<f64>,
    pub furnishing_status: String,
    pub parking: bool,
    pub facing_direction: Option<String>,
    pub has_lift: bool,
    pub has_security: bool,
    pub has_power_backup: bool,
}

impl PropertyDetails {
    pub fn from_request(request: &PredictionRequest) -> Result<Self, EstimateError> {
        Ok(Self {
            city: required_text(&request.city)?,
            locality: required_text(&request.locality)?,
            pincode: request.pincode.clone(),
            bhk: required_count(request.bhk)?,
            total_area: request
                .total_area
                .filter(|area| *area > 0.0)
                .ok_or(EstimateError::MissingFields)?,
            bathrooms: required_count(request.bathrooms)?,
            floor_number: request.floor_number,
            total_floors: request.total_floors,
            property_age: request.property_age,
            furnishing_status: required_text(&request.furnishing_status)?,
            parking: request.parking,
            facing_direction: request.facing_direction.clone(),
            has_lift: request.has_lift,
            has_security: request.has_security,
            has_power_backup: request.has_power_backup,
        })
    }
}

fn required_text(value: &Option<String>) -> Result<String, EstimateError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(EstimateError::MissingFields)
}

fn required_count(value: Option<u32>) -> Result<u32, EstimateError> {
    value.filter(|count| *count > 0).ok_or(EstimateError::MissingFields)
}

/// Furnishing levels that carry a price premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Furnishing {
    Unfurnished,
    SemiFurnished,
    FullyFurnished,
}

impl Furnishing {
    /// Parses the wire value; unrecognized labels price like unfurnished.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Unfurnished" => Some(Self::Unfurnished),
            "Semi-Furnished" => Some(Self::SemiFurnished),
            "Fully-Furnished" => Some(Self::FullyFurnished),
            _ => None,
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Self::Unfurnished => 1.0,
            Self::SemiFurnished => 1.08,
            Self::FullyFurnished => 1.15,
        }
    }
}

/// Computed price range for a submission, in whole rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub predicted_min_price: i64,
    pub predicted_avg_price: i64,
    pub predicted_max_price: i64,
    pub predicted_fair_value: i64,
    pub price_per_sqft: i64,
    pub confidence_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply_to_absent_fields() {
        let request: PredictionRequest = serde_json::from_str(
            r#"{
                "city": "Pune",
                "locality": "Baner",
                "bhk": 2,
                "total_area": 900.0,
                "bathrooms": 2,
                "furnishing_status": "Unfurnished"
            }"#,
        )
        .unwrap();

        assert!(!request.parking);
        assert!(!request.has_lift);
        assert!(!request.has_security);
        assert!(!request.has_power_backup);
        assert_eq!(request.floor_number, None);
        assert_eq!(request.property_age, None);
    }

    #[test]
    fn empty_or_zero_required_fields_count_as_missing() {
        let request = PredictionRequest {
            city: Some("  ".to_string()),
            locality: Some("Baner".to_string()),
            bhk: Some(2),
            total_area: Some(900.0),
            bathrooms: Some(2),
            furnishing_status: Some("Unfurnished".to_string()),
            ..Default::default()
        };
        assert_eq!(
            PropertyDetails::from_request(&request).unwrap_err(),
            EstimateError::MissingFields
        );

        let request = PredictionRequest {
            city: Some("Pune".to_string()),
            locality: Some("Baner".to_string()),
            bhk: Some(0),
            total_area: Some(900.0),
            bathrooms: Some(2),
            furnishing_status: Some("Unfurnished".to_string()),
            ..Default::default()
        };
        assert_eq!(
            PropertyDetails::from_request(&request).unwrap_err(),
            EstimateError::MissingFields
        );
    }

    #[test]
    fn furnishing_parse_matches_wire_labels() {
        assert_eq!(Furnishing::parse("Unfurnished"), Some(Furnishing::Unfurnished));
        assert_eq!(Furnishing::parse("Semi-Furnished"), Some(Furnishing::SemiFurnished));
        assert_eq!(Furnishing::parse("Fully-Furnished"), Some(Furnishing::FullyFurnished));
        assert_eq!(Furnishing::parse("Bespoke"), None);
    }

    #[test]
    fn estimate_serializes_with_wire_field_names() {
        let estimate = PriceEstimate {
            predicted_min_price: 6_800_000,
            predicted_avg_price: 8_000_000,
            predicted_max_price: 9_200_000,
            predicted_fair_value: 7_840_000,
            price_per_sqft: 8_000,
            confidence_score: 82.5,
        };

        let value = serde_json::to_value(&estimate).unwrap();
        assert_eq!(value["predicted_min_price"], 6_800_000);
        assert_eq!(value["predicted_fair_value"], 7_840_000);
        assert_eq!(value["price_per_sqft"], 8_000);
        assert_eq!(value["confidence_score"], 82.5);
    }
}
