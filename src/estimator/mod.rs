//! Rule-based price estimation.
//!
//! A city base rate is scaled by an ordered chain of multiplicative
//! adjustments and projected to a price range. The computation is pure and
//! deterministic except for the bounded confidence draw, which comes from a
//! caller-supplied generator so tests can pin it.

use rand::Rng;
use thiserror::Error;
use tracing::debug;

mod models;
mod tables;

pub use models::{Furnishing, PredictionRequest, PriceEstimate, PropertyDetails};
pub use tables::{ReferenceTables, DEFAULT_BASE_RATE};

/// Range ratios around the average price.
const MIN_RATIO: f64 = 0.85;
const MAX_RATIO: f64 = 1.15;
const FAIR_RATIO: f64 = 0.98;

/// Age discount per year, floored so old buildings stop depreciating.
const AGE_DISCOUNT_PER_YEAR: f64 = 0.015;
const AGE_FACTOR_FLOOR: f64 = 0.70;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    /// One or more required fields absent. Empty strings and zero numerics
    /// count as absent, matching the wire format's handling.
    #[error("Missing required fields")]
    MissingFields,
}

/// A single named multiplier in the adjustment chain.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Adjustment {
    label: &'static str,
    factor: f64,
}

/// Validates the request and computes its price estimate.
///
/// Never fails for unknown cities or localities (those fall back to the
/// reference-table defaults); the only error is missing required fields.
pub fn estimate(
    request: &PredictionRequest,
    tables: &ReferenceTables,
    rng: &mut impl Rng,
) -> Result<PriceEstimate, EstimateError> {
    let property = PropertyDetails::from_request(request)?;
    Ok(estimate_property(&property, tables, rng))
}

/// Computes the estimate for an already-validated submission.
pub fn estimate_property(
    property: &PropertyDetails,
    tables: &ReferenceTables,
    rng: &mut impl Rng,
) -> PriceEstimate {
    let base_rate = tables.base_rate(&property.city);
    let locality_mult = tables.locality_multiplier(&property.city, &property.locality);

    let price_per_sqft = adjustments(property)
        .iter()
        .fold(base_rate * locality_mult, |price, adjustment| {
            debug!(
                label = adjustment.label,
                factor = adjustment.factor,
                price,
                "Applying adjustment"
            );
            price * adjustment.factor
        });

    let avg_price = price_per_sqft * property.total_area;

    PriceEstimate {
        predicted_min_price: round_rupees(avg_price * MIN_RATIO),
        predicted_avg_price: round_rupees(avg_price),
        predicted_max_price: round_rupees(avg_price * MAX_RATIO),
        predicted_fair_value: round_rupees(avg_price * FAIR_RATIO),
        price_per_sqft: round_rupees(price_per_sqft),
        confidence_score: confidence_score(rng),
    }
}

/// The ordered adjustment chain: bedroom count, furnishing, age, amenities,
/// floor position. Absent optional fields contribute no entry.
fn adjustments(property: &PropertyDetails) -> Vec<Adjustment> {
    let mut chain = Vec::new();

    if property.bhk >= 3 {
        chain.push(Adjustment { label: "bhk", factor: 1.10 });
    }

    if let Some(furnishing) = Furnishing::parse(&property.furnishing_status) {
        chain.push(Adjustment { label: "furnishing", factor: furnishing.factor() });
    }

    if let Some(age) = property.property_age {
        let factor = (1.0 - age * AGE_DISCOUNT_PER_YEAR).max(AGE_FACTOR_FLOOR);
        chain.push(Adjustment { label: "age", factor });
    }

    if property.has_lift {
        chain.push(Adjustment { label: "lift", factor: 1.05 });
    }
    if property.has_security {
        chain.push(Adjustment { label: "security", factor: 1.03 });
    }
    if property.has_power_backup {
        chain.push(Adjustment { label: "power_backup", factor: 1.02 });
    }
    if property.parking {
        chain.push(Adjustment { label: "parking", factor: 1.04 });
    }

    // total_floors of zero means the floor-position data is absent, not a
    // division error.
    if let (Some(floor), Some(total)) = (property.floor_number, property.total_floors) {
        if total > 0 {
            let ratio = floor as f64 / total as f64;
            if ratio > 0.5 && ratio < 0.9 {
                chain.push(Adjustment { label: "floor", factor: 1.05 });
            }
        }
    }

    chain
}

/// Heuristic self-reported reliability: 75 plus a uniform draw below 15,
/// capped at 95, one decimal place.
fn confidence_score(rng: &mut impl Rng) -> f64 {
    let draw: f64 = rng.gen_range(0.0..15.0);
    round_to_tenth(95.0_f64.min(75.0 + draw))
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Half-away-from-zero rounding to whole rupees; all monetary values here
/// are non-negative.
fn round_rupees(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn request(city: &str, locality: &str, bhk: u32, total_area: f64) -> PredictionRequest {
        PredictionRequest {
            city: Some(city.to_string()),
            locality: Some(locality.to_string()),
            bhk: Some(bhk),
            total_area: Some(total_area),
            bathrooms: Some(1),
            furnishing_status: Some("Unfurnished".to_string()),
            ..Default::default()
        }
    }

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn range_ordering_holds() {
        let mut req = request("Mumbai", "Powai", 3, 1200.0);
        req.property_age = Some(12.0);
        req.has_lift = true;
        req.has_security = true;
        req.has_power_backup = true;
        req.parking = true;
        req.floor_number = Some(7);
        req.total_floors = Some(10);
        req.furnishing_status = Some("Fully-Furnished".to_string());

        let estimate = estimate(&req, &tables(), &mut rng()).unwrap();

        assert!(estimate.predicted_min_price <= estimate.predicted_fair_value);
        assert!(estimate.predicted_fair_value <= estimate.predicted_avg_price);
        assert!(estimate.predicted_avg_price <= estimate.predicted_max_price);
        assert!(estimate.price_per_sqft > 0);
    }

    #[test]
    fn unknown_city_falls_back_to_default_rate() {
        let estimate = estimate(&request("Unknown", "X", 2, 1000.0), &tables(), &mut rng()).unwrap();

        assert_eq!(estimate.price_per_sqft, 8_000);
        assert_eq!(estimate.predicted_avg_price, 8_000_000);
        assert_eq!(estimate.predicted_min_price, 6_800_000);
        assert_eq!(estimate.predicted_max_price, 9_200_000);
        assert_eq!(estimate.predicted_fair_value, 7_840_000);
    }

    #[test]
    fn known_city_and_locality_use_table_rates() {
        let estimate =
            estimate(&request("Mumbai", "Bandra West", 1, 500.0), &tables(), &mut rng()).unwrap();

        assert_eq!(estimate.price_per_sqft, 27_000);
        assert_eq!(estimate.predicted_avg_price, 13_500_000);
        assert_eq!(estimate.predicted_min_price, 11_475_000);
        assert_eq!(estimate.predicted_max_price, 15_525_000);
        assert_eq!(estimate.predicted_fair_value, 13_230_000);
    }

    #[test]
    fn three_bedrooms_add_exactly_ten_percent() {
        let two = estimate(&request("Pune", "Wakad", 2, 1000.0), &tables(), &mut rng()).unwrap();
        let three = estimate(&request("Pune", "Wakad", 3, 1000.0), &tables(), &mut rng()).unwrap();

        assert_eq!(three.price_per_sqft * 10, two.price_per_sqft * 11);
    }

    #[test]
    fn furnishing_premiums_apply_once() {
        let mut req = request("Pune", "Wakad", 2, 1000.0);

        req.furnishing_status = Some("Fully-Furnished".to_string());
        let fully = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(fully.price_per_sqft, 9_200);

        req.furnishing_status = Some("Semi-Furnished".to_string());
        let semi = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(semi.price_per_sqft, 8_640);

        req.furnishing_status = Some("Partly Done".to_string());
        let unrecognized = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(unrecognized.price_per_sqft, 8_000);
    }

    #[test]
    fn floor_bonus_boundaries_are_strict() {
        let mut req = request("Pune", "Wakad", 2, 1000.0);
        req.total_floors = Some(10);

        req.floor_number = Some(5);
        let at_half = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(at_half.price_per_sqft, 8_000);

        req.floor_number = Some(6);
        let inside = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(inside.price_per_sqft, 8_400);

        req.floor_number = Some(9);
        let at_point_nine = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(at_point_nine.price_per_sqft, 8_000);
    }

    #[test]
    fn zero_total_floors_is_treated_as_absent() {
        let mut req = request("Pune", "Wakad", 2, 1000.0);
        req.floor_number = Some(3);
        req.total_floors = Some(0);

        let estimate = estimate(&req, &tables(), &mut rng()).unwrap();
        assert_eq!(estimate.price_per_sqft, 8_000);
    }

    #[test]
    fn age_discount_is_floored() {
        let mut req = request("Pune", "Wakad", 2, 1000.0);

        req.property_age = Some(50.0);
        let fifty = estimate(&req, &tables(), &mut rng()).unwrap();

        req.property_age = Some(100.0);
        let hundred = estimate(&req, &tables(), &mut rng()).unwrap();

        assert_eq!(fifty.price_per_sqft, hundred.price_per_sqft);
        assert_eq!(fifty.price_per_sqft, 5_600);
    }

    #[test]
    fn amenity_factors_compound() {
        let mut req = request("Pune", "Wakad", 2, 1000.0);
        req.has_lift = true;
        req.has_security = true;
        req.has_power_backup = true;
        req.parking = true;

        let estimate = estimate(&req, &tables(), &mut rng()).unwrap();

        // 8000 * 1.05 * 1.03 * 1.02 * 1.04
        assert_eq!(estimate.price_per_sqft, 9_178);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut req = request("Pune", "Wakad", 2, 1000.0);
        req.furnishing_status = None;

        assert_eq!(
            estimate(&req, &tables(), &mut rng()).unwrap_err(),
            EstimateError::MissingFields
        );
    }

    #[test]
    fn confidence_pinned_to_minimum_draw() {
        let mut zero = StepRng::new(0, 0);
        let estimate = estimate(&request("Pune", "Wakad", 2, 1000.0), &tables(), &mut zero).unwrap();
        assert_eq!(estimate.confidence_score, 75.0);
    }

    #[test]
    fn confidence_stays_within_bounds_at_maximum_draw() {
        let mut max = StepRng::new(u64::MAX, 0);
        let estimate = estimate(&request("Pune", "Wakad", 2, 1000.0), &tables(), &mut max).unwrap();
        assert!(estimate.confidence_score >= 75.0);
        assert!(estimate.confidence_score < 95.0);
    }

    #[test]
    fn confidence_bounds_hold_across_seeds() {
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let estimate =
                estimate(&request("Pune", "Wakad", 2, 1000.0), &tables(), &mut rng).unwrap();
            assert!(estimate.confidence_score >= 75.0);
            assert!(estimate.confidence_score <= 95.0);
        }
    }

    #[test]
    fn identical_inputs_and_seed_are_deterministic() {
        let req = request("Mumbai", "Andheri West", 3, 850.0);

        let first = estimate(&req, &tables(), &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let second = estimate(&req, &tables(), &mut ChaCha8Rng::seed_from_u64(7)).unwrap();

        assert_eq!(first, second);
    }
}
