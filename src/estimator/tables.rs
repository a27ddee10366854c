use std::collections::HashMap;

/// Rate applied when a city has no entry of its own, in rupees per sqft.
pub const DEFAULT_BASE_RATE: f64 = 8000.0;

/// Static pricing reference data: per-city base rates and per-city locality
/// multipliers. Built once at startup and shared read-only; lookups never
/// fail, they fall back to [`DEFAULT_BASE_RATE`] and a neutral multiplier.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    city_base_rates: HashMap<String, f64>,
    locality_multipliers: HashMap<String, HashMap<String, f64>>,
}

impl ReferenceTables {
    pub fn builtin() -> Self {
        let city_base_rates = [
            ("Mumbai", 18000.0),
            ("Delhi", 10000.0),
            ("Bangalore", 9500.0),
            ("Pune", 8000.0),
            ("Hyderabad", 7500.0),
            ("Chennai", 7000.0),
            ("Kolkata", 6500.0),
            ("Ahmedabad", 6000.0),
        ]
        .into_iter()
        .map(|(city, rate)| (city.to_string(), rate))
        .collect();

        let locality_multipliers = [
            (
                "Mumbai",
                &[
                    ("Andheri West", 1.2),
                    ("Bandra West", 1.5),
                    ("Powai", 1.3),
                    ("default", 1.0),
                ][..],
            ),
            (
                "Delhi",
                &[
                    ("Dwarka", 1.1),
                    ("Rohini", 1.0),
                    ("Vasant Kunj", 1.4),
                    ("default", 1.0),
                ][..],
            ),
            (
                "Bangalore",
                &[
                    ("Whitefield", 1.2),
                    ("Koramangala", 1.3),
                    ("Indiranagar", 1.4),
                    ("default", 1.0),
                ][..],
            ),
            (
                "Pune",
                &[
                    ("Hinjewadi", 1.1),
                    ("Wakad", 1.0),
                    ("Baner", 1.2),
                    ("default", 1.0),
                ][..],
            ),
        ]
        .into_iter()
        .map(|(city, entries)| {
            let localities = entries
                .iter()
                .map(|(locality, mult)| (locality.to_string(), *mult))
                .collect();
            (city.to_string(), localities)
        })
        .collect();

        Self { city_base_rates, locality_multipliers }
    }

    /// Base rate for a city, falling back to [`DEFAULT_BASE_RATE`].
    pub fn base_rate(&self, city: &str) -> f64 {
        self.city_base_rates
            .get(city)
            .copied()
            .unwrap_or(DEFAULT_BASE_RATE)
    }

    /// Multiplier for a locality: exact match first, then the city's
    /// "default" entry, then 1.0 for cities with no multiplier table at all.
    pub fn locality_multiplier(&self, city: &str, locality: &str) -> f64 {
        let Some(localities) = self.locality_multipliers.get(city) else {
            return 1.0;
        };

        localities
            .get(locality)
            .or_else(|| localities.get("default"))
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_uses_its_base_rate() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.base_rate("Mumbai"), 18000.0);
        assert_eq!(tables.base_rate("Ahmedabad"), 6000.0);
    }

    #[test]
    fn unknown_city_falls_back_to_default_rate() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.base_rate("Atlantis"), DEFAULT_BASE_RATE);
    }

    #[test]
    fn exact_locality_match_wins() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.locality_multiplier("Mumbai", "Bandra West"), 1.5);
        assert_eq!(tables.locality_multiplier("Delhi", "Vasant Kunj"), 1.4);
    }

    #[test]
    fn unknown_locality_uses_city_default_entry() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.locality_multiplier("Mumbai", "Elsewhere"), 1.0);
    }

    #[test]
    fn city_without_multiplier_table_is_neutral() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.locality_multiplier("Chennai", "Adyar"), 1.0);
        assert_eq!(tables.locality_multiplier("Atlantis", "Anywhere"), 1.0);
    }
}
