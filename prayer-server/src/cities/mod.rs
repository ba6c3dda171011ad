//! Built-in city directory.
//!
//! Twenty Indonesian cities with the coordinates used to query prayer
//! times. Cities are looked up by a normalized key (lowercase, no
//! whitespace) matching either the local or the English name, so
//! "jakartapusat", "Central Jakarta" and "centraljakarta" all resolve to
//! the same entry.

use serde::Serialize;

use crate::domain::Language;

/// A city with coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    /// Indonesian name.
    pub local_name: &'static str,
    /// English name.
    pub english_name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    const fn new(
        local_name: &'static str,
        english_name: &'static str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            local_name,
            english_name,
            latitude,
            longitude,
        }
    }

    /// Lookup key derived from the local name.
    pub fn key(&self) -> String {
        normalize_key(self.local_name)
    }

    /// Display name for a language.
    pub fn name(&self, language: Language) -> &'static str {
        match language {
            Language::Local => self.local_name,
            Language::English => self.english_name,
        }
    }
}

const CITIES: [City; 20] = [
    City::new("Jakarta Pusat", "Central Jakarta", -6.1754, 106.8272),
    City::new("Jakarta Utara", "North Jakarta", -6.1384, 106.8661),
    City::new("Jakarta Barat", "West Jakarta", -6.1697, 106.7893),
    City::new("Jakarta Selatan", "South Jakarta", -6.2297, 106.7997),
    City::new("Jakarta Timur", "East Jakarta", -6.2088, 106.8456),
    City::new("Bandung", "Bandung", -6.9175, 107.6191),
    City::new("Surabaya", "Surabaya", -7.2575, 112.7521),
    City::new("Medan", "Medan", 3.5952, 98.6722),
    City::new("Semarang", "Semarang", -6.9932, 110.4203),
    City::new("Palembang", "Palembang", -2.9761, 104.7754),
    City::new("Makassar", "Makassar", -5.1477, 119.4327),
    City::new("Tangerang", "Tangerang", -6.2024, 106.6527),
    City::new("Depok", "Depok", -6.4025, 106.7942),
    City::new("Bekasi", "Bekasi", -6.2349, 106.9896),
    City::new("Bogor", "Bogor", -6.5971, 106.8060),
    City::new("Yogyakarta", "Yogyakarta", -7.7971, 110.3708),
    City::new("Malang", "Malang", -7.9839, 112.6214),
    City::new("Denpasar", "Denpasar", -8.6500, 115.2167),
    City::new("Padang", "Padang", -0.9444, 100.4172),
    City::new("Manado", "Manado", 1.4748, 124.8421),
];

/// All cities, in directory order.
pub fn list_cities() -> &'static [City] {
    &CITIES
}

/// The city used when none is requested (Jakarta Pusat).
pub fn default_city() -> &'static City {
    &CITIES[0]
}

/// Find a city by local or English name, ignoring case and whitespace.
///
/// # Example
///
/// ```
/// use prayer_server::cities::find_city;
///
/// let city = find_city("centraljakarta").unwrap();
/// assert_eq!(city.local_name, "Jakarta Pusat");
/// assert!(find_city("nonexistentcity").is_none());
/// ```
pub fn find_city(key: &str) -> Option<&'static City> {
    let key = normalize_key(key);
    CITIES
        .iter()
        .find(|city| normalize_key(city.local_name) == key || normalize_key(city.english_name) == key)
}

/// Lowercase and strip all whitespace.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_cities() {
        assert_eq!(list_cities().len(), 20);
    }

    #[test]
    fn first_city_is_central_jakarta() {
        let first = &list_cities()[0];
        assert_eq!(first.local_name, "Jakarta Pusat");
        assert_eq!(first.english_name, "Central Jakarta");
        assert_eq!(first.latitude, -6.1754);
        assert_eq!(first.longitude, 106.8272);
    }

    #[test]
    fn default_is_first() {
        assert_eq!(default_city(), &list_cities()[0]);
    }

    #[test]
    fn every_city_found_by_both_names() {
        for city in list_cities() {
            assert_eq!(find_city(&normalize_key(city.local_name)), Some(city));
            assert_eq!(find_city(&normalize_key(city.english_name)), Some(city));
        }
    }

    #[test]
    fn lookup_ignores_case_and_spaces() {
        let city = find_city("  Jakarta  Selatan ").unwrap();
        assert_eq!(city.english_name, "South Jakarta");

        let city = find_city("BANDUNG").unwrap();
        assert_eq!(city.local_name, "Bandung");
    }

    #[test]
    fn unknown_city_is_none() {
        assert!(find_city("nonexistentcity").is_none());
        assert!(find_city("").is_none());
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_key("Jakarta Pusat"), "jakartapusat");
        assert_eq!(normalize_key("\tNorth\nJakarta "), "northjakarta");
    }

    #[test]
    fn key_and_name() {
        let city = find_city("westjakarta").unwrap();
        assert_eq!(city.key(), "jakartabarat");
        assert_eq!(city.name(Language::Local), "Jakarta Barat");
        assert_eq!(city.name(Language::English), "West Jakarta");
    }

    #[test]
    fn serializes_fields() {
        let json = serde_json::to_value(default_city()).unwrap();
        assert_eq!(json["local_name"], "Jakarta Pusat");
        assert_eq!(json["english_name"], "Central Jakarta");
        assert_eq!(json["latitude"], -6.1754);
    }
}
