//! City registry — loads all feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the
//! binary at compile time via [`include_str!`]. The city set is closed:
//! adding a city means creating a new TOML file and adding it to the
//! list below.

use std::sync::OnceLock;

use crate::source_def::{
    CityDefinition, NewsFeedDefinition, parse_city_toml, parse_news_toml,
};

/// City TOML configs embedded at compile time.
const CITY_TOMLS: &[(&str, &str)] = &[
    ("chicago", include_str!("../sources/chicago.toml")),
    ("nyc", include_str!("../sources/nyc.toml")),
    ("la", include_str!("../sources/la.toml")),
    ("sf", include_str!("../sources/sf.toml")),
    ("seattle", include_str!("../sources/seattle.toml")),
];

/// The global news aggregator config.
const NEWS_TOML: &str = include_str!("../sources/news.toml");

/// Total number of configured cities (used in tests).
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 5;

/// Returns all configured city definitions, parsed once from embedded
/// TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is effectively a compile-time guarantee exercised by tests).
#[must_use]
pub fn all_cities() -> &'static [CityDefinition] {
    static CITIES: OnceLock<Vec<CityDefinition>> = OnceLock::new();
    CITIES.get_or_init(|| {
        CITY_TOMLS
            .iter()
            .map(|(name, toml)| {
                parse_city_toml(toml)
                    .unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
            })
            .collect()
    })
}

/// Returns the news aggregator definition, parsed once from embedded
/// TOML.
///
/// # Panics
///
/// Panics if the news TOML config is malformed.
#[must_use]
pub fn news_feed() -> &'static NewsFeedDefinition {
    static NEWS: OnceLock<NewsFeedDefinition> = OnceLock::new();
    NEWS.get_or_init(|| {
        parse_news_toml(NEWS_TOML).unwrap_or_else(|e| panic!("Failed to parse news.toml: {e}"))
    })
}

/// Looks up a city by its short code (case-insensitive).
#[must_use]
pub fn find_city(code: &str) -> Option<&'static CityDefinition> {
    all_cities()
        .iter()
        .find(|city| city.id.eq_ignore_ascii_case(code))
}

/// Returns the default city — the fallback for unknown city codes.
#[must_use]
pub fn default_city() -> &'static CityDefinition {
    all_cities()
        .iter()
        .find(|city| city.default)
        .unwrap_or_else(|| &all_cities()[0])
}

/// Resolves a city code, falling back to the default city for unknown
/// codes. A missing or bad code never errors.
#[must_use]
pub fn resolve_city(code: Option<&str>) -> &'static CityDefinition {
    code.and_then(find_city).unwrap_or_else(default_city)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_cities() {
        assert_eq!(all_cities().len(), EXPECTED_CITY_COUNT);
    }

    #[test]
    fn city_ids_are_unique() {
        let mut ids: Vec<&str> = all_cities().iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_CITY_COUNT);
    }

    #[test]
    fn all_cities_have_required_fields() {
        for city in all_cities() {
            assert!(!city.id.is_empty(), "city id is empty");
            assert!(!city.name.is_empty(), "city name is empty");
            assert!(!city.state.is_empty(), "city state is empty");
            assert!(
                !city.crime.fields.id.is_empty(),
                "{}: crime feed has no id fields",
                city.id
            );
            assert!(
                !city.crime.fields.latitude.is_empty(),
                "{}: crime feed has no latitude fields",
                city.id
            );
            assert!(
                !city.radio.is_empty(),
                "{}: no radio streams configured",
                city.id
            );
        }
    }

    #[test]
    fn feed_ids_are_unique_across_cities() {
        let mut ids: Vec<&str> = Vec::new();
        for city in all_cities() {
            ids.push(&city.crime.id);
            if let Some(civic) = &city.civic {
                ids.push(&civic.id);
            }
            if let Some(cameras) = &city.cameras {
                ids.push(&cameras.id);
            }
        }
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "duplicate feed ids across cities");
    }

    #[test]
    fn exactly_one_default_city() {
        let defaults = all_cities().iter().filter(|c| c.default).count();
        assert_eq!(defaults, 1);
        assert_eq!(default_city().id, "chicago");
    }

    #[test]
    fn unknown_codes_resolve_to_default() {
        assert_eq!(resolve_city(Some("atlantis")).id, default_city().id);
        assert_eq!(resolve_city(None).id, default_city().id);
        assert_eq!(resolve_city(Some("SEATTLE")).id, "seattle");
    }

    #[test]
    fn news_feed_parses() {
        let news = news_feed();
        assert!(!news.fields.title.is_empty());
        assert!(!news.fields.source.is_empty());
    }
}
