//! Trip list query and the bilingual fuel synonym table

use chrono::{DateTime, Utc};

use super::model::{FuelType, Trip, TripStatus};
use crate::shared::PageRequest;

use FuelType::{Cng, Diesel, PremiumGasoline, SuperGasoline};

/// Search terms (Spanish and English) that imply one or more fuel types.
/// Keys are lowercase.
const FUEL_SYNONYMS: &[(&str, &[FuelType])] = &[
    ("diesel", &[Diesel]),
    ("diésel", &[Diesel]),
    ("gasoil", &[Diesel]),
    ("gasoleo", &[Diesel]),
    ("gasóleo", &[Diesel]),
    ("nafta", &[SuperGasoline, PremiumGasoline]),
    ("gasolina", &[SuperGasoline, PremiumGasoline]),
    ("gasoline", &[SuperGasoline, PremiumGasoline]),
    ("petrol", &[SuperGasoline, PremiumGasoline]),
    ("super", &[SuperGasoline]),
    ("súper", &[SuperGasoline]),
    ("nafta super", &[SuperGasoline]),
    ("nafta súper", &[SuperGasoline]),
    ("regular", &[SuperGasoline]),
    ("premium", &[PremiumGasoline]),
    ("nafta premium", &[PremiumGasoline]),
    ("infinia", &[PremiumGasoline]),
    ("v-power", &[PremiumGasoline]),
    ("gnc", &[Cng]),
    ("cng", &[Cng]),
    ("gas", &[Cng]),
    ("gas natural", &[Cng]),
    ("natural gas", &[Cng]),
    ("metano", &[Cng]),
];

/// Fuel types implied by a free-text search term.
///
/// The term is trimmed and lowercased; a key matches when it equals the term
/// or either one contains the other. The result keeps table order and holds
/// no duplicates.
pub fn fuel_synonyms(term: &str) -> Vec<FuelType> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for (key, fuels) in FUEL_SYNONYMS {
        if *key == term || key.contains(term.as_str()) || term.contains(key) {
            for fuel in *fuels {
                if !found.contains(fuel) {
                    found.push(*fuel);
                }
            }
        }
    }
    found
}

/// Filter request for the paginated trip list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripQuery {
    pub page: PageRequest,
    /// Free text across driver, truck, origin, destination and fuel synonyms
    pub search: Option<String>,
    pub status: Option<TripStatus>,
    /// Case-insensitive substring of the driver name
    pub driver: Option<String>,
    pub fuel: Option<FuelType>,
    /// Inclusive lower bound on the departure date
    pub departure_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the departure date
    pub departure_to: Option<DateTime<Utc>>,
}

impl TripQuery {
    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    pub fn driver_term(&self) -> Option<&str> {
        non_blank(self.driver.as_deref())
    }

    /// Evaluates the filter against a single trip. Stores that cannot push the
    /// filter down to a query engine use this directly.
    pub fn matches(&self, trip: &Trip) -> bool {
        if self.status.is_some_and(|s| s != trip.status) {
            return false;
        }
        if self.fuel.is_some_and(|f| f != trip.fuel) {
            return false;
        }
        if let Some(driver) = self.driver_term() {
            if !contains_ignore_case(&trip.driver, driver) {
                return false;
            }
        }
        if self.departure_from.is_some_and(|from| trip.departure_date < from) {
            return false;
        }
        if self.departure_to.is_some_and(|to| trip.departure_date > to) {
            return false;
        }
        if let Some(term) = self.search_term() {
            let text_hit = [&trip.driver, &trip.truck, &trip.origin, &trip.destination]
                .into_iter()
                .any(|field| contains_ignore_case(field, term));
            if !text_hit && !fuel_synonyms(term).contains(&trip.fuel) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
