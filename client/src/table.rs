//! Client-side table sorting.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::types::Trip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Driver,
    Truck,
    Fuel,
    Status,
    Liters,
    DepartureDate,
    Origin,
    Destination,
}

impl FromStr for SortField {
    type Err = String;

    /// Accepts the camelCase column names used in the API.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "driver" => Self::Driver,
            "truck" => Self::Truck,
            "fuel" => Self::Fuel,
            "status" => Self::Status,
            "liters" => Self::Liters,
            "departureDate" => Self::DepartureDate,
            "origin" => Self::Origin,
            "destination" => Self::Destination,
            other => return Err(format!("Unknown sort field: {other}")),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Current sort column. Clicking the same column cycles
/// asc → desc → unsorted; a different column starts at asc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    active: Option<(SortField, SortDirection)>,
}

impl SortConfig {
    pub fn field(&self) -> Option<SortField> {
        self.active.map(|(f, _)| f)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, d)| d)
    }

    /// Direction shown on `field`'s header, if it is the sorted one.
    pub fn direction_for(&self, field: SortField) -> Option<SortDirection> {
        self.active.filter(|(f, _)| *f == field).map(|(_, d)| d)
    }

    pub fn toggle(&mut self, field: SortField) {
        self.active = match self.active {
            Some((current, SortDirection::Asc)) if current == field => {
                Some((field, SortDirection::Desc))
            }
            Some((current, SortDirection::Desc)) if current == field => None,
            _ => Some((field, SortDirection::Asc)),
        };
    }

    /// Sorted copy of `trips`; the input order is kept when unsorted and
    /// between equal keys.
    pub fn apply(&self, trips: &[Trip]) -> Vec<Trip> {
        let mut sorted = trips.to_vec();
        if let Some((field, direction)) = self.active {
            sorted.sort_by(|a, b| {
                let ord = compare(field, a, b);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        sorted
    }
}

fn compare(field: SortField, a: &Trip, b: &Trip) -> Ordering {
    let text = |x: &str, y: &str| x.to_lowercase().cmp(&y.to_lowercase());
    match field {
        SortField::Driver => text(&a.driver, &b.driver),
        SortField::Truck => text(&a.truck, &b.truck),
        SortField::Origin => text(&a.origin, &b.origin),
        SortField::Destination => text(&a.destination, &b.destination),
        SortField::Fuel => text(a.fuel.as_str(), b.fuel.as_str()),
        SortField::Status => text(a.status.as_str(), b.status.as_str()),
        SortField::Liters => a.liters.cmp(&b.liters),
        SortField::DepartureDate => a.departure_date.cmp(&b.departure_date),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{FuelType, TripStatus};

    fn trip(id: &str, driver: &str, liters: i32, day: u32) -> Trip {
        Trip {
            id: id.into(),
            truck: "TRK".into(),
            driver: driver.into(),
            origin: "A".into(),
            destination: "B".into(),
            fuel: FuelType::Diesel,
            liters,
            departure_date: Utc.with_ymd_and_hms(2030, 1, day, 8, 0, 0).unwrap(),
            status: TripStatus::Scheduled,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn ids(trips: &[Trip]) -> Vec<&str> {
        trips.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn same_field_cycles_asc_desc_none() {
        let mut sort = SortConfig::default();
        sort.toggle(SortField::Liters);
        assert_eq!(sort.direction(), Some(SortDirection::Asc));
        sort.toggle(SortField::Liters);
        assert_eq!(sort.direction(), Some(SortDirection::Desc));
        sort.toggle(SortField::Liters);
        assert_eq!(sort.field(), None);
        assert_eq!(sort.direction(), None);
    }

    #[test]
    fn new_field_starts_ascending() {
        let mut sort = SortConfig::default();
        sort.toggle(SortField::Liters);
        sort.toggle(SortField::Liters);
        sort.toggle(SortField::Driver);
        assert_eq!(sort.field(), Some(SortField::Driver));
        assert_eq!(sort.direction_for(SortField::Driver), Some(SortDirection::Asc));
        assert_eq!(sort.direction_for(SortField::Liters), None);
    }

    #[test]
    fn liters_sort_numerically_and_text_ignores_case() {
        let trips = vec![
            trip("a", "bruno", 900, 3),
            trip("b", "Ana", 10_000, 1),
            trip("c", "carla", 25, 2),
        ];

        let mut sort = SortConfig::default();
        sort.toggle(SortField::Liters);
        assert_eq!(ids(&sort.apply(&trips)), ["c", "a", "b"]);

        let mut sort = SortConfig::default();
        sort.toggle(SortField::Driver);
        assert_eq!(ids(&sort.apply(&trips)), ["b", "a", "c"]);
        sort.toggle(SortField::Driver);
        assert_eq!(ids(&sort.apply(&trips)), ["c", "a", "b"]);
        sort.toggle(SortField::Driver);
        assert_eq!(ids(&sort.apply(&trips)), ["a", "b", "c"]);
    }

    #[test]
    fn departure_sorts_by_date() {
        let trips = vec![trip("a", "x", 1, 9), trip("b", "x", 1, 2), trip("c", "x", 1, 5)];
        let mut sort = SortConfig::default();
        sort.toggle(SortField::DepartureDate);
        assert_eq!(ids(&sort.apply(&trips)), ["b", "c", "a"]);
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("departureDate".parse::<SortField>(), Ok(SortField::DepartureDate));
        assert!("mileage".parse::<SortField>().is_err());
    }
}
