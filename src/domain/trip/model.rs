//! Trip domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Fuel carried by a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "Diesel")]
    Diesel,
    #[serde(rename = "Super Gasoline")]
    SuperGasoline,
    #[serde(rename = "Premium Gasoline")]
    PremiumGasoline,
    #[serde(rename = "CNG")]
    Cng,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Diesel,
        FuelType::SuperGasoline,
        FuelType::PremiumGasoline,
        FuelType::Cng,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diesel => "Diesel",
            Self::SuperGasoline => "Super Gasoline",
            Self::PremiumGasoline => "Premium Gasoline",
            Self::Cng => "CNG",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Invalid fuel type: {}", s)))
    }
}

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripStatus {
    #[serde(rename = "Scheduled")]
    Scheduled,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 4] = [
        TripStatus::Scheduled,
        TripStatus::InTransit,
        TripStatus::Delivered,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Transition table used when strict lifecycle checks are enabled.
    /// Re-setting the current status is always allowed.
    pub fn can_transition_to(&self, next: TripStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            Self::Scheduled => matches!(next, Self::InTransit | Self::Cancelled),
            Self::InTransit => matches!(next, Self::Delivered | Self::Cancelled),
            Self::Delivered | Self::Cancelled => false,
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Invalid trip status: {}", s)))
    }
}

/// A fuel delivery trip
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Store-assigned identifier
    pub id: String,
    /// Truck plate / identifier
    pub truck: String,
    /// Driver name
    pub driver: String,
    pub origin: String,
    pub destination: String,
    pub fuel: FuelType,
    /// Quantity in liters (1..=30000)
    pub liters: i32,
    pub departure_date: DateTime<Utc>,
    pub status: TripStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields required to persist a new trip
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub truck: String,
    pub driver: String,
    pub origin: String,
    pub destination: String,
    pub fuel: FuelType,
    pub liters: i32,
    pub departure_date: DateTime<Utc>,
    pub status: TripStatus,
}

/// Partial trip record: only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPatch {
    pub truck: Option<String>,
    pub driver: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub fuel: Option<FuelType>,
    pub liters: Option<i32>,
    pub departure_date: Option<DateTime<Utc>>,
    pub status: Option<TripStatus>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        *self == TripPatch::default()
    }

    /// Liters or departure date changes require re-validation.
    pub fn touches_validated_fields(&self) -> bool {
        self.liters.is_some() || self.departure_date.is_some()
    }

    /// Apply the patch onto an existing trip in place.
    pub fn apply_to(self, trip: &mut Trip) {
        if let Some(truck) = self.truck {
            trip.truck = truck;
        }
        if let Some(driver) = self.driver {
            trip.driver = driver;
        }
        if let Some(origin) = self.origin {
            trip.origin = origin;
        }
        if let Some(destination) = self.destination {
            trip.destination = destination;
        }
        if let Some(fuel) = self.fuel {
            trip.fuel = fuel;
        }
        if let Some(liters) = self.liters {
            trip.liters = liters;
        }
        if let Some(departure_date) = self.departure_date {
            trip.departure_date = departure_date;
        }
        if let Some(status) = self.status {
            trip.status = status;
        }
    }
}

impl From<&NewTrip> for TripPatch {
    fn from(t: &NewTrip) -> Self {
        Self {
            truck: Some(t.truck.clone()),
            driver: Some(t.driver.clone()),
            origin: Some(t.origin.clone()),
            destination: Some(t.destination.clone()),
            fuel: Some(t.fuel),
            liters: Some(t.liters),
            departure_date: Some(t.departure_date),
            status: Some(t.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_round_trips_through_display_names() {
        for fuel in FuelType::ALL {
            assert_eq!(fuel.as_str().parse::<FuelType>().unwrap(), fuel);
        }
        assert!("Nafta".parse::<FuelType>().is_err());
        assert!("diesel".parse::<FuelType>().is_err());
    }

    #[test]
    fn status_serializes_with_spaces() {
        let json = serde_json::to_string(&TripStatus::InTransit).unwrap();
        assert_eq!(json, "\"In Transit\"");
        assert_eq!("In Transit".parse::<TripStatus>().unwrap(), TripStatus::InTransit);
    }

    #[test]
    fn transition_table() {
        use TripStatus::*;
        assert!(Scheduled.can_transition_to(InTransit));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(!Scheduled.can_transition_to(Delivered));
        assert!(InTransit.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Scheduled));
        assert!(!Cancelled.can_transition_to(InTransit));
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(Delivered.is_terminal());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut trip = Trip {
            id: "t1".into(),
            truck: "ABC123".into(),
            driver: "Juan Pérez".into(),
            origin: "Refinería La Plata".into(),
            destination: "YPF Recoleta".into(),
            fuel: FuelType::Diesel,
            liters: 10_000,
            departure_date: Utc::now(),
            status: TripStatus::Scheduled,
            created_at: None,
            updated_at: None,
        };
        let patch = TripPatch {
            driver: Some("Ana Martínez".into()),
            status: Some(TripStatus::InTransit),
            ..Default::default()
        };
        assert!(!patch.touches_validated_fields());
        patch.apply_to(&mut trip);
        assert_eq!(trip.driver, "Ana Martínez");
        assert_eq!(trip.status, TripStatus::InTransit);
        assert_eq!(trip.truck, "ABC123");
        assert_eq!(trip.liters, 10_000);
    }
}
