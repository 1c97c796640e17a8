//! Wire types of the Fuel Track API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
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

    /// Value sent over the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diesel => "Diesel",
            Self::SuperGasoline => "Super Gasoline",
            Self::PremiumGasoline => "Premium Gasoline",
            Self::Cng => "CNG",
        }
    }

    /// Spanish label shown in the dashboard
    pub fn label(self) -> &'static str {
        match self {
            Self::Diesel => "Diésel",
            Self::SuperGasoline => "Nafta Súper",
            Self::PremiumGasoline => "Nafta Premium",
            Self::Cng => "GNC",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown fuel type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
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

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("Unknown trip status: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub truck: String,
    pub driver: String,
    pub origin: String,
    pub destination: String,
    pub fuel: FuelType,
    pub liters: i32,
    pub departure_date: DateTime<Utc>,
    pub status: TripStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub truck: String,
    pub driver: String,
    pub origin: String,
    pub destination: String,
    pub fuel: FuelType,
    pub liters: i32,
    pub departure_date: DateTime<Utc>,
}

/// Partial update; absent fields are left untouched by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<FuelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liters: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TripStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

/// Filters and paging for `GET /api/trips`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TripListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    /// A status name, or `all` for no filter
    pub status: Option<String>,
    pub driver: Option<String>,
    pub fuel: Option<FuelType>,
}

impl TripListParams {
    /// Query pairs in a fixed order. Empty values and `status=all` are
    /// left out.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
            pairs.push(("status", status.to_string()));
        }
        if let Some(driver) = self.driver.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("driver", driver.to_string()));
        }
        if let Some(fuel) = self.fuel {
            pairs.push(("fuel", fuel.as_str().to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}
