//! Demo data seeding
//!
//! Fills empty stores with three login accounts and a batch of randomized
//! trips spread around the current date. Stores that already hold records
//! are left untouched.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::domain::{
    DomainResult, FuelType, NewTrip, NewUser, TripRepository, TripStatus, UserRepository, UserRole,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::shared::errors::InfraError;

pub const SEED_TRIP_COUNT: usize = 25;

const SEED_USERS: [(&str, &str, &str, UserRole); 3] = [
    ("admin@trucking.com", "admin123", "Administrator", UserRole::Admin),
    ("operator@trucking.com", "operator123", "Operator User", UserRole::Operator),
    ("test@example.com", "test123", "Test User", UserRole::Operator),
];

const DRIVERS: &[&str] = &[
    "Juan Pérez",
    "María González",
    "Carlos Rodriguez",
    "Ana Martínez",
    "Diego Silva",
    "Laura Torres",
    "Miguel Fernández",
    "Sofia Castro",
    "Roberto López",
    "Carmen Ruiz",
    "Fernando Morales",
    "Valeria Díaz",
];

const TRUCKS: &[&str] = &[
    "ABC123", "DEF456", "GHI789", "JKL012", "MNO345", "PQR678", "STU901", "VWX234", "YZA567",
    "BCD890", "EFG123", "HIJ456",
];

const ORIGINS: &[&str] = &[
    "Refinería La Plata",
    "Refinería Luján de Cuyo",
    "Terminal Dock Sud",
    "Planta YPF Ensenada",
    "Terminal Shell Campana",
    "Refinería Plaza Huincul",
    "Terminal Axion Energy",
    "Planta Puma Energy",
    "Terminal Puerto Madero",
];

const DESTINATIONS: &[&str] = &[
    "Estación de Servicio Palermo",
    "Estación YPF Recoleta",
    "Shell Belgrano",
    "Axion Villa Crespo",
    "Puma Energy Caballito",
    "YPF San Telmo",
    "Shell Puerto Madero",
    "Estación Flores",
    "Terminal La Boca",
    "YPF Barracas",
    "Shell Núñez",
    "Axion Colegiales",
    "Puma Almagro",
    "Estación Villa Urquiza",
    "YPF Chacarita",
    "Shell Villa del Parque",
];

/// What a seeding run inserted
#[derive(Debug, Default)]
pub struct SeedReport {
    pub users_created: usize,
    pub trips_created: usize,
    pub status_breakdown: BTreeMap<&'static str, usize>,
}

pub async fn seed_database(
    users: &dyn UserRepository,
    trips: &dyn TripRepository,
    bcrypt_cost: u32,
) -> DomainResult<SeedReport> {
    info!("Starting database seeding");
    let mut report = SeedReport::default();

    let existing_users = users.count().await?;
    if existing_users > 0 {
        info!(existing_users, "Users present, skipping user seed");
    } else {
        for (email, password, name, role) in SEED_USERS {
            let password_hash = hash_password(password, bcrypt_cost).map_err(InfraError::from)?;
            users
                .create(NewUser {
                    email: email.to_string(),
                    password_hash,
                    name: name.to_string(),
                    role,
                })
                .await?;
            report.users_created += 1;
        }
        info!(count = report.users_created, "Users seeded");
    }

    let existing_trips = trips.count().await?;
    if existing_trips > 0 {
        info!(existing_trips, "Trips present, skipping trip seed");
    } else {
        for trip in random_trips(SEED_TRIP_COUNT) {
            *report.status_breakdown.entry(trip.status.as_str()).or_default() += 1;
            trips.create(trip).await?;
            report.trips_created += 1;
        }
        for (status, count) in &report.status_breakdown {
            info!(status, count, "Seeded trip status");
        }
    }

    info!(
        users = report.users_created,
        trips = report.trips_created,
        "Database seeding finished"
    );
    Ok(report)
}

/// Trips departing between 30 days ago and 15 days ahead, with a status
/// consistent with the departure date.
fn random_trips(count: usize) -> Vec<NewTrip> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    (0..count)
        .map(|_| {
            let offset_days: i64 = rng.gen_range(-30..15);
            let departure_date = now + Duration::days(offset_days);

            let status = if departure_date > now {
                TripStatus::Scheduled
            } else if offset_days == 0 {
                TripStatus::InTransit
            } else if offset_days > -7 && rng.gen_bool(0.9) {
                TripStatus::Delivered
            } else if rng.gen_bool(0.15) {
                TripStatus::Cancelled
            } else {
                TripStatus::Delivered
            };

            // Diesel dominates real fleet volume
            let fuel = match rng.gen_range(0..100) {
                0..=49 => FuelType::Diesel,
                50..=74 => FuelType::SuperGasoline,
                75..=89 => FuelType::PremiumGasoline,
                _ => FuelType::Cng,
            };

            NewTrip {
                truck: pick(&mut rng, TRUCKS),
                driver: pick(&mut rng, DRIVERS),
                origin: pick(&mut rng, ORIGINS),
                destination: pick(&mut rng, DESTINATIONS),
                fuel,
                liters: rng.gen_range(5_000..28_000),
                departure_date,
                status,
            }
        })
        .collect()
}

fn pick(rng: &mut impl Rng, values: &[&str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}
