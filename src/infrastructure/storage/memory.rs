//! In-memory storage implementation

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, NewTrip, NewUser, Trip, TripPatch, TripQuery, TripRepository,
    TripStatus, User, UserRepository,
};
use crate::shared::PaginatedResult;

/// Trip record plus its insertion sequence, used to break `created_at` ties
#[derive(Clone)]
struct StoredTrip {
    seq: u64,
    trip: Trip,
}

/// In-memory trip store for development and testing
pub struct InMemoryTripRepository {
    trips: DashMap<String, StoredTrip>,
    sequence: AtomicU64,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self {
            trips: DashMap::new(),
            sequence: AtomicU64::new(1),
        }
    }

    /// Snapshot sorted newest first
    fn sorted(&self, query: Option<&TripQuery>) -> Vec<Trip> {
        let mut rows: Vec<StoredTrip> = self
            .trips
            .iter()
            .filter(|e| query.map_or(true, |q| q.matches(&e.value().trip)))
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            b.trip
                .created_at
                .cmp(&a.trip.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        rows.into_iter().map(|r| r.trip).collect()
    }
}

impl Default for InMemoryTripRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn find_all(&self) -> DomainResult<Vec<Trip>> {
        Ok(self.sorted(None))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Trip>> {
        Ok(self.trips.get(id).map(|e| e.trip.clone()))
    }

    async fn find_paginated(&self, query: &TripQuery) -> DomainResult<PaginatedResult<Trip>> {
        let matching = self.sorted(Some(query));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.page.skip() as usize)
            .take(query.page.limit as usize)
            .collect();
        Ok(PaginatedResult::new(items, total))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.trips.len() as u64)
    }

    async fn create(&self, new_trip: NewTrip) -> DomainResult<Trip> {
        let now = Utc::now();
        let trip = Trip {
            id: uuid::Uuid::new_v4().to_string(),
            truck: new_trip.truck,
            driver: new_trip.driver,
            origin: new_trip.origin,
            destination: new_trip.destination,
            fuel: new_trip.fuel,
            liters: new_trip.liters,
            departure_date: new_trip.departure_date,
            status: new_trip.status,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.trips.insert(
            trip.id.clone(),
            StoredTrip {
                seq,
                trip: trip.clone(),
            },
        );
        Ok(trip)
    }

    async fn update(&self, id: &str, patch: TripPatch) -> DomainResult<Option<Trip>> {
        let Some(mut entry) = self.trips.get_mut(id) else {
            return Ok(None);
        };
        patch.apply_to(&mut entry.trip);
        entry.trip.updated_at = Some(Utc::now());
        Ok(Some(entry.trip.clone()))
    }

    async fn soft_delete(&self, id: &str) -> DomainResult<bool> {
        match self.trips.get_mut(id) {
            Some(mut entry) => {
                entry.trip.status = TripStatus::Cancelled;
                entry.trip.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        Ok(self.trips.remove(id).is_some())
    }
}

/// In-memory user store keyed by normalized email
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(email).map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.value().clone()))
    }

    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        match self.users.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(
                "User already exists with this email".to_string(),
            )),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: uuid::Uuid::new_v4().to_string(),
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    name: new_user.name,
                    role: new_user.role,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::{FuelType, UserRole};
    use crate::shared::PageRequest;

    fn new_trip(driver: &str, status: TripStatus) -> NewTrip {
        NewTrip {
            truck: "ABC123".into(),
            driver: driver.into(),
            origin: "Campana".into(),
            destination: "Axion Once".into(),
            fuel: FuelType::Diesel,
            liters: 8_000,
            departure_date: Utc::now() + Duration::days(1),
            status,
        }
    }

    #[tokio::test]
    async fn insertion_order_breaks_timestamp_ties() {
        let repo = InMemoryTripRepository::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(repo.create(new_trip(&format!("D{i}"), TripStatus::Scheduled)).await.unwrap().id);
        }
        let all = repo.find_all().await.unwrap();
        let listed: Vec<String> = all.into_iter().map(|t| t.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn paginates_filtered_results() {
        let repo = InMemoryTripRepository::new();
        for i in 0..12 {
            let status = if i % 2 == 0 {
                TripStatus::Delivered
            } else {
                TripStatus::Scheduled
            };
            repo.create(new_trip(&format!("D{i}"), status)).await.unwrap();
        }

        let query = TripQuery {
            page: PageRequest::new(Some(2), Some(5)),
            status: Some(TripStatus::Delivered),
            ..Default::default()
        };
        let page = repo.find_paginated(&query).await.unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn update_soft_delete_and_delete() {
        let repo = InMemoryTripRepository::new();
        let trip = repo.create(new_trip("Juan", TripStatus::Scheduled)).await.unwrap();

        let updated = repo
            .update(
                &trip.id,
                TripPatch {
                    liters: Some(9_999),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.liters, 9_999);
        assert_eq!(updated.driver, "Juan");

        assert!(repo.soft_delete(&trip.id).await.unwrap());
        assert_eq!(
            repo.find_by_id(&trip.id).await.unwrap().unwrap().status,
            TripStatus::Cancelled
        );

        assert!(repo.delete(&trip.id).await.unwrap());
        assert!(!repo.soft_delete(&trip.id).await.unwrap());
        assert!(repo.update(&trip.id, TripPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        let user = NewUser {
            email: "a@b.com".into(),
            password_hash: "h".into(),
            name: "A".into(),
            role: UserRole::Admin,
        };
        let created = repo.create(user.clone()).await.unwrap();
        assert!(matches!(
            repo.create(user).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert_eq!(repo.find_by_id(&created.id).await.unwrap().unwrap().email, "a@b.com");
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
