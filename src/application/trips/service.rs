//! Trip lifecycle service
//!
//! Validation, status rules and response mapping for trips. HTTP handlers
//! stay thin and delegate here.

use std::sync::Arc;

use tracing::{debug, info};

use super::dto::{
    parse_departure_date, CreateTripCommand, PaginatedTrips, TripResponse, UpdateTripCommand,
};
use crate::domain::{
    validate_trip, DomainError, DomainResult, NewTrip, TripPatch, TripQuery, TripRepository,
    TripStatus,
};
use crate::shared::PaginationMeta;

pub struct TripService {
    repo: Arc<dyn TripRepository>,
    enforce_status_transitions: bool,
}

impl TripService {
    pub fn new(repo: Arc<dyn TripRepository>) -> Self {
        Self {
            repo,
            enforce_status_transitions: false,
        }
    }

    /// Reject status changes outside the Scheduled → In Transit → Delivered
    /// flow (Cancelled reachable from any non-terminal state).
    pub fn with_status_transitions(mut self, enforce: bool) -> Self {
        self.enforce_status_transitions = enforce;
        self
    }

    pub async fn create(&self, cmd: CreateTripCommand) -> DomainResult<TripResponse> {
        let departure_date = parse_departure_date(&cmd.departure_date)?;

        let new_trip = NewTrip {
            truck: cmd.truck,
            driver: cmd.driver,
            origin: cmd.origin,
            destination: cmd.destination,
            fuel: cmd.fuel,
            liters: cmd.liters,
            departure_date,
            status: TripStatus::Scheduled,
        };
        validate_trip(&TripPatch::from(&new_trip))?;

        let trip = self.repo.create(new_trip).await?;
        info!(trip_id = %trip.id, truck = %trip.truck, liters = trip.liters, "Trip created");
        Ok(trip.into())
    }

    pub async fn list(&self, query: TripQuery) -> DomainResult<PaginatedTrips> {
        let page = self.repo.find_paginated(&query).await?;
        debug!(total = page.total, page = query.page.page, "Trips listed");

        Ok(PaginatedTrips {
            pagination: PaginationMeta::new(query.page, page.total),
            data: page.items.into_iter().map(TripResponse::from).collect(),
        })
    }

    pub async fn get(&self, id: &str) -> DomainResult<Option<TripResponse>> {
        Ok(self.repo.find_by_id(id).await?.map(TripResponse::from))
    }

    /// Apply a partial update. `Ok(None)` when the trip does not exist.
    pub async fn update(
        &self,
        id: &str,
        cmd: UpdateTripCommand,
    ) -> DomainResult<Option<TripResponse>> {
        let departure_date = cmd
            .departure_date
            .as_deref()
            .map(parse_departure_date)
            .transpose()?;

        let patch = TripPatch {
            truck: cmd.truck,
            driver: cmd.driver,
            origin: cmd.origin,
            destination: cmd.destination,
            fuel: cmd.fuel,
            liters: cmd.liters,
            departure_date,
            status: cmd.status,
        };

        if patch.touches_validated_fields() {
            validate_trip(&patch)?;
        }

        if let (true, Some(next)) = (self.enforce_status_transitions, patch.status) {
            let Some(current) = self.repo.find_by_id(id).await? else {
                return Ok(None);
            };
            if !current.status.can_transition_to(next) {
                return Err(DomainError::validation(format!(
                    "Cannot change status from {} to {}",
                    current.status, next
                )));
            }
        }

        let updated = self.repo.update(id, patch).await?;
        if let Some(trip) = &updated {
            info!(trip_id = %trip.id, status = %trip.status, "Trip updated");
        }
        Ok(updated.map(TripResponse::from))
    }

    /// Cancel the trip instead of removing it. `false` when not found.
    pub async fn soft_delete(&self, id: &str) -> DomainResult<bool> {
        let found = self.repo.soft_delete(id).await?;
        if found {
            info!(trip_id = %id, "Trip cancelled");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::application::trips::dto::to_iso;
    use crate::domain::FuelType;
    use crate::infrastructure::InMemoryTripRepository;
    use crate::shared::PageRequest;

    fn service() -> TripService {
        TripService::new(Arc::new(InMemoryTripRepository::new()))
    }

    fn create_cmd(liters: i32, departure: chrono::DateTime<Utc>) -> CreateTripCommand {
        CreateTripCommand {
            truck: "ABC123".into(),
            driver: "Juan Pérez".into(),
            origin: "Refinería La Plata".into(),
            destination: "YPF Recoleta".into(),
            fuel: FuelType::Diesel,
            liters,
            departure_date: to_iso(departure),
        }
    }

    fn tomorrow() -> chrono::DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn create_forces_scheduled_and_stamps_times() {
        let svc = service();
        let trip = svc.create(create_cmd(15_000, tomorrow())).await.unwrap();

        assert_eq!(trip.status, TripStatus::Scheduled);
        assert!(trip.created_at.ends_with('Z'));
        assert!(!trip.id.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_bad_liters_and_past_dates() {
        let svc = service();

        let err = svc.create(create_cmd(30_001, tomorrow())).await.unwrap_err();
        assert_eq!(err.to_string(), "Liters cannot exceed 30000");

        let err = svc.create(create_cmd(0, tomorrow())).await.unwrap_err();
        assert_eq!(err.to_string(), "Liters must be greater than 0");

        let err = svc
            .create(create_cmd(100, Utc::now() - Duration::days(1)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Departure date cannot be in the past");
    }

    #[tokio::test]
    async fn list_computes_pagination() {
        let svc = service();
        for _ in 0..25 {
            svc.create(create_cmd(1_000, tomorrow())).await.unwrap();
        }

        let page = svc
            .list(TripQuery {
                page: PageRequest::new(Some(3), Some(10)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[tokio::test]
    async fn status_only_update_skips_validation() {
        let svc = service();
        let trip = svc.create(create_cmd(15_000, tomorrow())).await.unwrap();

        let updated = svc
            .update(
                &trip.id,
                UpdateTripCommand {
                    status: Some(TripStatus::InTransit),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TripStatus::InTransit);
        assert_eq!(updated.liters, 15_000);
    }

    #[tokio::test]
    async fn update_validates_present_fields() {
        let svc = service();
        let trip = svc.create(create_cmd(15_000, tomorrow())).await.unwrap();

        let err = svc
            .update(
                &trip.id,
                UpdateTripCommand {
                    liters: Some(40_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_missing_trip_is_none() {
        let svc = service();
        let result = svc
            .update("nope", UpdateTripCommand::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn strict_mode_rejects_backwards_transition() {
        let svc = service().with_status_transitions(true);
        let trip = svc.create(create_cmd(15_000, tomorrow())).await.unwrap();

        for status in [TripStatus::InTransit, TripStatus::Delivered] {
            svc.update(
                &trip.id,
                UpdateTripCommand {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let err = svc
            .update(
                &trip.id,
                UpdateTripCommand {
                    status: Some(TripStatus::Scheduled),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot change status from Delivered to Scheduled");
    }

    #[tokio::test]
    async fn soft_delete_cancels() {
        let svc = service();
        let trip = svc.create(create_cmd(15_000, tomorrow())).await.unwrap();

        assert!(svc.soft_delete(&trip.id).await.unwrap());
        let fetched = svc.get(&trip.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TripStatus::Cancelled);
        assert!(!svc.soft_delete("missing").await.unwrap());
    }
}
