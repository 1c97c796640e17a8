//! Trip repository interface

use async_trait::async_trait;

use super::{NewTrip, Trip, TripPatch, TripQuery};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Every trip, newest first, unfiltered.
    async fn find_all(&self) -> DomainResult<Vec<Trip>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Trip>>;
    /// One page of trips matching `query` plus the total match count.
    async fn find_paginated(&self, query: &TripQuery) -> DomainResult<PaginatedResult<Trip>>;
    async fn count(&self) -> DomainResult<u64>;

    /// Persist a new trip; the store assigns id and timestamps.
    async fn create(&self, trip: NewTrip) -> DomainResult<Trip>;
    /// Write only the `Some` fields of `patch`. `None` when no such trip.
    async fn update(&self, id: &str, patch: TripPatch) -> DomainResult<Option<Trip>>;
    /// Mark the trip Cancelled. `false` when no such trip.
    async fn soft_delete(&self, id: &str) -> DomainResult<bool>;
    /// Remove the row outright. Not routed over HTTP.
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
