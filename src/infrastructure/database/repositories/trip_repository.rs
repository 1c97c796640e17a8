//! SeaORM implementation of TripRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::domain::{
    fuel_synonyms, DomainError, DomainResult, FuelType, NewTrip, Trip, TripPatch, TripQuery,
    TripRepository, TripStatus,
};
use crate::infrastructure::database::entities::trip;
use crate::shared::errors::InfraError;
use crate::shared::PaginatedResult;

pub struct SeaOrmTripRepository {
    db: DatabaseConnection,
}

impl SeaOrmTripRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn fuel_to_entity(fuel: FuelType) -> trip::FuelType {
    match fuel {
        FuelType::Diesel => trip::FuelType::Diesel,
        FuelType::SuperGasoline => trip::FuelType::SuperGasoline,
        FuelType::PremiumGasoline => trip::FuelType::PremiumGasoline,
        FuelType::Cng => trip::FuelType::Cng,
    }
}

fn fuel_to_domain(fuel: trip::FuelType) -> FuelType {
    match fuel {
        trip::FuelType::Diesel => FuelType::Diesel,
        trip::FuelType::SuperGasoline => FuelType::SuperGasoline,
        trip::FuelType::PremiumGasoline => FuelType::PremiumGasoline,
        trip::FuelType::Cng => FuelType::Cng,
    }
}

fn status_to_entity(status: TripStatus) -> trip::TripStatus {
    match status {
        TripStatus::Scheduled => trip::TripStatus::Scheduled,
        TripStatus::InTransit => trip::TripStatus::InTransit,
        TripStatus::Delivered => trip::TripStatus::Delivered,
        TripStatus::Cancelled => trip::TripStatus::Cancelled,
    }
}

fn status_to_domain(status: trip::TripStatus) -> TripStatus {
    match status {
        trip::TripStatus::Scheduled => TripStatus::Scheduled,
        trip::TripStatus::InTransit => TripStatus::InTransit,
        trip::TripStatus::Delivered => TripStatus::Delivered,
        trip::TripStatus::Cancelled => TripStatus::Cancelled,
    }
}

fn model_to_domain(m: trip::Model) -> Trip {
    Trip {
        id: m.id,
        truck: m.truck,
        driver: m.driver,
        origin: m.origin,
        destination: m.destination,
        fuel: fuel_to_domain(m.fuel),
        liters: m.liters,
        departure_date: m.departure_date,
        status: status_to_domain(m.status),
        created_at: Some(m.created_at),
        updated_at: Some(m.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::from(e).into()
}

/// Escape LIKE wildcards so user input matches literally (escape char `\`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(col) LIKE '%term%'`
fn contains_ci(col: trip::Column, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
}

fn build_condition(query: &TripQuery) -> Condition {
    let mut cond = Condition::all();

    if let Some(status) = query.status {
        cond = cond.add(trip::Column::Status.eq(status_to_entity(status)));
    }
    if let Some(fuel) = query.fuel {
        cond = cond.add(trip::Column::Fuel.eq(fuel_to_entity(fuel)));
    }
    if let Some(driver) = query.driver_term() {
        cond = cond.add(contains_ci(trip::Column::Driver, driver));
    }
    if let Some(from) = query.departure_from {
        cond = cond.add(trip::Column::DepartureDate.gte(from));
    }
    if let Some(to) = query.departure_to {
        cond = cond.add(trip::Column::DepartureDate.lte(to));
    }

    if let Some(term) = query.search_term() {
        let mut any = Condition::any()
            .add(contains_ci(trip::Column::Driver, term))
            .add(contains_ci(trip::Column::Truck, term))
            .add(contains_ci(trip::Column::Origin, term))
            .add(contains_ci(trip::Column::Destination, term));

        let fuels: Vec<trip::FuelType> = fuel_synonyms(term)
            .into_iter()
            .map(fuel_to_entity)
            .collect();
        if !fuels.is_empty() {
            any = any.add(trip::Column::Fuel.is_in(fuels));
        }
        cond = cond.add(any);
    }

    cond
}

// ── TripRepository impl ─────────────────────────────────────────

#[async_trait]
impl TripRepository for SeaOrmTripRepository {
    async fn find_all(&self) -> DomainResult<Vec<Trip>> {
        let models = trip::Entity::find()
            .order_by_desc(trip::Column::CreatedAt)
            .order_by_desc(trip::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Trip>> {
        let model = trip::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_paginated(&self, query: &TripQuery) -> DomainResult<PaginatedResult<Trip>> {
        let select = trip::Entity::find()
            .filter(build_condition(query))
            .order_by_desc(trip::Column::CreatedAt)
            .order_by_desc(trip::Column::Id);

        let page_fetch = select
            .clone()
            .offset(query.page.skip())
            .limit(query.page.limit)
            .all(&self.db);

        let (total, models) =
            tokio::try_join!(select.count(&self.db), page_fetch).map_err(db_err)?;

        debug!(total, returned = models.len(), "Trip page fetched");
        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
        ))
    }

    async fn count(&self) -> DomainResult<u64> {
        trip::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn create(&self, new_trip: NewTrip) -> DomainResult<Trip> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        debug!(trip_id = %id, truck = %new_trip.truck, "Inserting trip");

        let model = trip::ActiveModel {
            id: Set(id),
            truck: Set(new_trip.truck),
            driver: Set(new_trip.driver),
            origin: Set(new_trip.origin),
            destination: Set(new_trip.destination),
            fuel: Set(fuel_to_entity(new_trip.fuel)),
            liters: Set(new_trip.liters),
            departure_date: Set(new_trip.departure_date),
            status: Set(status_to_entity(new_trip.status)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn update(&self, id: &str, patch: TripPatch) -> DomainResult<Option<Trip>> {
        let existing = trip::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: trip::ActiveModel = existing.into();
        if let Some(truck) = patch.truck {
            model.truck = Set(truck);
        }
        if let Some(driver) = patch.driver {
            model.driver = Set(driver);
        }
        if let Some(origin) = patch.origin {
            model.origin = Set(origin);
        }
        if let Some(destination) = patch.destination {
            model.destination = Set(destination);
        }
        if let Some(fuel) = patch.fuel {
            model.fuel = Set(fuel_to_entity(fuel));
        }
        if let Some(liters) = patch.liters {
            model.liters = Set(liters);
        }
        if let Some(departure_date) = patch.departure_date {
            model.departure_date = Set(departure_date);
        }
        if let Some(status) = patch.status {
            model.status = Set(status_to_entity(status));
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(&self.db).await.map_err(db_err)?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn soft_delete(&self, id: &str) -> DomainResult<bool> {
        let result = trip::Entity::update_many()
            .col_expr(
                trip::Column::Status,
                Expr::value(trip::TripStatus::Cancelled),
            )
            .col_expr(trip::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(trip::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = trip::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::infrastructure::database::test_connection;
    use crate::shared::PageRequest;

    fn new_trip(driver: &str, truck: &str, fuel: FuelType, status: TripStatus) -> NewTrip {
        NewTrip {
            truck: truck.into(),
            driver: driver.into(),
            origin: "Refinería La Plata".into(),
            destination: "YPF Palermo".into(),
            fuel,
            liters: 15_000,
            departure_date: Utc::now() + Duration::days(2),
            status,
        }
    }

    async fn repo() -> SeaOrmTripRepository {
        SeaOrmTripRepository::new(test_connection().await)
    }

    #[tokio::test]
    async fn create_then_find_by_id() {
        let repo = repo().await;
        let created = repo
            .create(new_trip("Juan Pérez", "ABC123", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(created.created_at.is_some());

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.driver, "Juan Pérez");
        assert_eq!(found.fuel, FuelType::Diesel);
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_uses_fuel_synonyms() {
        let repo = repo().await;
        repo.create(new_trip("A", "T1", FuelType::SuperGasoline, TripStatus::Scheduled))
            .await
            .unwrap();
        repo.create(new_trip("B", "T2", FuelType::PremiumGasoline, TripStatus::Scheduled))
            .await
            .unwrap();
        repo.create(new_trip("C", "T3", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let query = TripQuery {
            search: Some("nafta".into()),
            ..Default::default()
        };
        let page = repo.find_paginated(&query).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|t| t.fuel != FuelType::Diesel));
    }

    #[tokio::test]
    async fn search_matches_text_case_insensitively() {
        let repo = repo().await;
        repo.create(new_trip("Carlos Rodríguez", "XYZ789", FuelType::Cng, TripStatus::Scheduled))
            .await
            .unwrap();
        repo.create(new_trip("Ana", "DEF456", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let query = TripQuery {
            search: Some("xyz".into()),
            ..Default::default()
        };
        let page = repo.find_paginated(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].truck, "XYZ789");
    }

    #[tokio::test]
    async fn like_wildcards_are_literal() {
        let repo = repo().await;
        repo.create(new_trip("Ana", "DEF456", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let query = TripQuery {
            search: Some("%".into()),
            ..Default::default()
        };
        assert_eq!(repo.find_paginated(&query).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn status_filter_with_pagination() {
        let repo = repo().await;
        for i in 0..8 {
            repo.create(new_trip(&format!("D{i}"), "T", FuelType::Diesel, TripStatus::Delivered))
                .await
                .unwrap();
        }
        repo.create(new_trip("X", "T", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let query = TripQuery {
            page: PageRequest::new(Some(2), Some(5)),
            status: Some(TripStatus::Delivered),
            ..Default::default()
        };
        let page = repo.find_paginated(&query).await.unwrap();
        assert_eq!(page.total, 8);
        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|t| t.status == TripStatus::Delivered));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let repo = repo().await;
        repo.create(new_trip("X", "T", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let query = TripQuery {
            page: PageRequest::new(Some(u64::MAX), Some(100)),
            ..Default::default()
        };
        let page = repo.find_paginated(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn newest_first() {
        let repo = repo().await;
        let first = repo
            .create(new_trip("First", "T", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo
            .create(new_trip("Second", "T", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let repo = repo().await;
        let created = repo
            .create(new_trip("Juan", "ABC123", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        let patch = TripPatch {
            status: Some(TripStatus::InTransit),
            ..Default::default()
        };
        let updated = repo.update(&created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.status, TripStatus::InTransit);
        assert_eq!(updated.driver, "Juan");
        assert_eq!(updated.liters, 15_000);

        assert!(repo
            .update("missing", TripPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn soft_delete_cancels_and_delete_removes() {
        let repo = repo().await;
        let created = repo
            .create(new_trip("Juan", "ABC123", FuelType::Diesel, TripStatus::Scheduled))
            .await
            .unwrap();

        assert!(repo.soft_delete(&created.id).await.unwrap());
        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.status, TripStatus::Cancelled);
        assert!(!repo.soft_delete("missing").await.unwrap());

        assert!(repo.delete(&created.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(!repo.delete(&created.id).await.unwrap());
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
