//! Trip mutations with cache invalidation and user notices.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::query::{QueryKey, TripQueries};
use crate::types::{CreateTripRequest, Trip, UpdateTripRequest};

/// Receives the success/error notices raised by mutations (toasts in a UI).
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, description: &str);
    fn error(&self, title: &str, description: &str);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, title: &str, description: &str) {
        info!(%title, %description, "Notice");
    }

    fn error(&self, title: &str, description: &str) {
        warn!(%title, %description, "Error notice");
    }
}

/// Create, update and delete trips. Every success invalidates the `trips`
/// queries; an update also drops the trip's detail entry.
pub struct TripMutations {
    queries: Arc<TripQueries>,
    notifier: Arc<dyn Notifier>,
}

impl TripMutations {
    pub fn new(queries: Arc<TripQueries>, notifier: Arc<dyn Notifier>) -> Self {
        Self { queries, notifier }
    }

    pub async fn create(&self, body: &CreateTripRequest) -> Result<Trip> {
        match self.queries.client().create_trip(body).await {
            Ok(trip) => {
                self.queries.invalidate(&QueryKey::trips());
                self.notifier.success(
                    "¡Viaje creado exitosamente!",
                    &format!("Conductor: {} | Camión: {}", trip.driver, trip.truck),
                );
                Ok(trip)
            }
            Err(e) => {
                self.notifier
                    .error("Error al crear el viaje", &e.user_message());
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &str, body: &UpdateTripRequest) -> Result<Trip> {
        match self.queries.client().update_trip(id, body).await {
            Ok(trip) => {
                self.queries.invalidate(&QueryKey::trips());
                self.queries.invalidate(&QueryKey::trip_detail(&trip.id));
                self.notifier.success(
                    "¡Viaje actualizado exitosamente!",
                    &format!("{} - {}", trip.driver, trip.status),
                );
                Ok(trip)
            }
            Err(e) => {
                self.notifier
                    .error("Error al actualizar el viaje", &e.user_message());
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        match self.queries.client().delete_trip(id).await {
            Ok(()) => {
                self.queries.invalidate(&QueryKey::trips());
                self.notifier.success(
                    "¡Viaje eliminado exitosamente!",
                    "El viaje ha sido cancelado correctamente",
                );
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error("Error al eliminar el viaje", &e.user_message());
                Err(e)
            }
        }
    }
}
