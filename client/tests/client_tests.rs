//! Client tests against a mock Fuel Track server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use fuel_track_client::{
    ClientError, CreateTripRequest, FuelTrackClient, FuelType, Notifier, TripListParams,
    TripMutations, TripQueries, TripStatus, UpdateTripRequest,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn trip_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "truck": "ABC123",
        "driver": "Juan Pérez",
        "origin": "Refinería La Plata",
        "destination": "YPF Recoleta",
        "fuel": "Diesel",
        "liters": 15000,
        "departureDate": "2030-03-01T08:00:00.000Z",
        "status": status,
        "createdAt": "2030-01-01T00:00:00.000Z",
        "updatedAt": "2030-01-01T00:00:00.000Z"
    })
}

fn page_json(trips: Vec<Value>, page: u64, total: u64) -> Value {
    json!({
        "data": trips,
        "pagination": {
            "page": page,
            "limit": 10,
            "total": total,
            "totalPages": (total + 9) / 10,
            "hasNext": page * 10 < total,
            "hasPrev": page > 1
        }
    })
}

fn auth_json() -> Value {
    json!({
        "token": "jwt-token",
        "user": {"id": "u1", "email": "admin@trucking.com", "name": "Admin User", "role": "admin"}
    })
}

async fn client_for(server: &MockServer) -> FuelTrackClient {
    FuelTrackClient::new(&server.uri()).unwrap()
}

// =============================================================================
// Auth
// =============================================================================

mod auth {
    use super::*;

    #[tokio::test]
    async fn login_stores_token_for_later_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_partial_json(json!({"email": "admin@trucking.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_json()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/trips/t1"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(trip_json("t1", "Scheduled")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let auth = client.login("admin@trucking.com", "admin123").await.unwrap();
        assert_eq!(auth.user.role, "admin");
        assert!(client.is_authenticated());

        let trip = client.get_trip("t1").await.unwrap();
        assert_eq!(trip.status, TripStatus::Scheduled);
        assert_eq!(trip.fuel, FuelType::Diesel);
    }

    #[tokio::test]
    async fn bad_credentials_surface_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.login("admin@trucking.com", "nope").await.unwrap_err();
        match err {
            ClientError::Unauthorized(message) => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn unauthorized_response_clears_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/trips"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.set_token("expired");
        let err = client.list_trips(&TripListParams::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert!(!client.is_authenticated());
    }
}

// =============================================================================
// Trips
// =============================================================================

mod trips {
    use super::*;

    #[tokio::test]
    async fn list_sends_filters_as_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/trips"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .and(query_param("search", "gasoil"))
            .and(query_param("status", "In Transit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![trip_json("t1", "In Transit")],
                2,
                11,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let page = client
            .list_trips(&TripListParams {
                page: Some(2),
                limit: Some(10),
                search: Some("gasoil".into()),
                status: Some("In Transit".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fuel/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "timestamp": "2030-01-01T00:00:00.000Z",
                "environment": "test"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fuel/api/trips/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(trip_json("a/b", "Scheduled")))
            .expect(1)
            .mount(&server)
            .await;

        let client = FuelTrackClient::new(&format!("{}/fuel/", server.uri())).unwrap();
        assert_eq!(client.health().await.unwrap().status, "ok");
        assert_eq!(client.get_trip("a/b").await.unwrap().id, "a/b");
    }

    #[tokio::test]
    async fn validation_error_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/trips"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"error": "Liters must be between 1 and 30000"}),
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .create_trip(&CreateTripRequest {
                truck: "ABC123".into(),
                driver: "Juan".into(),
                origin: "A".into(),
                destination: "B".into(),
                fuel: FuelType::Diesel,
                liters: 30_001,
                departure_date: Utc.with_ymd_and_hms(2030, 1, 1, 8, 0, 0).unwrap(),
            })
            .await
            .unwrap_err();

        match &err {
            ClientError::Server { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Liters must be between 1 and 30000");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Liters must be between 1 and 30000");
    }

    #[tokio::test]
    async fn rate_limit_reports_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/trips/t1"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "42")
                    .set_body_json(json!({"error": "Too many requests"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_trip("t1").await.unwrap_err();
        assert!(matches!(err, ClientError::RateLimited { retry_after_secs: 42 }));
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/trips/t1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.delete_trip("t1").await.unwrap();
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/trips/t1"))
            .and(body_partial_json(json!({"status": "Delivered"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(trip_json("t1", "Delivered")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let trip = client
            .update_trip(
                "t1",
                &UpdateTripRequest {
                    status: Some(TripStatus::Delivered),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(trip.status, TripStatus::Delivered);
    }
}

// =============================================================================
// Queries and mutations
// =============================================================================

mod queries {
    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<(bool, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, title: &str, _description: &str) {
            self.notices.lock().unwrap().push((true, title.to_string()));
        }

        fn error(&self, title: &str, _description: &str) {
            self.notices.lock().unwrap().push((false, title.to_string()));
        }
    }

    #[tokio::test]
    async fn concurrent_list_queries_share_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/trips"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![trip_json("t1", "Scheduled")], 1, 1))
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let queries = TripQueries::new(Arc::new(client_for(&server).await));
        let params = TripListParams::default();
        let (a, b) = tokio::join!(queries.list(&params), queries.list(&params));
        assert_eq!(a.unwrap(), b.unwrap());

        // served from cache
        queries.list(&params).await.unwrap();
        assert_eq!(queries.cached_entries(), 1);
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/trips"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![trip_json("t1", "Scheduled")], 1, 1)),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/trips/t1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/trips/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Trip not found"})))
            .mount(&server)
            .await;

        let queries = Arc::new(TripQueries::new(Arc::new(client_for(&server).await)));
        let notifier = Arc::new(RecordingNotifier::default());
        let mutations = TripMutations::new(queries.clone(), notifier.clone());
        let params = TripListParams::default();

        queries.list(&params).await.unwrap();
        queries.list(&params).await.unwrap();

        mutations.delete("t1").await.unwrap();
        assert_eq!(queries.cached_entries(), 0);
        queries.list(&params).await.unwrap();

        // a failed mutation leaves the cache alone
        assert!(mutations.delete("missing").await.is_err());
        assert_eq!(queries.cached_entries(), 1);

        let notices = notifier.notices.lock().unwrap().clone();
        assert_eq!(
            notices,
            vec![
                (true, "¡Viaje eliminado exitosamente!".to_string()),
                (false, "Error al eliminar el viaje".to_string()),
            ]
        );
    }
}
