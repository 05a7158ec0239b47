//! HTTP tests against the real router, built on in-memory collaborators.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use flightdeck_core::{FlightId, FlightStatus, SeatCategory};
use flightdeck_server::{AircraftService, AppState, FlightService, build_router};
use flightdeck_testing::fixtures::{FlightBuilder, aircraft, economy, seat};
use flightdeck_testing::{
    InMemoryAircraftRepository, InMemoryFlightRepository, NotificationKind, RecordingPublisher,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    flights: InMemoryFlightRepository,
    aircraft: InMemoryAircraftRepository,
    publisher: RecordingPublisher,
}

fn test_app() -> TestApp {
    let flights = InMemoryFlightRepository::new();
    let aircraft = InMemoryAircraftRepository::new().referenced_by(flights.clone());
    let publisher = RecordingPublisher::new();

    let state = AppState::new(
        FlightService::new(
            Arc::new(flights.clone()),
            Arc::new(aircraft.clone()),
            Arc::new(publisher.clone()),
        ),
        AircraftService::new(Arc::new(aircraft.clone())),
    );

    TestApp {
        router: build_router(state),
        flights,
        aircraft,
        publisher,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            },
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }
}

fn flight_json(id: i64, status: &str, aircraft_id: Option<i64>) -> Value {
    json!({
        "id": id,
        "departure": "2024-05-01T10:00:00",
        "origin": "NYC",
        "destination": "LON",
        "status": status,
        "aircraft_id": aircraft_id,
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_and_readiness_are_ok_without_a_database() {
    let app = test_app();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn responses_carry_a_correlation_id() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-correlation-id"));
}

// ============================================================================
// Aircraft
// ============================================================================

#[tokio::test]
async fn empty_fleet_lists_as_not_found() {
    let app = test_app();

    let (status, body) = app.get("/api/aircraft").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn aircraft_crud_round_trip() {
    let app = test_app();
    let payload = json!({
        "id": 1,
        "model": "A320",
        "seats": [
            {"id": 1, "category": "Economy", "is_registered": false, "is_sold": false},
            {"id": 2, "category": "Business", "is_registered": false, "is_sold": true},
        ],
    });

    let (status, body) = app.send(Method::POST, "/api/aircraft", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, payload);

    let (status, body) = app.get("/api/aircraft/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seats"].as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/aircraft").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let updated = json!({"id": 1, "model": "A321", "seats": []});
    let (status, body) = app.send(Method::PUT, "/api/aircraft", Some(updated)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "A321");

    let (status, body) = app.send(Method::DELETE, "/api/aircraft/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "A321");

    let (status, _) = app.get("/api/aircraft/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updating_or_deleting_unknown_aircraft_is_not_found() {
    let app = test_app();

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/aircraft",
            Some(json!({"id": 9, "model": "B737", "seats": []})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, "/api/aircraft/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_aircraft_in_use_is_a_conflict() {
    let app = test_app();
    app.aircraft.seed([aircraft(3, vec![economy(1)])]);
    app.flights.seed([FlightBuilder::new(1).aircraft(3).build()]);

    let (status, body) = app.send(Method::DELETE, "/api/aircraft/3", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = test_app();

    let (status, body) = app
        .send(Method::POST, "/api/aircraft", Some(json!({"model": "A320"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// ============================================================================
// Flights
// ============================================================================

#[tokio::test]
async fn flight_create_get_delete() {
    let app = test_app();

    let (status, body) = app
        .send(Method::POST, "/api/flights", Some(flight_json(1, "Scheduled", None)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Scheduled");

    let (status, body) = app.get("/api/flights/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "NYC");

    let (status, _) = app.send(Method::DELETE, "/api/flights/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get("/api/flights/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Flight with id 1 not found");
    assert!(app.publisher.notifications().is_empty());
}

#[tokio::test]
async fn flight_update_notifies_and_echoes_the_record() {
    let app = test_app();
    app.aircraft.seed([aircraft(11, Vec::new())]);
    app.flights.seed([FlightBuilder::new(1).aircraft(10).build()]);

    let proposed = flight_json(1, "Delayed", Some(11));
    let (status, body) = app
        .send(Method::PUT, "/api/flights", Some(proposed.clone()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, proposed);
    assert_eq!(
        app.publisher.kinds(),
        vec![NotificationKind::StatusChanged, NotificationKind::AircraftReassigned]
    );
    assert_eq!(
        app.flights.stored(FlightId::new(1)).unwrap().status,
        FlightStatus::Delayed
    );
}

#[tokio::test]
async fn reassigning_to_an_unknown_aircraft_is_not_found() {
    let app = test_app();
    app.flights.seed([FlightBuilder::new(1).aircraft(10).build()]);

    let (status, body) = app
        .send(Method::PUT, "/api/flights", Some(flight_json(1, "Delayed", Some(404))))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Aircraft with id 404 not found");
    assert!(app.publisher.notifications().is_empty());
    assert_eq!(
        app.flights.stored(FlightId::new(1)).unwrap().status,
        FlightStatus::Scheduled
    );
}

#[tokio::test]
async fn updating_an_unknown_flight_is_not_found() {
    let app = test_app();

    let (status, _) = app
        .send(Method::PUT, "/api/flights", Some(flight_json(5, "Delayed", None)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.publisher.notifications().is_empty());
    assert!(app.flights.is_empty());
}

#[tokio::test]
async fn undeliverable_notification_is_unavailable() {
    let app = test_app();
    app.flights.seed([FlightBuilder::new(1).build()]);
    app.publisher.set_failing(true);

    let (status, body) = app
        .send(Method::PUT, "/api/flights", Some(flight_json(1, "Cancelled", None)))
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(
        app.flights.stored(FlightId::new(1)).unwrap().status,
        FlightStatus::Scheduled
    );
}

#[tokio::test]
async fn search_by_route_and_date() {
    let app = test_app();
    app.flights.seed([
        FlightBuilder::new(1)
            .route("NYC", "LON")
            .departing("2024-05-01T10:00")
            .build(),
        FlightBuilder::new(2)
            .route("NYC", "LON")
            .departing("2024-05-02T10:00")
            .build(),
    ]);

    let (status, body) = app
        .get("/api/flights/search?from=NYC&to=LON&date=2024-05-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], 1);

    let (status, body) = app
        .get("/api/flights/search?from=NYC&to=LON&date=2024-06-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn search_rejects_bad_or_missing_parameters() {
    let app = test_app();

    let (status, _) = app
        .get("/api/flights/search?from=NYC&to=LON&date=01-05-2024")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.flights.seed([FlightBuilder::new(1).route("NYC", "LON").departing("2024-05-01T10:00").build()]);
    let (status, _) = app
        .get("/api/flights/search?from=NYC&to=LON&date=2024-5-1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/flights/search?from=NYC").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn departures_at_an_exact_time() {
    let app = test_app();
    app.flights.seed([
        FlightBuilder::new(1).departing("2024-05-01T10:00").build(),
        FlightBuilder::new(2).departing("2024-05-01T11:00").build(),
    ]);

    let (status, body) = app.get("/api/flights/departures?at=2024-05-01T11:00").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([FlightBuilder::new(2).departing("2024-05-01T11:00").build()]));
}

// ============================================================================
// Seats
// ============================================================================

#[tokio::test]
async fn free_seat_endpoints() {
    let app = test_app();
    app.aircraft.seed([aircraft(
        10,
        vec![
            economy(1),
            seat(2, SeatCategory::Business, true, false),
            seat(3, SeatCategory::Economy, false, true),
        ],
    )]);
    app.flights.seed([FlightBuilder::new(1).aircraft(10).build()]);

    let (status, body) = app.get("/api/flights/1/seats/free").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([economy(1)]));

    let (_, body) = app.get("/api/flights/1/seats/free/economy").await;
    assert_eq!(body, json!([economy(1)]));

    let (status, body) = app.get("/api/flights/1/seats/free/business").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.get("/api/flights/2/seats/free").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
