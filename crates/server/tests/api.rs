//! End-to-end REST tests against an in-process server backed by in-memory
//! SQLite, exercising the full routing/service/persistence stack.

use std::net::SocketAddr;

use axum::Router;
use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use reqwest::StatusCode;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use common::identity::USER_ID_HEADER;
use models::booking::{self, BookingStatus};
use server::routes::{self, AppState};

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
    http: reqwest::Client,
}

async fn start_server() -> TestApp {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");

    let state = AppState { db: db.clone() };
    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind listener");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    TestApp { base_url, db, http: reqwest::Client::new() }
}

impl TestApp {
    async fn create_user(&self, name: &str, email: &str) -> i64 {
        let resp = self
            .http
            .post(format!("{}/users", self.base_url))
            .json(&json!({ "name": name, "email": email }))
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json::<Value>().await.expect("json")["id"].as_i64().expect("id")
    }

    async fn create_item(&self, owner: i64, name: &str) -> i64 {
        let resp = self
            .http
            .post(format!("{}/items", self.base_url))
            .header(USER_ID_HEADER, owner)
            .json(&json!({ "name": name, "description": format!("{name} description"), "available": true }))
            .send()
            .await
            .expect("send");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json::<Value>().await.expect("json")["id"].as_i64().expect("id")
    }
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let app = start_server().await;
    let olga = app.create_user("Olga", "olga@example.com").await;
    let bob = app.create_user("Bob", "bob@example.com").await;
    let eve = app.create_user("Eve", "eve@example.com").await;
    let item = app.create_item(olga, "drill").await;

    let start = (Utc::now() + Duration::hours(1)).to_rfc3339();
    let end = (Utc::now() + Duration::hours(2)).to_rfc3339();
    let resp = app
        .http
        .post(format!("{}/bookings", app.base_url))
        .header(USER_ID_HEADER, bob)
        .json(&json!({ "itemId": item, "start": start, "end": end }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["status"], "WAITING");
    assert_eq!(created["booker"]["id"].as_i64(), Some(bob));
    let booking_id = created["id"].as_i64().unwrap();

    // Only the owner can decide; the booker gets a not-found answer.
    let resp = app
        .http
        .patch(format!("{}/bookings/{}?approved=true", app.base_url, booking_id))
        .header(USER_ID_HEADER, bob)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .http
        .patch(format!("{}/bookings/{}?approved=true", app.base_url, booking_id))
        .header(USER_ID_HEADER, olga)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let approved: Value = resp.json().await.unwrap();
    assert_eq!(approved["status"], "APPROVED");

    // Deciding twice is a bad request.
    let resp = app
        .http
        .patch(format!("{}/bookings/{}?approved=false", app.base_url, booking_id))
        .header(USER_ID_HEADER, olga)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A third party cannot even see the booking.
    let resp = app
        .http
        .get(format!("{}/bookings/{}", app.base_url, booking_id))
        .header(USER_ID_HEADER, eve)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The stay has not completed yet, so commenting is rejected.
    let resp = app
        .http
        .post(format!("{}/items/{}/comment", app.base_url, item))
        .header(USER_ID_HEADER, bob)
        .json(&json!({ "text": "great drill" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Backdate a completed approved booking, then the comment goes through.
    booking::ActiveModel {
        item_id: Set(item),
        booker_id: Set(bob),
        start_date: Set((Utc::now() - Duration::hours(3)).into()),
        end_date: Set((Utc::now() - Duration::hours(2)).into()),
        status: Set(BookingStatus::Approved),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .unwrap();

    let resp = app
        .http
        .post(format!("{}/items/{}/comment", app.base_url, item))
        .header(USER_ID_HEADER, bob)
        .json(&json!({ "text": "great drill" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let comment: Value = resp.json().await.unwrap();
    assert_eq!(comment["authorName"], "Bob");

    // The owner sees booking summaries; the booker sees nulls.
    let resp = app
        .http
        .get(format!("{}/items/{}", app.base_url, item))
        .header(USER_ID_HEADER, olga)
        .send()
        .await
        .unwrap();
    let owner_view: Value = resp.json().await.unwrap();
    assert!(owner_view["lastBooking"].is_object());
    assert_eq!(owner_view["comments"].as_array().map(|c| c.len()), Some(1));

    let resp = app
        .http
        .get(format!("{}/items/{}", app.base_url, item))
        .header(USER_ID_HEADER, bob)
        .send()
        .await
        .unwrap();
    let guest_view: Value = resp.json().await.unwrap();
    assert!(guest_view["lastBooking"].is_null());
    assert!(guest_view["nextBooking"].is_null());
}

#[tokio::test]
async fn request_fanout_over_http() {
    let app = start_server().await;
    let rita = app.create_user("Rita", "rita@example.com").await;
    let olga = app.create_user("Olga", "olga@example.com").await;

    let resp = app
        .http
        .post(format!("{}/requests", app.base_url))
        .header(USER_ID_HEADER, rita)
        .json(&json!({ "description": "need a ladder" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let request: Value = resp.json().await.unwrap();
    let request_id = request["id"].as_i64().unwrap();

    let resp = app
        .http
        .post(format!("{}/items", app.base_url))
        .header(USER_ID_HEADER, olga)
        .json(&json!({
            "name": "ladder",
            "description": "sturdy ladder",
            "available": true,
            "requestId": request_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .http
        .get(format!("{}/requests", app.base_url))
        .header(USER_ID_HEADER, rita)
        .send()
        .await
        .unwrap();
    let own: Value = resp.json().await.unwrap();
    let own = own.as_array().unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["items"].as_array().map(|i| i.len()), Some(1));
    assert_eq!(own[0]["items"][0]["requestId"].as_i64(), Some(request_id));

    // The requestor's own requests do not show up under /requests/all.
    let resp = app
        .http
        .get(format!("{}/requests/all", app.base_url))
        .header(USER_ID_HEADER, rita)
        .send()
        .await
        .unwrap();
    let others: Value = resp.json().await.unwrap();
    assert!(others.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn boundary_errors_over_http() {
    let app = start_server().await;
    let olga = app.create_user("Olga", "olga@example.com").await;

    // Duplicate email conflicts.
    let resp = app
        .http
        .post(format!("{}/users", app.base_url))
        .json(&json!({ "name": "Other", "email": "olga@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Identity header is mandatory on item routes.
    let resp = app
        .http
        .get(format!("{}/items", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown state string is a bad request with the canonical message.
    let resp = app
        .http
        .get(format!("{}/bookings?state=UNSUPPORTED_STATUS", app.base_url))
        .header(USER_ID_HEADER, olga)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unknown state: UNSUPPORTED_STATUS");

    // Unknown item is a 404.
    let resp = app
        .http
        .get(format!("{}/items/999", app.base_url))
        .header(USER_ID_HEADER, olga)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
