use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use sliv_events_server::config::Config;
use sliv_events_server::routes::create_routes;
use sliv_events_server::state::AppState;
use sliv_events_server::store::{EventStore, MemoryEventStore};

const GALA: &str = "Title=Gala&StartTime=2024-06-01&StartTimeTime=18%3A00\
    &EndTime=2024-06-01&EndTimeTime=23%3A00&Location=Main+hall&GuestCapacity=150&Status=Confirmed";
const PICNIC: &str = "Title=Picnic&StartTime=2024-05-20&IsAllDay=true&EndTime=2024-05-21\
    &Location=Park&GuestCapacity=30&Status=Pending";

fn test_config() -> Config {
    Config {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_connections: 1,
        allowed_origins: "http://localhost:3001".to_string(),
        is_production: false,
    }
}

fn app() -> (Router, Arc<MemoryEventStore>) {
    let store = Arc::new(MemoryEventStore::new());
    let router = create_routes(AppState::new(store.clone()), &test_config());
    (router, store)
}

async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let (app, _) = app();

    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn calendar_page_and_script_are_served() {
    let (app, _) = app();

    let page = send(&app, Method::GET, "/Events", None).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("id=\"calendar\""));

    let script = send(&app, Method::GET, "/static/calendar.js", None).await;
    assert_eq!(script.status(), StatusCode::OK);
    assert!(body_text(script).await.contains("FullCalendar.Calendar"));
}

#[tokio::test]
async fn list_page_wires_delete_buttons() {
    let (app, store) = app();
    send(&app, Method::POST, "/Events/Create", Some(GALA)).await;
    let id = store.all().await.unwrap()[0].id;

    let page = body_text(send(&app, Method::GET, "/Events/List", None).await).await;
    assert!(page.contains(&format!("class=\"delete-event\" data-id=\"{id}\"")));
    assert!(page.contains("<script src=\"/static/list.js\"></script>"));

    let script = send(&app, Method::GET, "/static/list.js", None).await;
    assert_eq!(script.status(), StatusCode::OK);
    assert!(script.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/javascript"));
    assert!(body_text(script).await.contains("'/Events/Delete/'"));
}

#[tokio::test]
async fn create_redirects_and_feeds_the_calendar() {
    let (app, store) = app();

    let response = send(&app, Method::POST, "/Events/Create", Some(GALA)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/Events");

    let response = send(&app, Method::POST, "/Events/Create", Some(PICNIC)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.all().await.unwrap().len(), 2);

    let feed = body_json(send(&app, Method::GET, "/Events/GetEvents", None).await).await;
    let items = feed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Gala");
    assert_eq!(items[0]["start"], "2024-06-01T18:00:00.000000000Z");
    assert_eq!(items[0]["end"], "2024-06-01T23:00:00.000000000Z");
    assert_eq!(items[0]["extendedProps"]["guestCapacity"], 150);
    assert_eq!(items[1]["allDay"], true);
    assert_eq!(items[1]["end"], Value::Null);

    let filtered = body_json(
        send(&app, Method::GET, "/Events/GetEvents?status=Pending", None).await,
    )
    .await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "Picnic");
}

#[tokio::test]
async fn invalid_create_rerenders_form_with_errors() {
    let (app, store) = app();
    let form = "Title=Gala&StartTime=2024-06-01&StartTimeTime=18%3A00\
        &Location=Ballroom&GuestCapacity=200&Status=Pending";

    let response = send(&app, Method::POST, "/Events/Create", Some(form)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("data-code=\"end_time_required\""));
    assert!(html.contains("value=\"Ballroom\""));
    assert!(html.contains("value=\"18:00\""));
    assert!(store.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_form_is_prefilled_from_start() {
    let (app, _) = app();

    let response = send(&app, Method::GET, "/Events/Create?start=2024-07-04", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("name=\"StartTime\" value=\"2024-07-04\""));
}

#[tokio::test]
async fn edit_flow() {
    let (app, store) = app();
    send(&app, Method::POST, "/Events/Create", Some(GALA)).await;
    let id = store.all().await.unwrap()[0].id;

    let form_page = send(&app, Method::GET, &format!("/Events/Edit/{id}"), None).await;
    assert_eq!(form_page.status(), StatusCode::OK);
    assert!(body_text(form_page)
        .await
        .contains("name=\"RowVersion\" value=\"1\""));

    let edit = format!("Id={id}&RowVersion=1&{}", GALA.replace("Gala", "Gala+Night"));
    let response = send(&app, Method::POST, &format!("/Events/Edit/{id}"), Some(edit.as_str())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let event = store.get(id).await.unwrap();
    assert_eq!(event.title, "Gala Night");
    assert_eq!(event.row_version, 2);

    // Same form again: the row version is stale now.
    let response = send(&app, Method::POST, &format!("/Events/Edit/{id}"), Some(edit.as_str())).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "CONCURRENCY_CONFLICT");
}

#[tokio::test]
async fn edit_with_mismatched_id_is_not_found() {
    let (app, store) = app();
    send(&app, Method::POST, "/Events/Create", Some(GALA)).await;
    let id = store.all().await.unwrap()[0].id;

    let edit = format!("Id={}&{}", id + 1, GALA.replace("Gala", "Changed"));
    let response = send(&app, Method::POST, &format!("/Events/Edit/{id}"), Some(edit.as_str())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.get(id).await.unwrap().title, "Gala");
}

#[tokio::test]
async fn missing_events_are_not_found() {
    let (app, _) = app();

    let response = send(&app, Method::GET, "/Events/Edit/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::POST, "/Events/Delete/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() {
    let (app, _) = app();

    let response = send(&app, Method::GET, "/Events/Edit/abc", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");

    let response = send(&app, Method::POST, "/Events/Edit/abc", Some(GALA)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::POST, "/Events/Delete/abc", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn edit_form_round_trips_seconds() {
    let (app, store) = app();
    let form = GALA
        .replace("StartTimeTime=18%3A00", "StartTimeTime=18%3A00%3A30")
        .replace("EndTimeTime=23%3A00", "EndTimeTime=18%3A00%3A45");
    let response = send(&app, Method::POST, "/Events/Create", Some(form.as_str())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = store.all().await.unwrap().remove(0);

    let page = body_text(send(&app, Method::GET, &format!("/Events/Edit/{}", stored.id), None).await).await;
    assert!(page.contains("name=\"StartTimeTime\" value=\"18:00:30\""));
    assert!(page.contains("name=\"EndTimeTime\" value=\"18:00:45\""));

    let edit = format!(
        "Id={}&RowVersion=1&{}",
        stored.id,
        form.replace("Gala", "Toast")
    );
    let response = send(&app, Method::POST, &format!("/Events/Edit/{}", stored.id), Some(edit.as_str())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let event = store.get(stored.id).await.unwrap();
    assert_eq!(event.title, "Toast");
    assert_eq!(event.end_time, stored.end_time);
}

#[tokio::test]
async fn delete_removes_event() {
    let (app, store) = app();
    send(&app, Method::POST, "/Events/Create", Some(GALA)).await;
    let id = store.all().await.unwrap()[0].id;

    let response = send(&app, Method::POST, &format!("/Events/Delete/{id}"), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
    assert!(!store.exists(id).await.unwrap());
}

#[tokio::test]
async fn list_is_sorted_by_start() {
    let (app, _) = app();
    send(&app, Method::POST, "/Events/Create", Some(GALA)).await;
    send(&app, Method::POST, "/Events/Create", Some(PICNIC)).await;

    let asc = body_text(send(&app, Method::GET, "/Events/List?sortOrder=date", None).await).await;
    assert!(asc.find("Picnic").unwrap() < asc.find("Gala").unwrap());

    let desc = body_text(send(&app, Method::GET, "/Events/List?sortOrder=date_desc", None).await).await;
    assert!(desc.find("Gala").unwrap() < desc.find("Picnic").unwrap());

    let default = body_text(send(&app, Method::GET, "/Events/List", None).await).await;
    assert_eq!(default, asc);
}
