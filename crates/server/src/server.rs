use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{birthdays, contributions, gifts, users};
use engine::{Engine, users as user_entity};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user_entity::Model> = user_entity::Entity::find()
        .filter(user_entity::Column::Email.eq(auth_header.username()))
        .filter(user_entity::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub(crate) fn router(state: ServerState) -> Router {
    Router::new()
        .route("/birthdays", get(birthdays::list_upcoming))
        .route("/birthdays/unorganized", get(birthdays::list_unorganized))
        .route("/birthdays/organized/me", get(birthdays::list_organized_by_me))
        .route("/birthdays/mine", get(birthdays::list_mine))
        .route("/birthdays/generate", post(birthdays::generate))
        .route(
            "/birthdays/{id}",
            get(birthdays::detail).patch(birthdays::update),
        )
        .route("/birthdays/{id}/organizer", post(birthdays::claim_organizer))
        .route("/birthdays/{id}/split", post(birthdays::split))
        .route("/birthdays/{id}/summary", get(birthdays::summary))
        .route("/contributions", post(contributions::enroll))
        .route("/contributions/my", get(contributions::list_my))
        .route(
            "/contributions/{id}",
            axum::routing::patch(contributions::update).delete(contributions::withdraw),
        )
        .route("/wishlist", get(gifts::list_my).post(gifts::add))
        .route("/wishlist/user/{id}", get(gifts::list_for_user))
        .route(
            "/wishlist/{id}",
            get(gifts::detail)
                .patch(gifts::update)
                .delete(gifts::remove),
        )
        .route("/users/me", get(users::me).patch(users::update_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        // Registration happens before credentials exist.
        .route("/users", post(users::register))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use base64::Engine as _;
    use chrono::{Datelike, Days, NaiveDate, Utc};
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const PASSWORD: &str = "hunter2";

    async fn test_router() -> Router {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    /// A birth date whose next anniversary falls inside the generator window.
    fn birth_date_soon() -> NaiveDate {
        let soon = Utc::now().date_naive() + Days::new(7);
        soon.with_year(1990)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1990, 3, 1).unwrap())
    }

    fn basic_auth(email: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{email}:{PASSWORD}"));
        format!("Basic {encoded}")
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, basic_auth(auth));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(app: &Router, email: &str, first_name: &str, with_birth_date: bool) {
        let mut payload = json!({
            "email": email,
            "password": PASSWORD,
            "first_name": first_name,
            "last_name": "Tester",
            "nickname": null,
            "birth_date": null,
        });
        if with_birth_date {
            payload["birth_date"] = json!(birth_date_soon());
        }
        let (status, _) = send(app, Method::POST, "/users", None, Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected() {
        let app = test_router().await;
        let (status, _) = send(&app, Method::GET, "/birthdays", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", false).await;

        let request = Request::builder()
            .method(Method::GET)
            .uri("/users/me")
            .header(
                header::AUTHORIZATION,
                format!(
                    "Basic {}",
                    base64::engine::general_purpose::STANDARD
                        .encode("alice@example.com:not-the-password")
                ),
            )
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_then_fetch_profile() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", false).await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/users/me",
            Some("alice@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(body["first_name"], "Alice");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", false).await;

        let payload = json!({
            "email": "alice@example.com",
            "password": PASSWORD,
            "first_name": "Alice",
            "last_name": "Tester",
            "nickname": null,
            "birth_date": null,
        });
        let (status, _) = send(&app, Method::POST, "/users", None, Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn organizer_claim_flow() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", true).await;
        register(&app, "bob@example.com", "Bob", false).await;
        register(&app, "carol@example.com", "Carol", false).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/birthdays/generate",
            Some("bob@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created_count"], 1);
        let birthday_id = body["birthdays"][0]["id"].as_str().unwrap().to_string();

        // The celebrant may not run their own pool.
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/organizer"),
            Some("alice@example.com"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/organizer"),
            Some("bob@example.com"),
            Some(json!({ "gift_description": "Espresso machine" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gift_description"], "Espresso machine");

        // First claim wins; later claims conflict.
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/organizer"),
            Some("carol@example.com"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn outsider_cannot_view_detail() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", true).await;
        register(&app, "bob@example.com", "Bob", false).await;
        register(&app, "mallory@example.com", "Mallory", false).await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/birthdays/generate",
            Some("bob@example.com"),
            None,
        )
        .await;
        let birthday_id = body["birthdays"][0]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/organizer"),
            Some("bob@example.com"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/birthdays/{birthday_id}"),
            Some("mallory@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/birthdays/{birthday_id}"),
            Some("bob@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "organizer");
    }

    #[tokio::test]
    async fn wishlist_is_owner_scoped() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", false).await;
        register(&app, "bob@example.com", "Bob", false).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/wishlist",
            Some("alice@example.com"),
            Some(json!({ "name": "Espresso machine", "link": "https://shop.example/espresso" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let gift_id = body["id"].as_str().unwrap().to_string();
        let alice_id = body["user_id"].as_str().unwrap().to_string();

        // Bob may browse Alice's list but not edit her items.
        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/wishlist/user/{alice_id}"),
            Some("bob@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gifts"][0]["name"], "Espresso machine");

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/wishlist/{gift_id}"),
            Some("bob@example.com"),
            Some(json!({ "name": "Socks" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/wishlist/{gift_id}"),
            Some("alice@example.com"),
            Some(json!({ "description": "Dual boiler" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["description"], "Dual boiler");

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/wishlist/{gift_id}"),
            Some("alice@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &app,
            Method::GET,
            "/wishlist",
            Some("alice@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["gifts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enroll_and_split_over_http() {
        let app = test_router().await;
        register(&app, "alice@example.com", "Alice", true).await;
        register(&app, "bob@example.com", "Bob", false).await;
        register(&app, "carol@example.com", "Carol", false).await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/birthdays/generate",
            Some("bob@example.com"),
            None,
        )
        .await;
        let birthday_id = body["birthdays"][0]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/organizer"),
            Some("bob@example.com"),
            Some(json!({ "total_amount_minor": 3000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        for email in ["bob@example.com", "carol@example.com"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/contributions",
                Some(email),
                Some(json!({ "birthday_id": birthday_id })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        // The celebrant cannot chip in for their own gift.
        let (status, _) = send(
            &app,
            Method::POST,
            "/contributions",
            Some("alice@example.com"),
            Some(json!({ "birthday_id": birthday_id })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // Only the organizer may trigger the split.
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/split"),
            Some("carol@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/birthdays/{birthday_id}/split"),
            Some("bob@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contributor_count"], 2);
        assert_eq!(body["per_person_minor"], 1500);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/birthdays/{birthday_id}/summary"),
            Some("alice@example.com"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contributor_count"], 2);
        assert_eq!(body["assigned_minor"], 3000);
        assert_eq!(body["paid_minor"], 0);
        assert_eq!(body["unpaid_minor"], 3000);
    }
}
