#![allow(dead_code)]

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;
use yatube_api::{
    app,
    entity::{groups, users},
    groups::{models::CreateGroup, utils::create_group},
    users::{models::CreateUser, utils::create_user},
    AppState,
};

pub const PASSWORD: &str = "s3cret-passw0rd";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
}

/// Fresh in-memory database with all migrations applied.
pub async fn setup() -> TestApp {
    let mut options = ConnectOptions::new(String::from("sqlite::memory:"));
    // every connection to :memory: is its own database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("sqlite connection");
    Migrator::up(&db, None).await.expect("migrations");

    TestApp {
        router: app(AppState { db: db.clone() }),
        db,
    }
}

impl TestApp {
    pub async fn create_user(&self, username: &str) -> users::Model {
        create_user(
            &self.db,
            CreateUser {
                username: username.to_owned(),
                password: PASSWORD.to_owned(),
                first_name: String::new(),
                last_name: String::new(),
            },
        )
        .await
        .expect("create user")
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> groups::Model {
        create_group(
            &self.db,
            CreateGroup {
                title: title.to_owned(),
                slug: slug.to_owned(),
                description: format!("all about {title}"),
            },
        )
        .await
        .expect("create group")
    }

    /// Creates a user and logs in through the token endpoint.
    pub async fn user_with_token(&self, username: &str) -> (users::Model, String) {
        let user = self.create_user(username).await;

        let (status, body) = self
            .request(
                Method::POST,
                "/v1/api-token-auth/",
                None,
                Some(json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        let token = body["token"].as_str().expect("token in body").to_owned();

        (user, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .expect("response body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }
}
