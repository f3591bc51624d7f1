mod common;

use axum::{
    body::Body,
    http::{header::{AUTHORIZATION, CONTENT_TYPE}, Method, Request, StatusCode},
};
use common::{setup, PASSWORD};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use yatube_api::entity::{posts, tokens};

#[tokio::test]
async fn login_returns_the_same_token_every_time() {
    let app = setup().await;
    let (user, first) = app.user_with_token("leo").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/api-token-auth/",
            None,
            Some(json!({ "username": "leo", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], first.as_str());

    let stored = tokens::Entity::find_by_id(first.clone())
        .one(&app.db)
        .await
        .unwrap()
        .expect("token stored");
    assert_eq!(stored.user_id, user.id);
    assert_eq!(tokens::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn login_accepts_form_encoded_credentials() {
    let app = setup().await;
    app.create_user("leo").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/api-token-auth/")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username=leo&password={PASSWORD}")))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = setup().await;
    app.create_user("leo").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/api-token-auth/",
            None,
            Some(json!({ "username": "leo", "password": "not-the-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
    assert_eq!(tokens::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_user_is_rejected() {
    let app = setup().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/v1/api-token-auth/",
            None,
            Some(json!({ "username": "ghost", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_fields_are_a_validation_error() {
    let app = setup().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/api-token-auth/",
            None,
            Some(json!({ "username": "leo" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"][0].as_str().unwrap().starts_with("password: "));
}

#[tokio::test]
async fn every_endpoint_requires_a_token() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    let (status, post) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&token),
            Some(json!({ "text": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = post["id"].as_i64().unwrap();

    let endpoints = [
        (Method::GET, String::from("/v1/users/")),
        (Method::GET, String::from("/v1/users/1/")),
        (Method::GET, String::from("/v1/groups/")),
        (Method::GET, String::from("/v1/groups/1/")),
        (Method::GET, String::from("/v1/posts/")),
        (Method::POST, String::from("/v1/posts/")),
        (Method::GET, format!("/v1/posts/{post_id}/")),
        (Method::PUT, format!("/v1/posts/{post_id}/")),
        (Method::PATCH, format!("/v1/posts/{post_id}/")),
        (Method::DELETE, format!("/v1/posts/{post_id}/")),
        (Method::GET, format!("/v1/posts/{post_id}/comments/")),
        (Method::POST, format!("/v1/posts/{post_id}/comments/")),
        (Method::DELETE, format!("/v1/posts/{post_id}/comments/1/")),
        (Method::GET, String::from("/v1/posts/999/comments/")),
    ];

    for (method, uri) in endpoints {
        let (status, _) = app
            .request(
                method.clone(),
                &uri,
                None,
                Some(json!({ "text": "sneaky", "author": 1 })),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    assert_eq!(posts::Entity::find().count(&app.db).await.unwrap(), 1);
    let stored = posts::Entity::find().one(&app.db).await.unwrap().unwrap();
    assert_eq!(stored.text, "hello");
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let app = setup().await;
    app.user_with_token("leo").await;

    let (status, _) = app
        .request(Method::GET, "/v1/posts/", Some("0123456789abcdef"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_scheme_is_accepted() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/v1/posts/")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
