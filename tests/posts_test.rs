mod common;

use axum::http::{Method, StatusCode};
use common::setup;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use yatube_api::entity::{comments, posts};

#[tokio::test]
async fn author_is_always_the_caller() {
    let app = setup().await;
    let (leo, token) = app.user_with_token("leo").await;
    let mia = app.create_user("mia").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&token),
            Some(json!({ "text": "first!", "author": mia.id })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "leo");
    assert_eq!(body["text"], "first!");
    assert_eq!(body["group"], json!(null));

    let stored = posts::Entity::find_by_id(body["id"].as_i64().unwrap() as i32)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.author_id, leo.id);
}

#[tokio::test]
async fn create_validates_text_and_group() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    for payload in [
        json!({}),
        json!({ "text": "" }),
        json!({ "text": "   " }),
        json!({ "text": 42 }),
        json!({ "text": "with a group", "group": 999 }),
    ] {
        let (status, body) = app
            .request(Method::POST, "/v1/posts/", Some(&token), Some(payload.clone()))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(body["details"].is_array(), "{payload}: {body}");
    }

    assert_eq!(posts::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn posts_can_belong_to_a_group() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;
    let cats = app.create_group("Cats", "cats").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&token),
            Some(json!({ "text": "meow", "group": cats.id, "image": "posts/cat.png" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["group"], cats.id);
    assert_eq!(body["image"], "posts/cat.png");
}

#[tokio::test]
async fn everyone_reads_every_post() {
    let app = setup().await;
    let (_, leo_token) = app.user_with_token("leo").await;
    let (_, mia_token) = app.user_with_token("mia").await;

    for (token, text) in [(&leo_token, "by leo"), (&mia_token, "by mia")] {
        let (status, _) = app
            .request(Method::POST, "/v1/posts/", Some(token), Some(json!({ "text": text })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.request(Method::GET, "/v1/posts/", Some(&mia_token), None).await;

    assert_eq!(status, StatusCode::OK);
    let authors: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["author"].as_str().unwrap())
        .collect();
    assert_eq!(authors, ["leo", "mia"]);

    let leo_post = body[0]["id"].as_i64().unwrap();
    let (status, body) = app
        .request(Method::GET, &format!("/v1/posts/{leo_post}/"), Some(&mia_token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "by leo");
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    for method in [Method::GET, Method::PATCH, Method::DELETE] {
        let (status, _) = app
            .request(
                method.clone(),
                "/v1/posts/999/",
                Some(&token),
                Some(json!({ "text": "x" })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
    }
}

#[tokio::test]
async fn non_author_cannot_modify_a_post() {
    let app = setup().await;
    let (_, leo_token) = app.user_with_token("leo").await;
    let (_, mia_token) = app.user_with_token("mia").await;

    let (_, post) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&leo_token),
            Some(json!({ "text": "original" })),
        )
        .await;
    let uri = format!("/v1/posts/{}/", post["id"]);

    for (method, body) in [
        (Method::PUT, Some(json!({ "text": "hijacked" }))),
        (Method::PATCH, Some(json!({ "text": "hijacked" }))),
        // malformed body still answers 403
        (Method::PATCH, Some(json!({ "text": "" }))),
        (Method::DELETE, None),
    ] {
        let (status, _) = app.request(method.clone(), &uri, Some(&mia_token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method}");
    }

    let stored = posts::Entity::find_by_id(post["id"].as_i64().unwrap() as i32)
        .one(&app.db)
        .await
        .unwrap()
        .expect("post still there");
    assert_eq!(stored.text, "original");
}

#[tokio::test]
async fn author_can_update_a_post() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;
    let cats = app.create_group("Cats", "cats").await;

    let (_, post) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&token),
            Some(json!({ "text": "draft", "group": cats.id })),
        )
        .await;
    let uri = format!("/v1/posts/{}/", post["id"]);

    // PATCH touches only what was sent
    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({ "text": "edited" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "edited");
    assert_eq!(body["group"], cats.id);
    assert_eq!(body["pub_date"], post["pub_date"]);

    // explicit null clears the group
    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({ "group": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"], json!(null));
    assert_eq!(body["text"], "edited");

    // PUT needs the text
    let (status, _) = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "group": cats.id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "text": "final", "author": 999 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "final");
    assert_eq!(body["author"], "leo");
}

#[tokio::test]
async fn author_can_delete_a_post_and_its_comments() {
    let app = setup().await;
    let (_, leo_token) = app.user_with_token("leo").await;
    let (_, mia_token) = app.user_with_token("mia").await;

    let (_, post) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&leo_token),
            Some(json!({ "text": "short lived" })),
        )
        .await;
    let uri = format!("/v1/posts/{}/", post["id"]);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("{uri}comments/"),
            Some(&mia_token),
            Some(json!({ "text": "nice" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.request(Method::DELETE, &uri, Some(&leo_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, json!(null));

    let (status, _) = app.request(Method::GET, &uri, Some(&leo_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(posts::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(comments::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn text_is_stored_trimmed() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/posts/",
            Some(&token),
            Some(json!({ "text": "  padded\n" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["text"], "padded");
}

#[tokio::test]
async fn author_cannot_blank_a_post() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    let (_, post) = app
        .request(Method::POST, "/v1/posts/", Some(&token), Some(json!({ "text": "keep me" })))
        .await;
    let uri = format!("/v1/posts/{}/", post["id"]);

    for (method, payload) in [
        (Method::PUT, json!({ "text": "" })),
        (Method::PUT, json!({ "text": null })),
        (Method::PATCH, json!({ "text": "" })),
        (Method::PATCH, json!({ "text": " \t " })),
        (Method::PATCH, json!({ "text": null })),
    ] {
        let (status, body) = app
            .request(method.clone(), &uri, Some(&token), Some(payload.clone()))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {payload}");
        assert!(
            body["details"][0].as_str().unwrap().starts_with("text: "),
            "{method} {payload}: {body}"
        );
    }

    let stored = posts::Entity::find_by_id(post["id"].as_i64().unwrap() as i32)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.text, "keep me");
}

#[tokio::test]
async fn malformed_post_id_is_not_found() {
    let app = setup().await;
    let (_, token) = app.user_with_token("leo").await;

    for uri in ["/v1/posts/abc/", "/v1/posts/99999999999/", "/v1/posts/-/"] {
        for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
            let (status, body) = app
                .request(method.clone(), uri, Some(&token), Some(json!({ "text": "x" })))
                .await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body["error"], "post not found", "{method} {uri}");
        }
    }
}
