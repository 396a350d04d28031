mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use common::{TestApp, bearer};
use serde_json::Value;
use travelgo::domain::entities::Role;

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn post_form(title: &str, categories: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title)
        .add_text("authorName", "Sarah")
        .add_text("description", "Notes from the road.")
        .add_text("categories", categories)
        .add_text("imageLink", "https://cdn.example.com/cover.jpg")
}

fn jpeg(name: &str) -> Part {
    Part::bytes(JPEG_BYTES.to_vec())
        .file_name(name.to_string())
        .mime_type("image/jpeg")
}

async fn create(app: &TestApp, token: &str, form: MultipartForm) -> Value {
    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer(token))
        .multipart(form)
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

fn ids(posts: &Value) -> Vec<String> {
    posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["_id"].as_str().unwrap().to_string())
        .collect()
}

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_post_with_upload() {
    let app = TestApp::new().await;
    let (user, token) = app.user("sarah@example.com", Role::User).await;

    let form = post_form("Sunset in Santorini", r#"["Travel","Beaches"]"#)
        .add_text("isFeaturedPost", "true")
        .add_part("images", jpeg("sunset.jpg"));
    let post = create(&app, &token, form).await;

    let image = post["images"][0].as_str().unwrap();
    assert!(image.starts_with("http://localhost:3000/uploads/"));
    assert!(image.ends_with(".jpg"));
    assert_eq!(post["imageLink"], image);
    assert_eq!(post["categories"], serde_json::json!(["Travel", "Beaches"]));
    assert_eq!(post["isFeaturedPost"], true);
    assert_eq!(post["authorId"], user.id.to_string());
    assert!(post.get("timeOfPost").is_some());

    let file_name = image.rsplit('/').next().unwrap();
    assert!(app.upload_dir.path().join(file_name).exists());

    let author = app.find_user(user.id).await;
    assert_eq!(
        author.post_ids,
        vec![post["_id"].as_str().unwrap().parse::<i64>().unwrap()]
    );

    assert_eq!(
        app.cache.deleted(),
        vec!["posts:all", "posts:featured", "posts:latest"]
    );
}

#[tokio::test]
async fn test_create_post_with_image_link_only() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let post = create(&app, &token, post_form("Alps", "Adventure")).await;

    assert_eq!(
        post["images"],
        serde_json::json!(["https://cdn.example.com/cover.jpg"])
    );
    assert_eq!(post["categories"], serde_json::json!(["Adventure"]));
}

#[tokio::test]
async fn test_create_post_repeated_category_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let form = post_form("Tokyo", "City").add_text("categories", "Travel");
    let post = create(&app, &token, form).await;

    assert_eq!(post["categories"], serde_json::json!(["City", "Travel"]));
}

#[tokio::test]
async fn test_create_post_trims_category_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let form = post_form("Tokyo", " City")
        .add_text("categories", "")
        .add_text("categories", "Travel ");
    let post = create(&app, &token, form).await;

    assert_eq!(post["categories"], serde_json::json!(["City", "Travel"]));
}

#[tokio::test]
async fn test_create_post_requires_session() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/posts")
        .multipart(post_form("Alps", "Nature"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_rejects_forged_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer("MTphZG1pbjo5OTk5OTk5OTk5.00"))
        .multipart(post_form("Alps", "Nature"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_too_many_categories() {
    let app = TestApp::new().await;
    let (user, token) = app.user("sarah@example.com", Role::User).await;

    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer(&token))
        .multipart(post_form("Alps", r#"["Travel","Nature","City","Beaches"]"#))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "validation_error");

    assert!(app.find_user(user.id).await.post_ids.is_empty());
    app.server.get("/api/posts").await.assert_json(&serde_json::json!([]));
}

#[tokio::test]
async fn test_create_post_unknown_category() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer(&token))
        .multipart(post_form("Alps", "Mountains"))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_post_missing_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let form = MultipartForm::new()
        .add_text("title", "Alps")
        .add_text("imageLink", "https://cdn.example.com/cover.jpg");

    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_create_post_rejects_bad_image_link() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let form = MultipartForm::new()
        .add_text("title", "Alps")
        .add_text("authorName", "Sarah")
        .add_text("description", "Peaks.")
        .add_text("categories", "Nature")
        .add_text("imageLink", "https://images.unsplash.com/photo-1464822759023");

    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_post_rejects_unsupported_upload() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let form = post_form("Alps", "Nature").add_part(
        "images",
        Part::bytes(b"GIF89a".to_vec())
            .file_name("anim.gif")
            .mime_type("image/gif"),
    );

    let response = app
        .server
        .post("/api/posts")
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await;

    response.assert_status_bad_request();
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_listings_refresh_cache() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let first = create(&app, &token, post_form("First", "Travel")).await;
    let second = create(
        &app,
        &token,
        post_form("Second", "City").add_text("isFeaturedPost", "true"),
    )
    .await;

    let all = app.server.get("/api/posts").await.json::<Value>();
    assert_eq!(
        ids(&all),
        vec![
            first["_id"].as_str().unwrap().to_string(),
            second["_id"].as_str().unwrap().to_string()
        ]
    );
    let cached: Value = serde_json::from_str(&app.cache.value("posts:all").unwrap()).unwrap();
    assert_eq!(cached, all);

    let latest = app.server.get("/api/posts/latest").await.json::<Value>();
    assert_eq!(ids(&latest)[0], second["_id"].as_str().unwrap());
    assert!(app.cache.value("posts:latest").is_some());

    let featured = app.server.get("/api/posts/featured").await.json::<Value>();
    assert_eq!(ids(&featured), vec![second["_id"].as_str().unwrap()]);
    assert!(app.cache.value("posts:featured").is_some());
}

#[tokio::test]
async fn test_listing_after_mutation_is_fresh() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    create(&app, &token, post_form("First", "Travel")).await;
    app.server.get("/api/posts").await.assert_status_ok();

    let second = create(&app, &token, post_form("Second", "City")).await;

    assert!(app.cache.value("posts:all").is_none());
    let all = app.server.get("/api/posts").await.json::<Value>();
    assert!(ids(&all).contains(&second["_id"].as_str().unwrap().to_string()));
}

#[tokio::test]
async fn test_listing_fails_when_cache_write_fails() {
    let app = TestApp::new().await;
    app.cache.fail();

    let response = app.server.get("/api/posts").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "cache_error");
}

#[tokio::test]
async fn test_create_succeeds_when_cache_is_down() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    app.cache.fail();

    create(&app, &token, post_form("First", "Travel")).await;

    assert_eq!(app.cache.deleted().len(), 3);
}

#[tokio::test]
async fn test_list_by_category() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    create(&app, &token, post_form("Beach", r#"["Beaches"]"#)).await;
    let city = create(&app, &token, post_form("Tokyo", r#"["City","Travel"]"#)).await;

    let posts = app.server.get("/api/posts/category/City").await.json::<Value>();
    assert_eq!(ids(&posts), vec![city["_id"].as_str().unwrap()]);

    app.server
        .get("/api/posts/category/Skiing")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_related_posts() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    let beach = create(&app, &token, post_form("Beach", "Beaches")).await;
    let city = create(&app, &token, post_form("Tokyo", "City")).await;
    create(&app, &token, post_form("Forest", "Nature")).await;

    let posts = app
        .server
        .get("/api/posts/related?categories=Beaches,City")
        .await
        .json::<Value>();
    assert_eq!(
        ids(&posts),
        vec![
            beach["_id"].as_str().unwrap().to_string(),
            city["_id"].as_str().unwrap().to_string()
        ]
    );

    let repeated = app
        .server
        .get("/api/posts/related?categories=Beaches&categories=City")
        .await
        .json::<Value>();
    assert_eq!(repeated, posts);

    let response = app.server.get("/api/posts/related").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["message"], "Invalid category");
}

// ─── GET ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_post() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;

    let id = post["_id"].as_str().unwrap();
    let fetched = app.server.get(&format!("/api/posts/{id}")).await.json::<Value>();
    assert_eq!(fetched, post);

    app.server.get("/api/posts/999").await.assert_status_not_found();
    app.server
        .get("/api/posts/65f1c0ffee")
        .await
        .assert_status_not_found();
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_by_owner() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .multipart(MultipartForm::new().add_text("title", "Swiss Alps"))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["title"], "Swiss Alps");
    assert_eq!(updated["images"], post["images"]);
    assert_eq!(updated["categories"], post["categories"]);
    assert_eq!(app.cache.deleted().len(), 6);
}

#[tokio::test]
async fn test_update_replaces_images() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let form = MultipartForm::new()
        .add_text("existingImages", "[]")
        .add_part("images", jpeg("new.jpg"));

    let updated = app
        .server
        .patch(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await
        .json::<Value>();

    let images = updated["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert!(images[0].as_str().unwrap().starts_with("http://localhost:3000/uploads/"));
    assert_eq!(updated["imageLink"], images[0]);
}

#[tokio::test]
async fn test_update_keeps_listed_images_and_appends_uploads() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let form = MultipartForm::new()
        .add_text("existingImages", r#"["https://cdn.example.com/cover.jpg"]"#)
        .add_part("images", jpeg("second.jpg"));

    let updated = app
        .server
        .patch(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await
        .json::<Value>();

    let images = updated["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], "https://cdn.example.com/cover.jpg");
    assert_eq!(updated["imageLink"], "https://cdn.example.com/cover.jpg");
}

#[tokio::test]
async fn test_update_image_link_alone_keeps_images() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let updated = app
        .server
        .patch(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .multipart(MultipartForm::new().add_text("imageLink", "https://cdn.example.com/other.png"))
        .await
        .json::<Value>();

    assert_eq!(updated["images"], post["images"]);
    assert_eq!(updated["imageLink"], "https://cdn.example.com/other.png");

    let stored = app.server.get(&format!("/api/posts/{id}")).await.json::<Value>();
    assert_eq!(stored["images"], serde_json::json!(["https://cdn.example.com/cover.jpg"]));
}

#[tokio::test]
async fn test_update_rejects_too_many_categories() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let form = MultipartForm::new()
        .add_text("categories", "Travel")
        .add_text("categories", "Nature")
        .add_text("categories", "City")
        .add_text("categories", "Beaches");

    app.server
        .patch(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .multipart(form)
        .await
        .assert_status_bad_request();

    let unchanged = app.server.get(&format!("/api/posts/{id}")).await.json::<Value>();
    assert_eq!(unchanged["categories"], serde_json::json!(["Nature"]));
}

#[tokio::test]
async fn test_update_by_other_user_forbidden() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("sarah@example.com", Role::User).await;
    let (_, stranger) = app.user("mike@example.com", Role::User).await;
    let post = create(&app, &owner, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&stranger))
        .multipart(MultipartForm::new().add_text("title", "Mine now"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_missing_post() {
    let app = TestApp::new().await;
    let (_, token) = app.user("sarah@example.com", Role::User).await;

    app.server
        .patch("/api/posts/404")
        .add_header("Authorization", bearer(&token))
        .multipart(MultipartForm::new().add_text("title", "Ghost"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_admin_update_route() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("sarah@example.com", Role::User).await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    let post = create(&app, &owner, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    app.server
        .patch(&format!("/api/posts/admin/{id}"))
        .add_header("Authorization", bearer(&owner))
        .multipart(MultipartForm::new().add_text("isFeaturedPost", "true"))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = app
        .server
        .patch(&format!("/api/posts/admin/{id}"))
        .add_header("Authorization", bearer(&admin))
        .multipart(MultipartForm::new().add_text("isFeaturedPost", "true"))
        .await
        .json::<Value>();

    assert_eq!(updated["isFeaturedPost"], true);
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_post() {
    let app = TestApp::new().await;
    let (user, token) = app.user("sarah@example.com", Role::User).await;
    let keep = create(&app, &token, post_form("Keep", "Travel")).await;
    let post = create(&app, &token, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    let response = app
        .server
        .delete(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Post deleted successfully"
    );

    let author = app.find_user(user.id).await;
    assert_eq!(
        author.post_ids,
        vec![keep["_id"].as_str().unwrap().parse::<i64>().unwrap()]
    );

    app.server
        .get(&format!("/api/posts/{id}"))
        .await
        .assert_status_not_found();

    app.server
        .delete(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_by_admin() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("sarah@example.com", Role::User).await;
    let (_, admin) = app.user("admin@example.com", Role::Admin).await;
    let post = create(&app, &owner, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    app.server
        .delete(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&admin))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_delete_by_other_user_forbidden() {
    let app = TestApp::new().await;
    let (_, owner) = app.user("sarah@example.com", Role::User).await;
    let (_, stranger) = app.user("mike@example.com", Role::User).await;
    let post = create(&app, &owner, post_form("Alps", "Nature")).await;
    let id = post["_id"].as_str().unwrap();

    app.server
        .delete(&format!("/api/posts/{id}"))
        .add_header("Authorization", bearer(&stranger))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get(&format!("/api/posts/{id}"))
        .await
        .assert_status_ok();
}
