//! Integration tests for the `/superheroes` endpoints.
//!
//! Runs the full router against the in-memory store and a temporary
//! upload directory.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app, build_test_app_with_upload_limit, create_hero, delete,
    get, hero_form, post_form, put_form, MultipartBody, JPEG_BYTES, PNG_BYTES,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_saved_record() {
    let app = build_test_app();

    let response = post_form(&app, "/superheroes/create", hero_form("Superman")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Superhero created successfully");
    let hero = &json["superhero"];
    assert!(hero["_id"].is_i64());
    assert_eq!(hero["nickname"], "Superman");
    assert_eq!(hero["superpowers"], json!(["Flight", "Strength"]));
    assert!(hero["createdAt"].is_string());
    assert!(hero["updatedAt"].is_string());

    let image = hero["images"][0].as_str().unwrap();
    assert!(image.starts_with("/uploads/"));
    assert!(image.ends_with(".png"));
    assert!(app.upload_exists(image));
}

#[tokio::test]
async fn create_accepts_repeated_superpowers_and_bracketed_names() {
    let app = build_test_app();
    let form = MultipartBody::new()
        .text("nickname", "Flash")
        .text("real_name", "Barry Allen")
        .text("origin_description", "Struck by lightning")
        .text("superpowers[]", "Speed")
        .text("superpowers[]", "Time travel")
        .text("catch_phrase", "Fastest man alive")
        .file("images[]", "a.png", PNG_BYTES)
        .file("images[]", "b.jpg", JPEG_BYTES);

    let response = post_form(&app, "/superheroes/create", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let hero = body_json(response).await["superhero"].clone();
    assert_eq!(hero["superpowers"], json!(["Speed", "Time travel"]));
    let images = hero["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert!(images[1].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn create_missing_field_returns_400_without_writing_files() {
    let app = build_test_app();
    let form = MultipartBody::new()
        .text("nickname", "Batman")
        .text("real_name", "   ")
        .text("origin_description", "Gotham")
        .text("superpowers", "Money")
        .text("catch_phrase", "I'm Batman")
        .file("images", "bat.png", PNG_BYTES);

    let response = post_form(&app, "/superheroes/create", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "All fields are required");
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn create_duplicate_nickname_returns_400() {
    let app = build_test_app();
    create_hero(&app, "Superman").await;

    let response = post_form(&app, "/superheroes/create", hero_form("Superman")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Superhero already exists");
    assert_eq!(app.upload_count(), 1);
    assert_eq!(app.store.nickname_count("Superman").await, 1);
}

#[tokio::test]
async fn create_over_body_limit_returns_413() {
    let app = build_test_app_with_upload_limit(1024);
    let form = hero_form("Heavy").file("images", "big.png", &[0u8; 4096]);

    let response = post_form(&app, "/superheroes/create", form).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_json(response).await["message"].is_string());
    assert_eq!(app.upload_count(), 0);
    assert_eq!(app.store.nickname_count("Heavy").await, 0);
}

#[tokio::test]
async fn create_without_images_returns_400() {
    let app = build_test_app();
    let form = MultipartBody::new()
        .text("nickname", "Ghost")
        .text("real_name", "Nobody")
        .text("origin_description", "Unknown")
        .text("superpowers", "Invisibility")
        .text("catch_phrase", "Boo")
        // An unpicked file input arrives as an empty part.
        .file("images", "", b"");

    let response = post_form(&app, "/superheroes/create", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No images were uploaded");
}

#[tokio::test]
async fn create_rejects_more_than_five_images() {
    let app = build_test_app();
    let mut form = hero_form("Crowded");
    for i in 0..5 {
        form = form.file("images", &format!("{i}.png"), PNG_BYTES);
    }

    let response = post_form(&app, "/superheroes/create", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "A maximum of 5 images can be uploaded at once"
    );
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn create_rejects_non_image_upload() {
    let app = build_test_app();
    let form = hero_form("Texty").file("images", "notes.txt", b"plain text");

    let response = post_form(&app, "/superheroes/create", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["message"].as_str().unwrap().to_string();
    assert!(message.contains("notes.txt"));
    assert_eq!(app.upload_count(), 0);

    let list = body_json(get(&app, "/superheroes/all").await).await;
    assert_eq!(list["superheroes"], json!([]));
}

#[tokio::test]
async fn create_without_multipart_body_returns_json_400() {
    let app = build_test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/superheroes/create")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_defaults_to_first_page_of_five() {
    let app = build_test_app();
    for i in 1..=6 {
        create_hero(&app, &format!("Hero{i}")).await;
    }

    let response = get(&app, "/superheroes/all").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let heroes = json["superheroes"].as_array().unwrap();
    assert_eq!(heroes.len(), 5);
    assert_eq!(heroes[0]["nickname"], "Hero1");
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["nextPageUrl"], "/superheroes/all?page=2&limit=5");
    assert!(json["prevPageUrl"].is_null());
}

#[tokio::test]
async fn list_entries_carry_only_first_image() {
    let app = build_test_app();
    let form = hero_form("Twins").file("images", "second.jpg", JPEG_BYTES);
    let created = body_json(post_form(&app, "/superheroes/create", form).await).await;
    let first = created["superhero"]["images"][0].clone();

    let json = body_json(get(&app, "/superheroes/all").await).await;
    let entry = &json["superheroes"][0];
    assert_eq!(entry["images"], json!([first]));
    assert!(entry["_id"].is_i64());
    assert!(entry.get("real_name").is_none());
}

#[tokio::test]
async fn list_last_page_links_back() {
    let app = build_test_app();
    for i in 1..=6 {
        create_hero(&app, &format!("Hero{i}")).await;
    }

    let json = body_json(get(&app, "/superheroes/all?page=2&limit=5").await).await;
    assert_eq!(json["superheroes"].as_array().unwrap().len(), 1);
    assert_eq!(json["superheroes"][0]["nickname"], "Hero6");
    assert!(json["nextPageUrl"].is_null());
    assert_eq!(json["prevPageUrl"], "/superheroes/all?page=1&limit=5");
}

#[tokio::test]
async fn list_garbage_params_fall_back_to_defaults() {
    let app = build_test_app();
    create_hero(&app, "Solo").await;

    let json = body_json(get(&app, "/superheroes/all?page=abc&limit=-3").await).await;
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["superheroes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_of_empty_catalog() {
    let app = build_test_app();

    let json = body_json(get(&app, "/superheroes/all").await).await;
    assert_eq!(json["superheroes"], json!([]));
    assert_eq!(json["totalPages"], 0);
    assert!(json["nextPageUrl"].is_null());
    assert!(json["prevPageUrl"].is_null());
}

// ---------------------------------------------------------------------------
// Get by id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_id_returns_full_record() {
    let app = build_test_app();
    let created = create_hero(&app, "Superman").await;
    let id = created["_id"].as_i64().unwrap();

    let response = get(&app, &format!("/superheroes/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn get_missing_or_malformed_id_returns_404() {
    let app = build_test_app();

    for uri in ["/superheroes/999", "/superheroes/not-an-id", "/superheroes/-1"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await["message"], "Superhero not found");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_changes_only_sent_fields() {
    let app = build_test_app();
    let created = create_hero(&app, "Superman").await;
    let id = created["_id"].as_i64().unwrap();

    let form = MultipartBody::new()
        .text("real_name", "Kal-El")
        .text("catch_phrase", "");
    let response = put_form(&app, &format!("/superheroes/update/{id}"), form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Superhero updated successfully");
    let hero = &json["superhero"];
    assert_eq!(hero["real_name"], "Kal-El");
    assert_eq!(hero["nickname"], "Superman");
    assert_eq!(hero["catch_phrase"], created["catch_phrase"]);
    assert_eq!(hero["images"], created["images"]);
}

#[tokio::test]
async fn update_removes_listed_images_and_appends_uploads() {
    let app = build_test_app();
    let created = create_hero(&app, "Superman").await;
    let id = created["_id"].as_i64().unwrap();
    let old_image = created["images"][0].as_str().unwrap().to_string();

    let to_remove = json!([old_image, "/uploads/not-on-this-record.png"]).to_string();
    let form = MultipartBody::new()
        .text("imagesToRemove", &to_remove)
        .file("images", "new.jpg", JPEG_BYTES);
    let response = put_form(&app, &format!("/superheroes/update/{id}"), form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let hero = body_json(response).await["superhero"].clone();
    let images = hero["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let new_image = images[0].as_str().unwrap();
    assert_ne!(new_image, old_image);
    assert!(new_image.ends_with(".jpg"));

    assert!(!app.upload_exists(&old_image));
    assert!(app.upload_exists(new_image));
    assert_eq!(app.upload_count(), 1);
}

#[tokio::test]
async fn update_can_remove_images_without_uploading() {
    let app = build_test_app();
    let form = hero_form("Superman").file("images", "b.jpg", JPEG_BYTES);
    let created = body_json(post_form(&app, "/superheroes/create", form).await).await;
    let id = created["superhero"]["_id"].as_i64().unwrap();
    let first = created["superhero"]["images"][0].as_str().unwrap().to_string();
    let uri = format!("/superheroes/update/{id}");

    let form = MultipartBody::new().text("imagesToRemove", &json!([first]).to_string());
    let response = put_form(&app, &uri, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let images = json["superhero"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let remaining = images[0].as_str().unwrap().to_string();
    assert!(remaining.ends_with(".jpg"));
    assert!(!app.upload_exists(&first));
    assert_eq!(app.upload_count(), 1);

    let form = MultipartBody::new().text("imagesToRemove", &json!([remaining]).to_string());
    let response = put_form(&app, &uri, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["superhero"]["images"], json!([]));
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn update_with_malformed_images_to_remove_returns_400() {
    let app = build_test_app();
    let created = create_hero(&app, "Superman").await;
    let id = created["_id"].as_i64().unwrap();

    let form = MultipartBody::new().text("imagesToRemove", "not json");
    let response = put_form(&app, &format!("/superheroes/update/{id}"), form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "imagesToRemove must be a JSON array of strings"
    );
    assert!(app.upload_exists(created["images"][0].as_str().unwrap()));
}

#[tokio::test]
async fn update_missing_record_returns_404() {
    let app = build_test_app();

    let form = MultipartBody::new().text("real_name", "Nobody");
    let response = put_form(&app, "/superheroes/update/42", form).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Superhero not found");
}

#[tokio::test]
async fn update_to_taken_nickname_returns_400_and_discards_uploads() {
    let app = build_test_app();
    create_hero(&app, "Superman").await;
    let batman = create_hero(&app, "Batman").await;
    let id = batman["_id"].as_i64().unwrap();

    let form = MultipartBody::new()
        .text("nickname", "Superman")
        .file("images", "extra.png", PNG_BYTES);
    let response = put_form(&app, &format!("/superheroes/update/{id}"), form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Superhero already exists");
    assert_eq!(app.upload_count(), 2);

    let unchanged = body_json(get(&app, &format!("/superheroes/{id}")).await).await;
    assert_eq!(unchanged["nickname"], "Batman");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record_and_files() {
    let app = build_test_app();
    let form = hero_form("Doomed").file("images", "b.jpg", JPEG_BYTES);
    let created = body_json(post_form(&app, "/superheroes/create", form).await).await;
    let id = created["superhero"]["_id"].as_i64().unwrap();
    assert_eq!(app.upload_count(), 2);

    let response = delete(&app, &format!("/superheroes/delete/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Superhero and associated images deleted successfully"
    );
    assert_eq!(app.upload_count(), 0);

    let response = get(&app, &format!("/superheroes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_succeeds_when_an_image_file_is_already_gone() {
    let app = build_test_app();
    let created = create_hero(&app, "Vanished").await;
    let id = created["_id"].as_i64().unwrap();
    let image = created["images"][0].as_str().unwrap();
    std::fs::remove_file(app.uploads.resolve(image).unwrap()).unwrap();

    let response = delete(&app, &format!("/superheroes/delete/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Superhero and associated images deleted successfully"
    );

    let response = get(&app, &format!("/superheroes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_returns_404() {
    let app = build_test_app();
    let created = create_hero(&app, "Once").await;
    let uri = format!("/superheroes/delete/{}", created["_id"]);

    assert_eq!(delete(&app, &uri).await.status(), StatusCode::OK);
    let response = delete(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Superhero not found");
}

// ---------------------------------------------------------------------------
// Static uploads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn uploaded_images_are_served() {
    let app = build_test_app();
    let created = create_hero(&app, "Visible").await;
    let image = created["images"][0].as_str().unwrap();

    let response = get(&app, image).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, PNG_BYTES);
}
