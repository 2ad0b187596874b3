//! HTTP API integration tests
//!
//! Each test builds the full application (middleware included) on a fresh
//! temp work directory and drives it with `tower::ServiceExt::oneshot`,
//! carrying the session cookie by hand like a browser would.

use std::io::Cursor;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use image::{ImageBuffer, Rgb};
use serde_json::{Value, json};
use tower::ServiceExt;

use photohunt_server::api::build_app;
use photohunt_server::{Config, ServerState};

const ADMIN_PASSWORD: &str = "my password";
const BOUNDARY: &str = "test-multipart-boundary";

struct TestApp {
    app: Router,
    work_dir: tempfile::TempDir,
}

impl TestApp {
    /// Path of a stored upload, given the filename from a photo's URL
    fn upload_path(&self, filename: &str) -> std::path::PathBuf {
        self.work_dir.path().join("uploads").join(filename)
    }
}

async fn spawn_app() -> TestApp {
    let work_dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    config.admin_password = ADMIN_PASSWORD.to_string();
    config.public_base_url = "http://localhost:3000/uploads".to_string();

    let state = ServerState::initialize(&config).await.unwrap();
    TestApp {
        app: build_app(state),
        work_dir,
    }
}

/// Bare stored filename from a photo response's absolute URL
fn stored_filename(photo: &Value) -> String {
    photo["url"]
        .as_str()
        .unwrap()
        .rsplit('/')
        .next()
        .unwrap()
        .to_string()
}

/// Drive one request; returns status, parsed body, and the session cookie
/// (when the response set one).
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body, cookie)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).unwrap()
}

fn form(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn json_req(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn multipart(
    method: &str,
    uri: &str,
    cookie: &str,
    texts: &[(&str, &str)],
    file: Option<(&str, Vec<u8>)>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; \
                 filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(4, 4, Rgb::<u8>([10, 120, 200]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

async fn admin_cookie(app: &Router) -> String {
    let (status, body, cookie) = send(
        app,
        form(
            "POST",
            "/api/v1/auth/enable-admin",
            None,
            "password=my%20password",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "enable-admin failed: {body}");
    cookie.expect("enable-admin must set a session cookie")
}

#[tokio::test]
async fn health_reports_ok() {
    let t = spawn_app().await;
    let (status, body, _) = send(&t.app, get("/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["message"], "ok");
}

#[tokio::test]
async fn admin_gate_rejects_wrong_password_and_guards_routes() {
    let t = spawn_app().await;

    let (status, body, _) = send(
        &t.app,
        form("POST", "/api/v1/auth/enable-admin", None, "password=guess"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["data"]["message"], "Wrong password.");

    // Admin routes without an enabled session
    let (status, body, _) = send(&t.app, get("/api/v1/admin/photo", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["message"], "Admin mode required.");

    // With the gate enabled the same route answers
    let cookie = admin_cookie(&t.app).await;
    let (status, body, _) = send(&t.app, get("/api/v1/admin/photo", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["photos"], json!([]));

    // Disabling locks it again
    let (status, _, _) = send(
        &t.app,
        form("POST", "/api/v1/auth/disable-admin", Some(&cookie), ""),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&t.app, get("/api/v1/admin/photo", Some(&cookie))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn photo_upload_reports_every_invalid_field_at_once() {
    let t = spawn_app().await;
    let cookie = admin_cookie(&t.app).await;

    // Neither the file nor the alt text is present
    let (status, body, _) = send(
        &t.app,
        multipart("POST", "/api/v1/admin/photo", &cookie, &[], None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    let errors = body["data"]["validation"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    let paths: Vec<&str> = errors.iter().map(|e| e["path"].as_str().unwrap()).collect();
    assert!(paths.contains(&"photo"));
    assert!(paths.contains(&"altText"));

    // A renamed non-image is caught by the decoder
    let (status, body, _) = send(
        &t.app,
        multipart(
            "POST",
            "/api/v1/admin/photo",
            &cookie,
            &[("altText", "Fake image")],
            Some(("fake.png", b"not an image".to_vec())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["validation"][0]["path"], "photo");
}

#[tokio::test]
async fn missing_photo_is_a_fail_envelope() {
    let t = spawn_app().await;
    let (status, body, _) = send(&t.app, get("/api/v1/photo/9999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["data"]["message"], "That photo does not exist.");
}

#[tokio::test]
async fn bulk_tag_save_validates_with_indexed_paths() {
    let t = spawn_app().await;
    let cookie = admin_cookie(&t.app).await;

    let (status, body, _) = send(
        &t.app,
        multipart(
            "POST",
            "/api/v1/admin/photo",
            &cookie,
            &[("altText", "A parade")],
            Some(("parade.png", png_bytes())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "photo create failed: {body}");
    let photo_id = body["data"]["photo"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/admin/photo/{photo_id}/tag");

    // Bad name and out-of-range position, pinpointed by entry index
    let bad = json!({
        "create": [{ "name": "Bad Name!", "posX": 1.5, "posY": 0.5 }]
    });
    let (status, body, _) = send(&t.app, json_req("PUT", &uri, Some(&cookie), &bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let paths: Vec<&str> = body["data"]["validation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"create[0].name"));
    assert!(paths.contains(&"create[0].posX"));

    // A valid unit lands atomically and echoes the full tag list
    let good = json!({
        "create": [
            { "name": "Waldo", "posX": 0.25, "posY": 0.75 },
            { "name": "Wenda", "posX": 0.8, "posY": 0.2 }
        ]
    });
    let (status, body, _) = send(&t.app, json_req("PUT", &uri, Some(&cookie), &good)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tags"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn full_game_round_from_upload_to_leaderboard() {
    let t = spawn_app().await;
    let cookie = admin_cookie(&t.app).await;

    // Admin seeds a photo with two people to find
    let (status, body, _) = send(
        &t.app,
        multipart(
            "POST",
            "/api/v1/admin/photo",
            &cookie,
            &[("altText", "A crowded beach")],
            Some(("beach.png", png_bytes())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "photo create failed: {body}");
    let photo_id = body["data"]["photo"]["id"].as_i64().unwrap();
    assert!(
        body["data"]["photo"]["url"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost:3000/uploads/")
    );
    let filename = stored_filename(&body["data"]["photo"]);
    assert!(t.upload_path(&filename).exists());

    let tag_uri = format!("/api/v1/admin/photo/{photo_id}/tag");
    let (status, body, _) = send(
        &t.app,
        form(
            "POST",
            &tag_uri,
            Some(&cookie),
            "name=Waldo&posX=0.25&posY=0.75",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "tag create failed: {body}");
    let waldo_id = body["data"]["tag"]["id"].as_i64().unwrap();

    let (status, body, _) = send(
        &t.app,
        form(
            "POST",
            &tag_uri,
            Some(&cookie),
            "name=Wenda&posX=0.8&posY=0.2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "tag create failed: {body}");
    let wenda_id = body["data"]["tag"]["id"].as_i64().unwrap();

    // Player probes near Waldo without naming anyone; timer starts here
    let (status, body, player) = send(
        &t.app,
        form(
            "POST",
            "/api/v1/check-tag",
            None,
            &format!("photoId={photo_id}&posX=0.26&posY=0.74"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let candidates = body["data"]["tags"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["name"], "Waldo");
    let player = player.expect("play state must set a session cookie");

    // Claiming Waldo across the photo is a miss
    let (status, body, _) = send(
        &t.app,
        form(
            "POST",
            "/api/v1/check-tag",
            Some(&player),
            &format!("photoId={photo_id}&tagId={waldo_id}&posX=0.9&posY=0.9"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hit"], false);
    assert_eq!(body["data"]["foundAllTags"], false);

    // Claiming Waldo near his spot is a hit
    let (status, body, _) = send(
        &t.app,
        form(
            "POST",
            "/api/v1/check-tag",
            Some(&player),
            &format!("photoId={photo_id}&tagId={waldo_id}&posX=0.3&posY=0.7"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hit"], true);
    assert_eq!(body["data"]["foundTags"], json!([waldo_id]));
    assert_eq!(body["data"]["foundAllTags"], false);

    // Finding Wenda completes the run and freezes the time
    let (status, body, _) = send(
        &t.app,
        form(
            "POST",
            "/api/v1/check-tag",
            Some(&player),
            &format!("photoId={photo_id}&tagId={wenda_id}&posX=0.75&posY=0.25"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["foundAllTags"], true);
    let ms_to_finish = body["data"]["msToFinish"].as_i64().unwrap();
    assert!(ms_to_finish >= 0);

    // The submitted time is the server's, never the client's
    let (status, body, _) = send(
        &t.app,
        form("POST", "/api/v1/time", Some(&player), "name=ACE"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "score submit failed: {body}");
    assert_eq!(body["data"]["score"]["name"], "ACE");
    assert_eq!(body["data"]["score"]["msToFinish"].as_i64().unwrap(), ms_to_finish);

    // The run is spent; a second submission has no time to draw on
    let (status, body, _) = send(
        &t.app,
        form("POST", "/api/v1/time", Some(&player), "name=BOB"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err = &body["data"]["validation"][0];
    assert_eq!(err["path"], "msToFinish");
    assert_eq!(err["location"], "session");

    // Leaderboard lists the recorded run
    let (status, body, _) = send(
        &t.app,
        get(&format!("/api/v1/time?photoId={photo_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["scores"][0]["name"], "ACE");

    // Cleanup: deleting the photo removes it from the public API and
    // removes the stored file from the uploads directory
    let (status, _, _) = send(
        &t.app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/admin/photo/{photo_id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!t.upload_path(&filename).exists());
    let (status, _, _) = send(&t.app, get(&format!("/api/v1/photo/{photo_id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A second delete of the same id reads as missing, never a crash
    let (status, body, _) = send(
        &t.app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/admin/photo/{photo_id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["message"], "That photo does not exist.");
}

#[tokio::test]
async fn photo_update_is_partial_and_replaces_the_stored_file() {
    let t = spawn_app().await;
    let cookie = admin_cookie(&t.app).await;

    let (status, body, _) = send(
        &t.app,
        multipart(
            "POST",
            "/api/v1/admin/photo",
            &cookie,
            &[("altText", "Old text")],
            Some(("original.png", png_bytes())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "photo create failed: {body}");
    let photo_id = body["data"]["photo"]["id"].as_i64().unwrap();
    let old_filename = stored_filename(&body["data"]["photo"]);
    assert!(t.upload_path(&old_filename).exists());

    let uri = format!("/api/v1/admin/photo/{photo_id}");

    // Supplying neither field is rejected up front
    let (status, body, _) = send(&t.app, multipart("PUT", &uri, &cookie, &[], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    // Alt text alone changes nothing about the stored file
    let (status, body, _) = send(
        &t.app,
        multipart("PUT", &uri, &cookie, &[("altText", "New text")], None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "altText update failed: {body}");
    assert_eq!(body["data"]["photo"]["altText"], "New text");
    assert_eq!(stored_filename(&body["data"]["photo"]), old_filename);
    assert!(t.upload_path(&old_filename).exists());

    // A new file replaces the old one on disk after the row update
    let (status, body, _) = send(
        &t.app,
        multipart(
            "PUT",
            &uri,
            &cookie,
            &[],
            Some(("replacement.png", png_bytes())),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "file update failed: {body}");
    let new_filename = stored_filename(&body["data"]["photo"]);
    assert_ne!(new_filename, old_filename);
    assert_eq!(body["data"]["photo"]["altText"], "New text");
    assert!(t.upload_path(&new_filename).exists());
    assert!(!t.upload_path(&old_filename).exists());

    // Updating a missing id is a 404, not a silent create
    let (status, body, _) = send(
        &t.app,
        multipart(
            "PUT",
            &format!("/api/v1/admin/photo/{}", photo_id + 999),
            &cookie,
            &[("altText", "Nobody")],
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["message"], "That photo does not exist.");
}

#[tokio::test]
async fn score_submit_after_photo_delete_is_not_found() {
    let t = spawn_app().await;
    let cookie = admin_cookie(&t.app).await;

    let (_, body, _) = send(
        &t.app,
        multipart(
            "POST",
            "/api/v1/admin/photo",
            &cookie,
            &[("altText", "A stadium")],
            Some(("stadium.png", png_bytes())),
        ),
    )
    .await;
    let photo_id = body["data"]["photo"]["id"].as_i64().unwrap();

    let (_, body, _) = send(
        &t.app,
        form(
            "POST",
            &format!("/api/v1/admin/photo/{photo_id}/tag"),
            Some(&cookie),
            "name=Waldo&posX=0.5&posY=0.5",
        ),
    )
    .await;
    let tag_id = body["data"]["tag"]["id"].as_i64().unwrap();

    // Player finishes the run
    let (status, body, player) = send(
        &t.app,
        form(
            "POST",
            "/api/v1/check-tag",
            None,
            &format!("photoId={photo_id}&tagId={tag_id}&posX=0.5&posY=0.5"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["foundAllTags"], true);
    let player = player.expect("play state must set a session cookie");

    // Admin removes the photo before the player submits their name
    let (status, _, _) = send(
        &t.app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/admin/photo/{photo_id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The finished run has nothing to attach to
    let (status, body, _) = send(
        &t.app,
        form("POST", "/api/v1/time", Some(&player), "name=ACE"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["data"]["message"], "That photo does not exist.");

    // The stale run is dropped with it; nothing is left to resubmit
    let (status, body, _) = send(
        &t.app,
        form("POST", "/api/v1/time", Some(&player), "name=ACE"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["validation"][0]["path"], "msToFinish");
}

#[tokio::test]
async fn tag_update_and_delete_are_scoped_to_their_photo() {
    let t = spawn_app().await;
    let cookie = admin_cookie(&t.app).await;

    let (_, body, _) = send(
        &t.app,
        multipart(
            "POST",
            "/api/v1/admin/photo",
            &cookie,
            &[("altText", "A market")],
            Some(("market.png", png_bytes())),
        ),
    )
    .await;
    let photo_id = body["data"]["photo"]["id"].as_i64().unwrap();

    let tag_uri = format!("/api/v1/admin/photo/{photo_id}/tag");
    let (_, body, _) = send(
        &t.app,
        form(
            "POST",
            &tag_uri,
            Some(&cookie),
            "name=Odlaw&posX=0.4&posY=0.6",
        ),
    )
    .await;
    let tag_id = body["data"]["tag"]["id"].as_i64().unwrap();

    // Partial update leaves the untouched axis alone
    let (status, body, _) = send(
        &t.app,
        form(
            "PUT",
            &format!("{tag_uri}/{tag_id}"),
            Some(&cookie),
            "posX=0.45",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tag"]["posX"], 0.45);
    assert_eq!(body["data"]["tag"]["posY"], 0.6);

    // Empty update is rejected up front
    let (status, _, _) = send(
        &t.app,
        form("PUT", &format!("{tag_uri}/{tag_id}"), Some(&cookie), ""),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A tag id that is not on this photo reads as missing
    let other_uri = format!("/api/v1/admin/photo/{photo_id}/tag/{}", tag_id + 999);
    let (status, body, _) = send(
        &t.app,
        Request::builder()
            .method("DELETE")
            .uri(&other_uri)
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["message"], "That tag does not exist.");
}
