mod support;

use lanescope::backend::{Backend, BackendError, HttpBackend, ImageKind};
use lanescope::config::{BackendSettings, RetrySettings};
use support::fake_server::{FakeServer, Reply};
use support::png_bytes;

fn backend_for(server: &FakeServer) -> HttpBackend {
    HttpBackend::new(&BackendSettings {
        base_url: server.base_url().to_string(),
        max_image_bytes: 64 * 1024,
        retry: RetrySettings {
            max_attempts: 3,
            base_delay_ms: 0,
            max_delay_ms: 0,
        },
    })
    .unwrap()
}

#[test]
fn upload_posts_multipart_file_field() {
    let server = FakeServer::start();
    server.route(
        "POST",
        "/api/upload",
        vec![Reply::json(
            200,
            r#"{"ok":true,"input":"input3.jpg","output":"output3.jpg"}"#,
        )],
    );
    let backend = backend_for(&server);

    let accepted = backend.upload("input3.jpg", b"JPEGDATA").unwrap();
    assert_eq!(accepted.input, "input3.jpg");

    let requests = server.requests_to("/api/upload");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(
        request
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data; boundary=")
    );
    let body = request.body_text();
    assert!(body.contains("name=\"file\"; filename=\"input3.jpg\""));
    assert!(body.contains("JPEGDATA"));
}

#[test]
fn upload_rejection_surfaces_server_error() {
    let server = FakeServer::start();
    server.route(
        "POST",
        "/api/upload",
        vec![Reply::json(200, r#"{"ok":false,"error":"too large"}"#)],
    );
    let err = backend_for(&server).upload("big.jpg", b"x").unwrap_err();
    assert_eq!(err, BackendError::Rejected("too large".to_string()));
}

#[test]
fn upload_http_error_with_envelope_is_rejection_and_not_retried() {
    let server = FakeServer::start();
    server.route(
        "POST",
        "/api/upload",
        vec![Reply::json(500, r#"{"ok":false,"error":"disk full"}"#)],
    );
    let err = backend_for(&server).upload("input1.jpg", b"x").unwrap_err();
    assert_eq!(err, BackendError::Rejected("disk full".to_string()));
    assert_eq!(server.requests_to("/api/upload").len(), 1);
}

#[test]
fn metadata_sends_input_name_and_cache_bust() {
    let server = FakeServer::start();
    server.route(
        "GET",
        "/api/meta",
        vec![Reply::json(
            200,
            r#"{"ok":true,"input":"input3.jpg","output":"output3.jpg","scene":"光照变化"}"#,
        )],
    );
    let meta = backend_for(&server).fetch_metadata("input3.jpg", 2).unwrap();
    assert_eq!(meta.scene.as_deref(), Some("光照变化"));
    assert_eq!(meta.output.as_deref(), Some("output3.jpg"));
    let requests = server.requests_to("/api/meta");
    assert_eq!(requests[0].query, "input_name=input3.jpg&ts=2");
}

#[test]
fn metadata_retries_server_errors() {
    let server = FakeServer::start();
    server.route(
        "GET",
        "/api/meta",
        vec![
            Reply::json(503, "busy"),
            Reply::json(200, r#"{"ok":true,"scene":"标准场景","output":"output1.jpg"}"#),
        ],
    );
    let meta = backend_for(&server).fetch_metadata("input1.jpg", 0).unwrap();
    assert_eq!(meta.scene.as_deref(), Some("标准场景"));
    assert_eq!(server.requests_to("/api/meta").len(), 2);
}

#[test]
fn metadata_client_errors_are_not_retried() {
    let server = FakeServer::start();
    server.route(
        "GET",
        "/api/meta",
        vec![Reply::json(400, r#"{"ok":false,"error":"缺少参数"}"#)],
    );
    let err = backend_for(&server).fetch_metadata("", 0).unwrap_err();
    assert_eq!(err, BackendError::Rejected("缺少参数".to_string()));
    assert_eq!(server.requests_to("/api/meta").len(), 1);
}

#[test]
fn images_are_fetched_and_sniffed() {
    let server = FakeServer::start();
    server.route(
        "GET",
        "/api/output-image",
        vec![Reply::bytes("image/png", png_bytes(4, 4))],
    );
    server.route(
        "GET",
        "/api/input-image",
        vec![Reply::bytes("text/html", b"<html>nope</html>".to_vec())],
    );
    let backend = backend_for(&server);

    let bytes = backend
        .fetch_image(ImageKind::Output, "output3.jpg", 1)
        .unwrap();
    assert_eq!(bytes, png_bytes(4, 4));
    assert_eq!(
        server.requests_to("/api/output-image")[0].query,
        "name=output3.jpg&ts=1"
    );

    let err = backend
        .fetch_image(ImageKind::Input, "input3.jpg", 1)
        .unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[test]
fn oversized_images_are_refused() {
    let server = FakeServer::start();
    server.route(
        "GET",
        "/api/input-image",
        vec![Reply::bytes("image/png", vec![0u8; 128 * 1024])],
    );
    let err = backend_for(&server)
        .fetch_image(ImageKind::Input, "input1.jpg", 0)
        .unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}

#[test]
fn unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let backend = HttpBackend::new(&BackendSettings {
        base_url: format!("http://{addr}"),
        max_image_bytes: 1024,
        retry: RetrySettings {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        },
    })
    .unwrap();
    let err = backend.upload("input1.jpg", b"x").unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
    assert!(err.is_transient());
}
