mod common;

use common::{refused_url, write_photos, MockServer, Reply};
use photo_batch_uploader::api::ApiClient;
use photo_batch_uploader::config::ApiSettings;
use photo_batch_uploader::error::UploadError;
use photo_batch_uploader::scan::PhotoFile;
use photo_batch_uploader::upload::{UploadOutcome, Uploader};
use std::time::Duration;
use tempfile::TempDir;

fn settings(api_url: String, timeout: Duration) -> ApiSettings {
    ApiSettings {
        api_url,
        api_key: "hpk_test_key".into(),
        event_id: "event-42".into(),
        timeout,
    }
}

fn photo(tmp: &TempDir, name: &str) -> PhotoFile {
    write_photos(tmp.path(), &[name]);
    PhotoFile::new(tmp.path().join(name))
}

#[test]
fn successful_upload_returns_server_payload() {
    let server = MockServer::start(vec![Reply::json(
        200,
        r#"{"success":true,"data":{"uploaded":1}}"#,
    )]);
    let client = ApiClient::new(&settings(server.base_url(), Duration::from_secs(10))).unwrap();
    let tmp = TempDir::new().unwrap();

    let outcome = client.upload(&photo(&tmp, "DSC_0001.JPG"));
    match outcome {
        UploadOutcome::Success(body) => assert_eq!(body["data"]["uploaded"], 1),
        other => panic!("expected success, got {other:?}"),
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    let lower = req.to_ascii_lowercase();
    assert!(req.starts_with("POST /api/admin/events/event-42/photos/upload "), "{req}");
    assert!(lower.contains("x-api-key: hpk_test_key"), "{req}");
    assert!(lower.contains("multipart/form-data"), "{req}");
    assert!(req.contains(r#"name="files""#), "{req}");
    assert!(req.contains(r#"filename="DSC_0001.JPG""#), "{req}");
    assert!(lower.contains("content-type: image/jpeg"), "{req}");
}

#[test]
fn success_false_is_a_rejection_with_message() {
    let server = MockServer::start(vec![Reply::json(
        200,
        r#"{"success":false,"message":"Event is closed"}"#,
    )]);
    let client = ApiClient::new(&settings(server.base_url(), Duration::from_secs(10))).unwrap();
    let tmp = TempDir::new().unwrap();

    let outcome = client.upload(&photo(&tmp, "a.jpg"));
    assert_eq!(
        outcome,
        UploadOutcome::Failure(UploadError::Rejected("FAILED: Event is closed".into()))
    );
}

#[test]
fn non_200_status_reports_code_and_error_field() {
    let server = MockServer::start(vec![Reply::json(401, r#"{"error":"Invalid API key"}"#)]);
    let client = ApiClient::new(&settings(server.base_url(), Duration::from_secs(10))).unwrap();
    let tmp = TempDir::new().unwrap();

    let outcome = client.upload(&photo(&tmp, "a.jpg"));
    assert_eq!(
        outcome,
        UploadOutcome::Failure(UploadError::Rejected("HTTP 401 - Invalid API key".into()))
    );
}

#[test]
fn slow_server_times_out() {
    let server = MockServer::start(vec![Reply::Stall(Duration::from_secs(4))]);
    let client = ApiClient::new(&settings(server.base_url(), Duration::from_secs(1))).unwrap();
    let tmp = TempDir::new().unwrap();

    let outcome = client.upload(&photo(&tmp, "a.jpg"));
    assert_eq!(
        outcome,
        UploadOutcome::Failure(UploadError::Timeout { secs: 1 })
    );
}

#[test]
fn refused_connection_is_a_transport_failure() {
    let client = ApiClient::new(&settings(refused_url(), Duration::from_secs(5))).unwrap();
    let tmp = TempDir::new().unwrap();

    match client.upload(&photo(&tmp, "a.jpg")) {
        UploadOutcome::Failure(UploadError::Transport(_)) => {}
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[test]
fn unreadable_file_fails_without_request() {
    let server = MockServer::start(vec![]);
    let client = ApiClient::new(&settings(server.base_url(), Duration::from_secs(5))).unwrap();
    let tmp = TempDir::new().unwrap();

    let missing = PhotoFile::new(tmp.path().join("gone.jpg"));
    match client.upload(&missing) {
        UploadOutcome::Failure(UploadError::Io(_)) => {}
        other => panic!("expected io failure, got {other:?}"),
    }
    assert!(server.requests().is_empty());
}

#[cfg(unix)]
#[test]
fn non_utf8_file_name_is_sent_under_display_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let server = MockServer::start(vec![Reply::json(200, r#"{"success":true}"#)]);
    let client = ApiClient::new(&settings(server.base_url(), Duration::from_secs(10))).unwrap();
    let tmp = TempDir::new().unwrap();

    let path = tmp.path().join(OsStr::from_bytes(b"caf\xe9.jpg"));
    std::fs::write(&path, b"\xff\xd8\xff\xe0jpeg").unwrap();
    let photo = PhotoFile::new(path);
    assert_eq!(photo.name, "caf\u{FFFD}.jpg");

    assert!(matches!(client.upload(&photo), UploadOutcome::Success(_)));
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert!(req.contains("filename"), "{req}");
    assert!(req.contains("caf"), "{req}");
    assert!(!req.contains("image.jpg"), "{req}");
}
