#![allow(clippy::unwrap_used)]
// Dispatcher and catalog tests against a wiremock server.

use std::sync::{Arc, Mutex};

use chrono::{TimeDelta, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use jamfly_api::catalog::buildings;
use jamfly_api::{
    Call, CallArgs, Error, Exchange, ExportQuery, IdArgs, JamfClient, ListQuery, Operation, Output,
    ParamValue, Params, RequestBody, SecretString,
};

// ── Helpers ─────────────────────────────────────────────────────────

const PING: Operation = Operation::get("ping", "/api/v1/ping")
    .family("test")
    .summary("ping");

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1",
            "expires": (Utc::now() + TimeDelta::minutes(20)).to_rfc3339(),
        })))
        .mount(server)
        .await;
}

async fn setup() -> (MockServer, JamfClient) {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let client = JamfClient::new(
        &server.uri(),
        "api-user",
        SecretString::from("hunter2".to_owned()),
    )
    .unwrap();
    (server, client)
}

/// Requests that reached a non-auth endpoint.
async fn api_requests(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| !r.url.path().starts_with("/api/v1/auth/"))
        .collect()
}

// ── Argument validation ─────────────────────────────────────────────

#[tokio::test]
async fn test_exclusive_ids_fail_before_any_request() {
    let server = MockServer::start().await;
    let client = JamfClient::new(&server.uri(), "u", SecretString::from("p".to_owned())).unwrap();

    let both = IdArgs {
        id: Some(1.into()),
        ids: Some(vec![2.into(), 3.into()]),
    };
    let err = client.delete_buildings(&both).await.unwrap_err();
    assert!(matches!(&err, Error::Argument(m) if m.contains("mutually exclusive")), "got {err:?}");

    let err = client.delete_buildings(&IdArgs::default()).await.unwrap_err();
    assert!(matches!(err, Error::Argument(_)));

    // not even the token request went out
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_path_argument_is_rejected_locally() {
    let server = MockServer::start().await;
    let client = JamfClient::new(&server.uri(), "u", SecretString::from("p".to_owned())).unwrap();

    let err = client.dispatch(Call::new(&buildings::GET)).await.unwrap_err();
    assert!(matches!(&err, Error::Argument(m) if m.contains("'id'")), "got {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_operation_name() {
    let (_server, client) = setup().await;
    let err = client.call("launch_rockets", CallArgs::new()).await.unwrap_err();
    assert!(matches!(&err, Error::Argument(m) if m.contains("launch_rockets")));
}

// ── Query and path encoding ─────────────────────────────────────────

#[tokio::test]
async fn test_false_and_zero_are_transmitted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let params = Params::new()
        .with("page", 0)
        .with("force", false)
        .with("filter", ParamValue::Null)
        .with("sort", vec!["id:asc"]);
    client.dispatch(Call::new(&PING).query(params)).await.unwrap();

    let sent = api_requests(&server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url.query(), Some("page=0&force=false&sort=id%3Aasc"));
}

#[tokio::test]
async fn test_list_query_reaches_the_wire_in_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0, "results": [] })))
        .mount(&server)
        .await;

    let query = ListQuery::new()
        .page(0)
        .page_size(100)
        .sort("name:desc")
        .sort("id:asc")
        .filter("name==\"HQ\"");
    let page = client.list_buildings(&query).await.unwrap();
    assert_eq!(page["totalCount"], 0);

    let sent = api_requests(&server).await;
    assert_eq!(
        sent[0].url.query(),
        Some("page=0&page-size=100&sort=name%3Adesc&sort=id%3Aasc&filter=name%3D%3D%22HQ%22")
    );
}

#[tokio::test]
async fn test_repeated_get_issues_identical_urls() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0, "results": [] })))
        .expect(2)
        .mount(&server)
        .await;

    // page 0, page-size 50, sort ["id:asc"], filter unset
    let query = ListQuery::new().page(0).page_size(50).sort("id:asc");
    client.list_buildings(&query).await.unwrap();
    client.list_buildings(&query).await.unwrap();

    let sent = api_requests(&server).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].url, sent[1].url);
    assert!(
        sent[0].url.as_str().ends_with("/api/v1/buildings?page=0&page-size=50&sort=id%3Aasc"),
        "{}",
        sent[0].url
    );
}

#[tokio::test]
async fn test_dot_segments_never_reach_the_server() {
    let server = MockServer::start().await;
    let client = JamfClient::new(&server.uri(), "u", SecretString::from("p".to_owned())).unwrap();

    let err = client.delete_buildings(&IdArgs::id("..")).await.unwrap_err();
    assert!(matches!(&err, Error::Argument(m) if m.contains("'..'")), "got {err:?}");

    for bad in [".", ".."] {
        let err = client.get_building(bad).await.unwrap_err();
        assert!(matches!(err, Error::Argument(_)), "{bad}: got {err:?}");
    }
    let err = client.get_building("").await.unwrap_err();
    assert!(matches!(err, Error::Argument(_)), "got {err:?}");

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_path_arguments_are_segment_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.get_building("a b/c").await.unwrap();
    let sent = api_requests(&server).await;
    assert_eq!(sent[0].url.path(), "/api/v1/buildings/a%20b%2Fc");
}

#[tokio::test]
async fn test_schema_rejects_wrong_types() {
    let (server, client) = setup().await;

    let call = Call::new(&buildings::LIST).query(Params::new().with("page", "first"));
    let err = client.dispatch(call).await.unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
    assert!(api_requests(&server).await.is_empty());
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_exactly_one_authorization_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
        .mount(&server)
        .await;

    let call = Call::new(&buildings::GET)
        .arg("id", 1)
        .header(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_static("Bearer stolen"),
        )
        .header(
            reqwest::header::HeaderName::from_static("x-request-id"),
            reqwest::header::HeaderValue::from_static("abc"),
        );
    client.dispatch(call).await.unwrap();

    let sent = api_requests(&server).await;
    let auth: Vec<_> = sent[0].headers.get_all("authorization").iter().collect();
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0], "Bearer t1");
    assert_eq!(sent[0].headers.get("x-request-id").unwrap(), "abc");
    assert_eq!(sent[0].headers.get("accept").unwrap(), "application/json");
}

// ── Bulk delete convention ──────────────────────────────────────────

#[tokio::test]
async fn test_single_id_delete_message() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/buildings/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let msg = client.delete_buildings(&IdArgs::id(7)).await.unwrap();
    assert_eq!(msg, "Building 7 successfully deleted.");
}

#[tokio::test]
async fn test_many_ids_delete_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/buildings/delete-multiple"))
        .and(body_json(json!({ "ids": ["1", "2", "3"] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let msg = client.delete_buildings(&IdArgs::ids([1, 2, 3])).await.unwrap();
    assert_eq!(msg, "Building(s) 1, 2, 3 successfully deleted.");
}

#[tokio::test]
async fn test_call_by_name_with_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/categories/delete-multiple"))
        .and(body_json(json!({ "ids": ["4", "x"] })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let out = client
        .call(
            "delete_multiple_categories",
            CallArgs::new().target(IdArgs::ids([jamfly_api::Identifier::from(4), "x".into()])),
        )
        .await
        .unwrap();
    assert_eq!(out, Output::Message("Category(s) 4, x successfully deleted.".into()));
}

// ── Bodies ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_multipart_upload_sends_file_part() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("installer.pkg");
    std::fs::write(&file, b"xar!payload").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/packages/7/upload"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "7" })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.upload_package(7, &file).await.unwrap();
    assert_eq!(created["id"], "7");

    let sent = api_requests(&server).await;
    let content_type = sent[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");
    let body = String::from_utf8_lossy(&sent[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"installer.pkg\""));
    assert!(body.contains("xar!payload"));
}

#[tokio::test]
async fn test_form_body_is_urlencoded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "client-token",
            "expires_in": 59,
        })))
        .expect(2)
        .mount(&server)
        .await;

    let secret = SecretString::from("s3cr3t&=".to_owned());
    let grant = client.request_api_client_token("client-1", &secret).await.unwrap();
    assert_eq!(grant["expires_in"], 59);

    let sent = api_requests(&server).await;
    assert_eq!(
        String::from_utf8_lossy(&sent[0].body),
        "client_id=client-1&grant_type=client_credentials&client_secret=s3cr3t%26%3D"
    );

    // by name, with the pairs supplied by the caller
    let args = CallArgs::new().body(RequestBody::Form(vec![
        ("client_id".to_owned(), "client-2".to_owned()),
        ("grant_type".to_owned(), "client_credentials".to_owned()),
        ("client_secret".to_owned(), "x".to_owned()),
    ]));
    let out = client.call("request_api_client_token", args).await.unwrap();
    assert!(matches!(out, Output::Json(_)));

    let err = client
        .call("request_api_client_token", CallArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(&err, Error::Argument(m) if m.contains("form")), "got {err:?}");
}

#[tokio::test]
async fn test_csv_export_repeats_field_pairs() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/buildings/export"))
        .and(header("accept", "text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ID,Name\n1,HQ\n"))
        .mount(&server)
        .await;

    let query = ExportQuery::new().field("id", "ID").field("name", "Name");
    let csv = client.export_buildings(&query).await.unwrap();
    assert_eq!(csv, "ID,Name\n1,HQ\n");

    // Repeated key=value pairs; whether the server also accepts a
    // comma-joined form is not relied upon.
    let sent = api_requests(&server).await;
    assert_eq!(
        sent[0].url.query(),
        Some("export-fields=id&export-fields=name&export-labels=ID&export-labels=Name")
    );
}

#[tokio::test]
async fn test_history_note_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/buildings/3/history"))
        .and(body_json(json!({ "note": "moved racks" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "12" })))
        .expect(1)
        .mount(&server)
        .await;

    client.add_building_history_note(3, "moved racks").await.unwrap();
}

// ── Downloads ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_download_uses_content_disposition_name() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/computers-inventory/5/attachments/9"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"../../etc/report.pdf\"")
                .set_body_bytes(b"%PDF-1.7".to_vec()),
        )
        .mount(&server)
        .await;

    let saved = client
        .download_computer_attachment(5, 9, Some(dir.path()))
        .await
        .unwrap();
    assert_eq!(saved, dir.path().join("report.pdf"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.7");
}

#[tokio::test]
async fn test_download_falls_back_to_url_segment() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/pki/certificate-authority/active/der"))
        .and(header("accept", "application/pkix-cert"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x30, 0x82]))
        .mount(&server)
        .await;

    let saved = client
        .download_active_certificate_authority_der(Some(dir.path()))
        .await
        .unwrap();
    assert_eq!(saved, dir.path().join("der"));
    assert_eq!(std::fs::read(&saved).unwrap(), vec![0x30, 0x82]);
}

// ── Response classification ─────────────────────────────────────────

#[tokio::test]
async fn test_error_statuses_map_to_kinds() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"httpStatus\":404}"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/buildings"))
        .respond_with(ResponseTemplate::new(409).set_body_string("DUPLICATE_FIELD name"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/500"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/400"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad filter"))
        .mount(&server)
        .await;

    let err = client.get_building(99).await.unwrap_err();
    assert!(matches!(&err, Error::NotFound { path, .. } if path == "/api/v1/buildings/99"), "got {err:?}");
    assert!(err.is_not_found());

    let err = client.create_building(json!({ "name": "HQ" })).await.unwrap_err();
    assert!(matches!(&err, Error::Conflict { body } if body.contains("DUPLICATE_FIELD")), "got {err:?}");

    let err = client.get_building(500).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 503, .. }), "got {err:?}");
    assert!(err.is_transient());

    let err = client.get_building(400).await.unwrap_err();
    assert!(matches!(&err, Error::Client { status: 400, body } if body == "bad filter"), "got {err:?}");

    // server errors are never retried
    let hits = api_requests(&server)
        .await
        .iter()
        .filter(|r| r.url.path() == "/api/v1/buildings/500")
        .count();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client.get_building(1).await.unwrap_err();
    assert!(
        matches!(&err, Error::ResponseDecode { body, .. } if body.starts_with("<html>")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_no_content_decodes_as_null() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/buildings/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client.update_building(1, json!({ "name": "HQ" })).await.unwrap();
    assert_eq!(value, serde_json::Value::Null);
}

// ── Redirects ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_redirects_followed_only_for_get() {
    let (server, client) = setup().await;
    let moved = format!("{}/api/v1/buildings/2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/1"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", moved.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "2" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/buildings"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", moved.as_str()))
        .mount(&server)
        .await;

    let building = client.get_building(1).await.unwrap();
    assert_eq!(building["id"], "2");

    let err = client.create_building(json!({ "name": "HQ" })).await.unwrap_err();
    assert_eq!(err.status(), Some(302));
    let followed = api_requests(&server)
        .await
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/api/v1/buildings/2")
        .count();
    assert_eq!(followed, 0);
}

// ── Observer ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_observer_sees_every_attempt() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/buildings/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
        .mount(&server)
        .await;

    let seen: Arc<Mutex<Vec<(String, Option<u16>, u8)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let client = JamfClient::builder(&server.uri(), "u", SecretString::from("p".to_owned()))
        .observer(move |ex: &Exchange<'_>| {
            sink.lock().unwrap().push((
                ex.operation.to_owned(),
                ex.status.map(|s| s.as_u16()),
                ex.attempt,
            ));
        })
        .build()
        .unwrap();

    client.get_building(1).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("auth.token".to_owned(), Some(200), 1),
            ("get_building".to_owned(), Some(200), 1),
        ]
    );
}
