// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use datadesk_api::Client;
use datadesk_core::{DomainKind, Role};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_status_code(status).with_header(
        Header::from_bytes("Content-Type", "application/json").expect("valid content type header"),
    )
}

#[test]
fn ping_error_contains_actionable_remediation() {
    let client = Client::new("http://127.0.0.1:1", None, Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .ping()
        .expect_err("ping should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("api.base_url"));
}

#[test]
fn ping_accepts_healthy_backend() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/health");
        request
            .respond(json_response(r#"{"status":"healthy"}"#, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, None, Duration::from_secs(1))?;
    client.ping()?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn current_user_sends_bearer_token() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/v1/auth/me");
        let authorization = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Authorization"))
            .map(|header| header.value.as_str().to_owned());
        assert_eq!(authorization.as_deref(), Some("Bearer secret-token"));

        let body = r#"{
            "success": true,
            "message": "ok",
            "data": {"email": "rori@example.com", "name": "Rori", "role": "admin"}
        }"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Some("secret-token"), Duration::from_secs(1))?;
    let user = client.current_user()?;
    assert_eq!(user.email, "rori@example.com");
    assert_eq!(user.role, Role::Admin);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_records_follows_pagination() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let pages = [
            r#"{
                "success": true,
                "message": "page one",
                "data": [
                    {"id": "LL", "name": "Leaf Life", "status": "Active", "region": "AB"},
                    {"id": "PL", "name": "Plantlife", "status": "Active", "region": "AB"}
                ],
                "total": 3,
                "page": 1,
                "page_size": 2
            }"#,
            r#"{
                "success": true,
                "message": "page two",
                "data": [
                    {"id": "TRN", "name": "True North", "status": "Inactive", "region": "ON"}
                ],
                "total": 3,
                "page": 2,
                "page_size": 2
            }"#,
        ];
        for (index, body) in pages.iter().enumerate() {
            let request = server.recv().expect("request expected");
            assert!(
                request.url().starts_with("/api/v1/partnerships?"),
                "unexpected url {}",
                request.url()
            );
            assert!(request.url().contains(&format!("page={}", index + 1)));
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, None, Duration::from_secs(1))?;
    let records = client.list_records(DomainKind::Partnerships)?;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].display("name"), "Leaf Life");
    assert_eq!(records[2].display("name"), "True North");
    assert!(records[0].get("tier").is_none());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_records_surfaces_server_detail() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"detail":"Insufficient permissions"}"#,
                403,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, None, Duration::from_secs(1))?;
    let error = client
        .list_records(DomainKind::Customers)
        .expect_err("403 should fail");
    let message = error.to_string();
    assert!(message.contains("403"));
    assert!(message.contains("Insufficient permissions"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_records_handles_null_fields() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = r#"{
            "success": true,
            "message": "ok",
            "data": [
                {"id": "LL", "name": "Leaf Life", "tier": null, "point_contact": null}
            ],
            "total": 1,
            "page": 1,
            "page_size": 500
        }"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, None, Duration::from_secs(1))?;
    let records = client.list_records(DomainKind::Partnerships)?;
    assert_eq!(records.len(), 1);
    assert!(
        records[0]
            .get("tier")
            .is_some_and(|value| value.is_null())
    );

    handle.join().expect("server thread should join");
    Ok(())
}
