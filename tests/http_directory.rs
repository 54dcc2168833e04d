//! Runs `HttpDirectory` against a local listener serving canned responses.

use primera_pagina::application::{Directory, DirectoryRequest, FetchCompletion, FetchState};
use primera_pagina::infrastructure::{DirectoryError, DirectorySource, HttpDirectory};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const USERS: &str = r#"[
  {"id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz", "phone": "1-770-736-8031 x56442"},
  {"id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "Shanna@melissa.tv", "phone": "010-692-6593 x09125"}
]"#;

const USER_1: &str =
    r#"{"id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz", "phone": "1-770-736-8031 x56442", "website": "hildegard.org"}"#;

fn route(path: &str) -> (u16, &'static str) {
    match path {
        "/ok/users" => (200, USERS),
        "/ok/users/1" => (200, USER_1),
        "/broken/users" => (500, r#"{"error":"boom"}"#),
        "/garbage/users" => (200, "<html>not json</html>"),
        _ => (404, "{}"),
    }
}

/// Serves `route` over plain HTTP/1.1, one response per connection.
async fn serve() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = route(&path);
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Internal Server Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

fn source(addr: SocketAddr, prefix: &str) -> HttpDirectory {
    HttpDirectory::new(&format!("http://{addr}/{prefix}"), None).unwrap()
}

#[tokio::test]
async fn fetches_collection_and_ignores_extra_fields() {
    let addr = serve().await;
    let users = source(addr, "ok").fetch_users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Leanne Graham");
    assert_eq!(users[1].email, "Shanna@melissa.tv");
}

#[tokio::test]
async fn fetches_single_user() {
    let addr = serve().await;
    let user = source(addr, "ok").fetch_user(1).await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.phone, "1-770-736-8031 x56442");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let addr = serve().await;
    let result = source(addr, "ok").fetch_user(999).await;

    assert_eq!(result, Err(DirectoryError::ItemStatus(404)));
}

#[tokio::test]
async fn server_error_becomes_failure_state() {
    let addr = serve().await;
    let directory_source = source(addr, "broken");
    let mut directory = Directory::new();
    let token = directory.begin(DirectoryRequest::Collection);

    let outcome = DirectoryRequest::Collection.run(&directory_source).await;
    assert!(directory.complete(FetchCompletion { token, outcome }));

    match directory.list() {
        FetchState::Failure(message) => assert_eq!(message, "Error al cargar (HTTP 500)"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let addr = serve().await;
    let result = source(addr, "garbage").fetch_users().await;

    assert!(matches!(result, Err(DirectoryError::Decode(_))));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = source(addr, "ok").fetch_users().await;

    match result {
        Err(error @ DirectoryError::Network(_)) => assert!(error.to_string().starts_with("Error de red")),
        other => panic!("expected network error, got {other:?}"),
    }
}
