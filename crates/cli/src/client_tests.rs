// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use noface_daemon::protocol;
use tokio::net::UnixListener;

#[tokio::test]
async fn connect_fails_when_no_daemon_is_listening() {
    let dir = tempfile::tempdir().unwrap();
    let result = DaemonClient::connect(dir.path()).await;
    assert!(matches!(result, Err(ClientError::DaemonNotRunning)));
}

#[tokio::test]
async fn send_round_trips_a_request_through_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let config = lifecycle::Config::load(dir.path());
    std::fs::create_dir_all(&config.noface_dir).unwrap();

    let listener = UnixListener::bind(&config.socket_path).unwrap();
    tokio::spawn(async move {
        let (mut stream, _addr) = listener.accept().await.unwrap();
        let frame = protocol::read_message(&mut stream).await.unwrap();
        let request: Request = protocol::decode(&frame).unwrap();
        assert!(matches!(request, Request::Status));
        let response = protocol::encode(&Response::Ack).unwrap();
        protocol::write_message(&mut stream, &response).await.unwrap();
    });

    let client = DaemonClient::connect(dir.path()).await.unwrap();
    let response = client.send(&Request::Status).await.unwrap();
    assert_eq!(response, Response::Ack);
}
