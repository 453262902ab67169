// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn round_trips_a_request_through_the_length_prefixed_wire_format() {
    let request = Request::FileIssue {
        title: "fix the thing".to_string(),
        body: Some("it is broken".to_string()),
        labels: vec!["bug".to_string()],
    };
    let bytes = encode(&request).unwrap();
    let mut wire = std::io::Cursor::new(Vec::new());
    write_message(&mut wire, &bytes).await.unwrap();

    let mut cursor = std::io::Cursor::new(wire.into_inner());
    let read_back = read_message(&mut cursor).await.unwrap();
    let decoded: Request = decode(&read_back).unwrap();
    assert_eq!(decoded, request);
}

#[tokio::test]
async fn read_message_reports_connection_closed_on_immediate_eof() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn oversized_length_prefix_is_rejected_before_allocating() {
    let mut wire = Vec::new();
    wire.extend_from_slice(&((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes());
    let mut cursor = std::io::Cursor::new(wire);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
}

#[test]
fn request_verb_tag_uses_the_documented_field_name() {
    let json = serde_json::to_value(Request::Pause).unwrap();
    assert_eq!(json["verb"], "Pause");
}
