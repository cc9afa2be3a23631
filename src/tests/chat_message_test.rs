use pretty_assertions::assert_eq;

use super::sample_message;
use crate::{
    chat::{
        ChatMessage, ChatMessageType, FrameError, Notification, NotificationPriority,
        DEFAULT_SESSION_ID,
    },
    user::http_request::SendMessageRequest,
};

#[test]
fn test_for_client_defaults() {
    let msg = ChatMessage::from_client_frame(
        r#"{"session_id":"s1","user_id":"u1","username":"alice","message":"hi"}"#,
    )
    .unwrap();

    assert_eq!(msg.message_type, ChatMessageType::Text);
    assert_eq!(msg.attachments, Vec::<String>::new());
    assert!(!msg.message_id.is_empty());
    assert!(msg.timestamp.ends_with("+00:00"));
}

#[test]
fn test_for_null_and_empty_fields() {
    let msg = ChatMessage::from_client_frame(
        r#"{"message_id":"","session_id":"s1","user_id":"u1","username":"alice",
            "message":"hi","message_type":null,"timestamp":"","attachments":null}"#,
    )
    .unwrap();

    assert_eq!(msg.message_type, ChatMessageType::Text);
    assert!(!msg.message_id.is_empty());
    assert!(!msg.timestamp.is_empty());
    assert!(msg.attachments.is_empty());
}

#[test]
fn test_for_client_fields_kept() {
    let msg = ChatMessage::from_client_frame(
        r#"{"message_id":"m-1","session_id":"s1","user_id":"u1","username":"alice",
            "message":"look","message_type":"image","timestamp":"2024-01-01T00:00:00Z",
            "attachments":["a.png"]}"#,
    )
    .unwrap();

    assert_eq!(msg.message_id, "m-1");
    assert_eq!(msg.message_type, ChatMessageType::Image);
    assert_eq!(msg.timestamp, "2024-01-01T00:00:00Z");
    assert_eq!(msg.attachments, vec!["a.png".to_string()]);
}

#[test]
fn test_for_invalid_json() {
    assert_eq!(
        ChatMessage::from_client_frame("{not json"),
        Err(FrameError::InvalidJson)
    );
    assert_eq!(FrameError::InvalidJson.to_string(), "invalid json");
}

#[test]
fn test_for_invalid_message_type() {
    let err = ChatMessage::from_client_frame(
        r#"{"session_id":"s1","user_id":"u1","username":"alice","message":"hi","message_type":"video"}"#,
    )
    .unwrap_err();

    match err {
        FrameError::InvalidChatMessage(detail) => assert!(detail.contains("video")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_for_missing_field_and_non_object() {
    let err = ChatMessage::from_client_frame(r#"{"session_id":"s1","user_id":"u1","message":"hi"}"#)
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid ChatMessage: "));
    assert!(err.to_string().contains("username"));

    let err = ChatMessage::from_client_frame("[1, 2]").unwrap_err();
    assert_eq!(
        err,
        FrameError::InvalidChatMessage("expected a JSON object".to_string())
    );
}

#[test]
fn test_for_derive_notification() {
    let msg = sample_message("u1", "alice", "hi");
    let notification = Notification::derive_from(&msg);

    assert_eq!(notification.user_id, "u1");
    assert_eq!(notification.r#type, "message");
    assert_eq!(notification.title, "New message from alice");
    assert_eq!(notification.content, "hi");
    assert_eq!(notification.timestamp, msg.timestamp);
    assert_eq!(notification.priority, NotificationPriority::Normal);
    assert!(!notification.notification_id.is_empty());
    assert_ne!(
        notification.notification_id,
        Notification::derive_from(&msg).notification_id
    );
}

#[test]
fn test_for_notification_content_truncated_by_chars() {
    let long: String = std::iter::repeat('é').take(300).collect();
    let notification = Notification::derive_from(&sample_message("u1", "alice", &long));

    assert_eq!(notification.content.chars().count(), 200);
    assert!(long.starts_with(&notification.content));
}

#[test]
fn test_for_send_message_request() {
    let request: SendMessageRequest = serde_json::from_str(
        r#"{"user_id":"u1","username":"alice","message":"hi","timestamp":"2024-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    let msg = request.into_chat_message();
    assert_eq!(msg.session_id, DEFAULT_SESSION_ID);
    assert_eq!(msg.message_type, ChatMessageType::Text);
    assert_eq!(msg.timestamp, "2024-01-01T00:00:00Z");

    let request: SendMessageRequest =
        serde_json::from_str(r#"{"user_id":"u1","username":"alice","message":"hi","timestamp":""}"#)
            .unwrap();
    assert!(!request.into_chat_message().timestamp.is_empty());
}
