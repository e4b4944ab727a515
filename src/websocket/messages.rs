//! Wire envelopes of the channel protocol.
//!
//! Outbound: `connect` / `disconnect` requests that open and close a
//! channel subscription. Inbound: `channel` messages carrying a post for
//! an open subscription. Everything here is pure; no I/O.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::models::{FeedKind, Post, SubscriptionId};
use crate::traits::Frame;

/// Outgoing requests to the streaming server
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "body", rename_all = "lowercase")]
pub enum OutgoingMessage {
    Connect(ChannelBody),
    Disconnect(ChannelBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelBody {
    /// Channel wire name; omitted on `disconnect`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'static str>,
    pub id: String,
}

/// A post delivered for a subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPost {
    /// Subscription id the server tagged the post with
    pub channel_id: String,
    pub post: Post,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    body: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChannelEnvelope {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    body: serde_json::Value,
}

/// `{"type":"connect","body":{"channel":<wire name>,"id":<id>}}`
pub fn encode_subscribe(feed: FeedKind, id: &SubscriptionId) -> String {
    encode(&OutgoingMessage::Connect(ChannelBody {
        channel: Some(feed.wire_name()),
        id: id.to_string(),
    }))
}

/// `{"type":"disconnect","body":{"id":<id>}}`
pub fn encode_unsubscribe(id: &SubscriptionId) -> String {
    encode(&OutgoingMessage::Disconnect(ChannelBody {
        channel: None,
        id: id.to_string(),
    }))
}

/// Keepalive answer carrying the ping's payload back.
pub fn encode_pong(payload: &[u8]) -> Frame {
    Frame::Pong(payload.to_vec())
}

fn encode(message: &OutgoingMessage) -> String {
    // Serializing these plain structs into a String cannot fail.
    serde_json::to_string(message).unwrap_or_default()
}

/// Decode an inbound text frame into a post notification.
///
/// Anything other than `{"type":"channel","body":{"type":"note",...}}`
/// is a [`DecodeError`]; callers log and drop it.
pub fn decode_inbound(text: &str) -> Result<ChannelPost, DecodeError> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if envelope.kind != "channel" {
        return Err(DecodeError::Unrecognized {
            kind: envelope.kind,
        });
    }

    let channel: ChannelEnvelope = serde_json::from_value(envelope.body)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if channel.kind != "note" {
        return Err(DecodeError::Unrecognized {
            kind: format!("channel/{}", channel.kind),
        });
    }

    let post: Post = serde_json::from_value(channel.body)
        .map_err(|e| DecodeError::InvalidPost(e.to_string()))?;
    Ok(ChannelPost {
        channel_id: channel.id,
        post,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_frame(channel_id: &str, post_id: &str) -> String {
        format!(
            r#"{{"type":"channel","body":{{"id":"{}","type":"note","body":{{
                "id":"{}","createdAt":"2024-05-01T12:00:00.000Z",
                "user":{{"id":"u1","name":"Alice","username":"alice"}},
                "text":"hi"}}}}}}"#,
            channel_id, post_id
        )
    }

    #[test]
    fn test_encode_subscribe_envelope() {
        let id = SubscriptionId::generate();
        let json = encode_subscribe(FeedKind::Local, &id);
        assert_eq!(
            json,
            format!(
                r#"{{"type":"connect","body":{{"channel":"localTimeline","id":"{}"}}}}"#,
                id
            )
        );
    }

    #[test]
    fn test_encode_unsubscribe_omits_channel() {
        let id = SubscriptionId::generate();
        let value: serde_json::Value = serde_json::from_str(&encode_unsubscribe(&id)).unwrap();
        assert_eq!(value["type"], "disconnect");
        assert_eq!(value["body"]["id"], id.to_string());
        assert!(value["body"].get("channel").is_none());
    }

    #[test]
    fn test_decode_note() {
        let decoded = decode_inbound(&note_frame("chan-1", "p1")).unwrap();
        assert_eq!(decoded.channel_id, "chan-1");
        assert_eq!(decoded.post.id, "p1");
        assert_eq!(decoded.post.body(), "hi");
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(matches!(
            decode_inbound("{not json"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_unrecognized_types() {
        assert_eq!(
            decode_inbound(r#"{"type":"emojiAdded","body":{}}"#),
            Err(DecodeError::Unrecognized {
                kind: "emojiAdded".to_string()
            })
        );
        let reply = r#"{"type":"channel","body":{"id":"c","type":"mention","body":{}}}"#;
        assert_eq!(
            decode_inbound(reply),
            Err(DecodeError::Unrecognized {
                kind: "channel/mention".to_string()
            })
        );
    }

    #[test]
    fn test_decode_bad_post_body() {
        let frame = r#"{"type":"channel","body":{"id":"c","type":"note","body":{"id":"x"}}}"#;
        assert!(matches!(
            decode_inbound(frame),
            Err(DecodeError::InvalidPost(_))
        ));
    }

    #[test]
    fn test_pong_echoes_payload() {
        assert_eq!(encode_pong(b"abc"), Frame::Pong(b"abc".to_vec()));
    }
}
