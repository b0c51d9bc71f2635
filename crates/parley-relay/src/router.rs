//! Message routing: broadcast vs. direct delivery.
//!
//! Given a chat payload and the sender's identity, decide who receives
//! what. Pure over the registry — no channels, no I/O — so every routing
//! rule is testable with a registry built by hand.

use parley_presence::PresenceRegistry;
use parley_protocol::{ChatPayload, PublicPayload, Recipient, ServerEvent};
use parley_transport::ConnectionId;

/// The recipient sentinel that means "everyone", same as no recipient.
const GENERAL: &str = "general";

/// Computes the deliveries for one chat payload from a registered sender.
///
/// - Text without a recipient (or addressed to `"general"`) becomes a
///   `public-message` `"{name}: {body}"` to everyone, sender included.
/// - Text addressed to a known name becomes a `private-message` to the
///   recipient plus a mirrored copy to the sender, so the sender can
///   confirm delivery.
/// - Text addressed to an unknown name becomes a single `chat-error` to
///   the sender; nothing is delivered elsewhere.
/// - A media share is always a public broadcast, whatever the recipient
///   field said.
pub fn route_chat(
    registry: &PresenceRegistry,
    sender: ConnectionId,
    sender_name: &str,
    payload: ChatPayload,
) -> Vec<(Recipient, ServerEvent)> {
    match payload {
        ChatPayload::Media { video_id } => {
            vec![(
                Recipient::All,
                ServerEvent::PublicMessage(PublicPayload::Media {
                    video_id,
                    sender: sender_name.to_string(),
                }),
            )]
        }

        ChatPayload::Text { body, recipient } => {
            match recipient.as_deref() {
                None | Some(GENERAL) => {
                    vec![(
                        Recipient::All,
                        ServerEvent::PublicMessage(PublicPayload::Text {
                            text: format!("{sender_name}: {body}"),
                        }),
                    )]
                }

                Some(target) => match registry.lookup(target) {
                    None => vec![(
                        Recipient::Conn(sender),
                        ServerEvent::ChatError {
                            message: format!(
                                "recipient \"{target}\" is not connected"
                            ),
                        },
                    )],
                    Some(target_conn) => {
                        let message = ServerEvent::PrivateMessage {
                            text: body,
                            sender: sender_name.to_string(),
                        };
                        vec![
                            (Recipient::Conn(target_conn), message.clone()),
                            // Mirrored copy so the sender sees delivery.
                            (Recipient::Conn(sender), message),
                        ]
                    }
                },
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    /// Registry with alice on conn 1 and bob on conn 2.
    fn two_user_registry() -> PresenceRegistry {
        let mut registry = PresenceRegistry::new();
        registry.register("alice", conn(1)).unwrap();
        registry.register("bob", conn(2)).unwrap();
        registry
    }

    #[test]
    fn test_route_chat_no_recipient_broadcasts_formatted_line() {
        let registry = two_user_registry();

        let deliveries = route_chat(
            &registry,
            conn(1),
            "alice",
            ChatPayload::Text {
                body: "hello all".into(),
                recipient: None,
            },
        );

        assert_eq!(
            deliveries,
            vec![(
                Recipient::All,
                ServerEvent::PublicMessage(PublicPayload::Text {
                    text: "alice: hello all".into(),
                }),
            )]
        );
    }

    #[test]
    fn test_route_chat_general_sentinel_broadcasts() {
        let registry = two_user_registry();

        let deliveries = route_chat(
            &registry,
            conn(1),
            "alice",
            ChatPayload::Text {
                body: "hi".into(),
                recipient: Some("general".into()),
            },
        );

        assert!(matches!(deliveries[0].0, Recipient::All));
        assert_eq!(deliveries.len(), 1);
    }

    #[test]
    fn test_route_chat_known_recipient_delivers_twice() {
        let registry = two_user_registry();

        let deliveries = route_chat(
            &registry,
            conn(1),
            "alice",
            ChatPayload::Text {
                body: "psst".into(),
                recipient: Some("bob".into()),
            },
        );

        let expected = ServerEvent::PrivateMessage {
            text: "psst".into(),
            sender: "alice".into(),
        };
        assert_eq!(
            deliveries,
            vec![
                (Recipient::Conn(conn(2)), expected.clone()),
                (Recipient::Conn(conn(1)), expected),
            ]
        );
    }

    #[test]
    fn test_route_chat_unknown_recipient_errors_sender_only() {
        let registry = two_user_registry();

        let deliveries = route_chat(
            &registry,
            conn(1),
            "alice",
            ChatPayload::Text {
                body: "hello?".into(),
                recipient: Some("ghost".into()),
            },
        );

        assert_eq!(deliveries.len(), 1);
        let (recipient, event) = &deliveries[0];
        assert_eq!(*recipient, Recipient::Conn(conn(1)));
        assert!(matches!(
            event,
            ServerEvent::ChatError { message } if message.contains("ghost")
        ));
    }

    #[test]
    fn test_route_chat_media_share_ignores_recipient_field() {
        // The wire can't carry a recipient alongside videoId, but the rule
        // is payload-level: a share is a broadcast no matter what.
        let registry = two_user_registry();

        let deliveries = route_chat(
            &registry,
            conn(2),
            "bob",
            ChatPayload::Media {
                video_id: "abc123".into(),
            },
        );

        assert_eq!(
            deliveries,
            vec![(
                Recipient::All,
                ServerEvent::PublicMessage(PublicPayload::Media {
                    video_id: "abc123".into(),
                    sender: "bob".into(),
                }),
            )]
        );
    }

    #[test]
    fn test_route_chat_private_to_self_mirrors_twice_to_sender() {
        let registry = two_user_registry();

        let deliveries = route_chat(
            &registry,
            conn(1),
            "alice",
            ChatPayload::Text {
                body: "note to self".into(),
                recipient: Some("alice".into()),
            },
        );

        // Both the delivery and the mirror land on the sender.
        assert_eq!(deliveries.len(), 2);
        for (recipient, _) in &deliveries {
            assert_eq!(*recipient, Recipient::Conn(conn(1)));
        }
    }
}
