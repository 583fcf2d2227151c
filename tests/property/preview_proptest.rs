//! Property-based tests for conversation previews
//!
//! Random message sets between a handful of users; previews must hold one
//! row per peer, newest conversation first, each row showing the latest
//! message of that conversation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use xfchat::backend::chat::aggregation::normalize_previews;
use xfchat::backend::chat::{ChatService, MemoryMessageStore, MessageStore};
use xfchat::backend::presence::PresenceRegistry;
use xfchat::shared::{ConversationPreview, NewMessage, UserId};

const VIEWER: &str = "u0";

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
}

fn message_strategy() -> impl Strategy<Value = (u8, u8, i64)> {
    (0u8..5, 0u8..5, 0i64..40).prop_filter("no self messages", |(from, to, _)| from != to)
}

fn previews_for(seed: &[(u8, u8, i64)]) -> Vec<ConversationPreview> {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let store = Arc::new(MemoryMessageStore::new());
        for (i, (from, to, seconds)) in seed.iter().enumerate() {
            store
                .persist_message(NewMessage {
                    sender_id: UserId::from(format!("u{}", from)),
                    recipient_id: UserId::from(format!("u{}", to)),
                    text: format!("m{}", i),
                    sent_at: at(*seconds),
                })
                .await
                .unwrap();
        }
        let service = ChatService::new(
            Arc::new(PresenceRegistry::new()),
            store,
            Default::default(),
        );
        service.previews(&VIEWER.into()).await.unwrap()
    })
}

proptest! {
    #[test]
    fn test_previews_unique_sorted_and_latest(seed in prop::collection::vec(message_strategy(), 0..40)) {
        let previews = previews_for(&seed);

        let peers: HashSet<_> = previews.iter().map(|p| p.peer_id.clone()).collect();
        prop_assert_eq!(peers.len(), previews.len());

        for pair in previews.windows(2) {
            prop_assert!(
                pair[0].last_sent_at > pair[1].last_sent_at
                    || (pair[0].last_sent_at == pair[1].last_sent_at && pair[0].peer_id < pair[1].peer_id)
            );
        }

        let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
        for (from, to, seconds) in &seed {
            let peer = match (*from, *to) {
                (0, other) | (other, 0) => format!("u{}", other),
                _ => continue,
            };
            let entry = latest.entry(peer).or_insert(at(*seconds));
            if at(*seconds) > *entry {
                *entry = at(*seconds);
            }
        }

        prop_assert_eq!(latest.len(), previews.len());
        for preview in &previews {
            prop_assert_eq!(Some(&preview.last_sent_at), latest.get(preview.peer_id.as_str()));
            prop_assert!(preview.peer_id != UserId::from(VIEWER));
        }
    }

    #[test]
    fn test_previews_repeatable(seed in prop::collection::vec(message_strategy(), 0..20)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (first, second) = runtime.block_on(async {
            let store = Arc::new(MemoryMessageStore::new());
            for (from, to, seconds) in &seed {
                store
                    .persist_message(NewMessage {
                        sender_id: UserId::from(format!("u{}", from)),
                        recipient_id: UserId::from(format!("u{}", to)),
                        text: "x".to_string(),
                        sent_at: at(*seconds),
                    })
                    .await
                    .unwrap();
            }
            let service = ChatService::new(Arc::new(PresenceRegistry::new()), store, Default::default());
            let first = service.previews(&VIEWER.into()).await.unwrap();
            let second = service.previews(&VIEWER.into()).await.unwrap();
            (first, second)
        });

        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_is_idempotent(rows in prop::collection::vec((0u8..6, 0i64..20), 0..30)) {
        let rows: Vec<ConversationPreview> = rows
            .into_iter()
            .map(|(peer, seconds)| ConversationPreview {
                peer_id: UserId::from(format!("u{}", peer)),
                last_message: format!("at {}", seconds),
                last_sender_id: UserId::from(format!("u{}", peer)),
                last_sent_at: at(seconds),
            })
            .collect();

        let once = normalize_previews(rows);
        let twice = normalize_previews(once.clone());
        prop_assert_eq!(once, twice);
    }
}
