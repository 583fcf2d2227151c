//! Service fixtures
//!
//! Everything here runs on `MemoryMessageStore`, so no database is needed.

use std::sync::Arc;
use tokio::sync::mpsc::Receiver;
use xfchat::backend::chat::{ChatService, MemoryMessageStore};
use xfchat::backend::presence::ConnectionHandle;
use xfchat::backend::realtime::Session;
use xfchat::backend::routes::create_router;
use xfchat::backend::server::{build_state, AppState, ServerConfig};
use xfchat::shared::{ConversationPreview, ServerEvent};

use super::auth_helpers::TEST_SECRET;

pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .jwt_secret(TEST_SECRET)
        .build()
        .expect("Test configuration should be valid")
}

/// App state over a fresh in-memory store
pub fn memory_state() -> (AppState, Arc<MemoryMessageStore>) {
    let store = Arc::new(MemoryMessageStore::new());
    (build_state(test_config(), store.clone()), store)
}

pub fn memory_service() -> (ChatService, Arc<MemoryMessageStore>) {
    let (state, store) = memory_state();
    (state.chat, store)
}

pub fn test_router() -> axum::Router {
    let (state, _) = memory_state();
    create_router(state)
}

/// A session plus the receiving end of its outbound queue
pub struct Connected {
    pub session: Session,
    pub rx: Receiver<ServerEvent>,
    /// Previews delivered on admission
    pub previews: Vec<ConversationPreview>,
}

impl Connected {
    pub async fn next_event(&mut self) -> ServerEvent {
        tokio::time::timeout(std::time::Duration::from_secs(1), self.rx.recv())
            .await
            .expect("Timed out waiting for an event")
            .expect("Outbound queue closed")
    }

    pub fn assert_idle(&mut self) {
        assert!(self.rx.try_recv().is_err(), "Unexpected event queued");
    }
}

/// Open a session for `user` and consume the opening preview list
pub async fn connect(service: &ChatService, user: &str) -> Connected {
    let (handle, rx) = ConnectionHandle::channel(32);
    let session = Session::open(service.clone(), user.into(), handle).await;

    let mut connected = Connected {
        session,
        rx,
        previews: Vec::new(),
    };
    match connected.next_event().await {
        ServerEvent::PreviewList { previews } => connected.previews = previews,
        other => panic!("Expected previewList, got {:?}", other),
    }
    connected
}
