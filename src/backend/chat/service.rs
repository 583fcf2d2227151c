/**
 * Chat Service
 *
 * `ChatService` ties the presence registry to the durable store. Its
 * operations are split by concern:
 *
 * - `pipeline` - `send`: validate, persist, then best-effort push
 * - `aggregation` - `previews` and `history`
 * - `signaling` - `signal`: typing indicators for online targets
 *
 * The service is cheap to clone; clones share the same registry and store.
 */

use crate::backend::chat::store::MessageStore;
use crate::backend::presence::PresenceRegistry;
use std::sync::Arc;

/// Input and paging bounds applied by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLimits {
    /// Maximum message length in characters
    pub max_message_length: usize,
    /// History page size used when the client does not ask for one
    pub default_page_size: u32,
    /// Upper bound on any history page
    pub max_page_size: u32,
}

impl Default for ChatLimits {
    fn default() -> Self {
        Self {
            max_message_length: 10_000,
            default_page_size: 50,
            max_page_size: 100,
        }
    }
}

#[derive(Clone)]
pub struct ChatService {
    pub(super) registry: Arc<PresenceRegistry>,
    pub(super) store: Arc<dyn MessageStore>,
    pub(super) limits: ChatLimits,
}

impl ChatService {
    pub fn new(
        registry: Arc<PresenceRegistry>,
        store: Arc<dyn MessageStore>,
        limits: ChatLimits,
    ) -> Self {
        Self {
            registry,
            store,
            limits,
        }
    }

    pub fn registry(&self) -> &Arc<PresenceRegistry> {
        &self.registry
    }

    pub fn limits(&self) -> ChatLimits {
        self.limits
    }
}
