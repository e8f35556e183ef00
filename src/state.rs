use crate::chat::{ChatBridge, ChatSettings, Transcript};
use crate::journal::JournalStore;
use crate::storage::FileStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<Mutex<JournalStore<FileStorage>>>,
    pub transcript: Arc<Mutex<Transcript>>,
    pub chat: Arc<ChatBridge>,
}

impl AppState {
    pub fn new(journal: JournalStore<FileStorage>, chat: ChatSettings) -> Self {
        Self {
            journal: Arc::new(Mutex::new(journal)),
            transcript: Arc::new(Mutex::new(Transcript::new())),
            chat: Arc::new(ChatBridge::new(chat)),
        }
    }
}
