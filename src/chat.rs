use crate::models::{ChatMessage, Sender};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::{
    env,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_REFERER: &str = "http://localhost:8080";
pub const APP_TITLE: &str = "Emotional Support Chat";

pub const GREETING: &str = "Hi there! I’m here to listen. How are you feeling today?";
pub const SYSTEM_PROMPT: &str = "You are a kind and supportive emotional assistant. Reply gently.";
pub const FALLBACK_REPLY: &str = "Oops! I had trouble replying. Try again later.";
pub const MISSING_KEY_REPLY: &str = "API key is missing. Please check configuration.";

/// Where the API key comes from. `Env` is looked up on every call, so a key
/// exported after startup is picked up.
#[derive(Debug, Clone)]
pub enum Credential {
    Env(String),
    Static(String),
}

impl Credential {
    fn resolve(&self) -> Option<String> {
        let key = match self {
            Credential::Env(var) => env::var(var).ok()?,
            Credential::Static(key) => key.clone(),
        };
        (!key.trim().is_empty()).then_some(key)
    }
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub endpoint: String,
    pub model: String,
    pub credential: Credential,
    pub referer: String,
    pub title: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            credential: Credential::Env(DEFAULT_API_KEY_VAR.to_string()),
            referer: DEFAULT_REFERER.to_string(),
            title: APP_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API key is missing")]
    MissingCredential,
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("completion response has no choices")]
    NoChoices,
}

#[derive(Debug, Error)]
#[error("a chat reply is already in flight")]
pub struct ChatBusy;

/// Ordered, append-only conversation. Always opens with [`GREETING`].
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Forwards a transcript to the completions endpoint. At most one request is
/// outstanding at a time.
pub struct ChatBridge {
    http: Client,
    settings: ChatSettings,
    in_flight: AtomicBool,
}

impl ChatBridge {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Appends the user's message and then exactly one assistant message: the
    /// model's reply, or a fixed fallback if the call could not be completed.
    /// Blank text appends nothing. Fails only when another send is running,
    /// in which case the transcript is left alone.
    ///
    /// The turn runs on its own task, so dropping the returned future does
    /// not stop the reply from landing.
    pub async fn send(
        self: &Arc<Self>,
        transcript: &Arc<Mutex<Transcript>>,
        text: &str,
    ) -> Result<(), ChatBusy> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let slot = InFlight::acquire(self).ok_or(ChatBusy)?;

        let transcript = Arc::clone(transcript);
        let message = ChatMessage::user(text);
        let turn = tokio::spawn(async move {
            let history = {
                let mut transcript = transcript.lock().await;
                transcript.push(message);
                transcript.messages().to_vec()
            };

            let reply = slot.bridge.reply(&history).await;
            transcript.lock().await.push(reply);
        });

        if let Err(err) = turn.await {
            error!("chat turn failed: {err}");
        }
        Ok(())
    }

    /// Produces the assistant message for `history`. Never fails: errors are
    /// logged and turned into a fixed message.
    pub async fn reply(&self, history: &[ChatMessage]) -> ChatMessage {
        match self.complete(history).await {
            Ok(text) => {
                info!(turns = history.len(), "chat reply received");
                ChatMessage::assistant(text)
            }
            Err(ChatError::MissingCredential) => {
                error!("API key is missing, check configuration");
                ChatMessage::assistant(MISSING_KEY_REPLY)
            }
            Err(err) => {
                error!("chat completion failed: {err}");
                ChatMessage::assistant(FALLBACK_REPLY)
            }
        }
    }

    async fn complete(&self, history: &[ChatMessage]) -> Result<String, ChatError> {
        let key = self
            .settings
            .credential
            .resolve()
            .ok_or(ChatError::MissingCredential)?;

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        });
        messages.extend(history.iter().map(|message| WireMessage {
            role: match message.sender {
                Sender::User => "user",
                Sender::Assistant => "assistant",
            },
            content: &message.text,
        }));
        let body = CompletionRequest {
            model: &self.settings.model,
            messages,
        };

        let resp = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(&key)
            .header("HTTP-Referer", &self.settings.referer)
            .header("X-Title", &self.settings.title)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Status { status, body });
        }

        let completion: CompletionResponse = resp.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatError::NoChoices)
    }
}

/// Holds the bridge's single request slot until dropped.
struct InFlight {
    bridge: Arc<ChatBridge>,
}

impl InFlight {
    fn acquire(bridge: &Arc<ChatBridge>) -> Option<Self> {
        bridge
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                bridge: Arc::clone(bridge),
            })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.bridge.in_flight.store(false, Ordering::Release);
    }
}
