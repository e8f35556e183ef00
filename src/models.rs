use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mood {
    #[serde(rename = "😄")]
    Happy,
    #[default]
    #[serde(rename = "😐")]
    Neutral,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😠")]
    Angry,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Neutral, Mood::Sad, Mood::Angry];

    pub fn symbol(self) -> &'static str {
        match self {
            Mood::Happy => "😄",
            Mood::Neutral => "😐",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mood| mood.symbol() == symbol)
    }
}

/// One journal record. `date` is the key: the store never holds two entries
/// for the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub text: String,
    pub mood: Mood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u8,
}

#[derive(Debug, Deserialize)]
pub struct SaveEntryRequest {
    pub text: String,
    #[serde(default)]
    pub mood: Mood,
}

#[derive(Debug, Deserialize)]
pub struct SaveEntryForm {
    pub text: String,
    #[serde(default)]
    pub mood: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JournalResponse {
    pub today: NaiveDate,
    pub streak: u32,
    pub entries: Vec<JournalEntry>,
    pub heatmap: Vec<HeatmapCell>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub messages: Vec<ChatMessage>,
}
