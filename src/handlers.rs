use crate::errors::AppError;
use crate::journal::JournalStore;
use crate::models::{
    ChatRequest, ChatResponse, JournalResponse, Mood, SaveEntryForm, SaveEntryRequest,
};
use crate::state::AppState;
use crate::storage::Storage;
use crate::streak::{current_streak_at, heatmap_at};
use crate::ui::{render_chat, render_home, render_journal};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};

pub async fn home() -> Html<String> {
    Html(render_home())
}

pub async fn journal_page(State(state): State<AppState>) -> Html<String> {
    let journal = state.journal.lock().await;
    Html(render_journal(&journal_response(&journal, today())))
}

pub async fn journal_submit(
    State(state): State<AppState>,
    Form(form): Form<SaveEntryForm>,
) -> Result<Redirect, AppError> {
    let mood = match form.mood.trim() {
        "" => Mood::default(),
        symbol => Mood::from_symbol(symbol)
            .ok_or_else(|| AppError::bad_request(format!("unknown mood '{symbol}'")))?,
    };

    state
        .journal
        .lock()
        .await
        .save(today(), &form.text, mood)
        .await?;
    Ok(Redirect::to("/journal"))
}

pub async fn get_journal(State(state): State<AppState>) -> Json<JournalResponse> {
    let journal = state.journal.lock().await;
    Json(journal_response(&journal, today()))
}

pub async fn save_journal(
    State(state): State<AppState>,
    Json(payload): Json<SaveEntryRequest>,
) -> Result<Json<JournalResponse>, AppError> {
    let date = today();
    let mut journal = state.journal.lock().await;
    journal.save(date, &payload.text, payload.mood).await?;
    Ok(Json(journal_response(&journal, date)))
}

pub async fn chat_page(State(state): State<AppState>) -> Html<String> {
    let transcript = state.transcript.lock().await;
    Html(render_chat(transcript.messages(), state.chat.is_busy()))
}

pub async fn chat_submit(
    State(state): State<AppState>,
    Form(form): Form<ChatRequest>,
) -> Result<Redirect, AppError> {
    send(&state, &form.text).await?;
    Ok(Redirect::to("/chat"))
}

pub async fn get_chat(State(state): State<AppState>) -> Json<ChatResponse> {
    let transcript = state.transcript.lock().await;
    Json(ChatResponse {
        messages: transcript.messages().to_vec(),
    })
}

pub async fn send_chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    send(&state, &payload.text).await?;
    Ok(get_chat(State(state)).await)
}

async fn send(state: &AppState, text: &str) -> Result<(), AppError> {
    state
        .chat
        .send(&state.transcript, text)
        .await
        .map_err(|busy| AppError::conflict(busy.to_string()))
}

fn journal_response<S: Storage>(journal: &JournalStore<S>, today: NaiveDate) -> JournalResponse {
    JournalResponse {
        today,
        streak: current_streak_at(today, journal.dates()),
        entries: journal.sorted_entries(),
        heatmap: heatmap_at(today, journal.dates()),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
