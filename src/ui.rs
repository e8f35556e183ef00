use crate::models::{ChatMessage, HeatmapCell, JournalResponse, Mood, Sender};
use std::fmt::Write as _;

pub fn render_home() -> String {
    page("EmoWeb", HOME_BODY)
}

pub fn render_journal(journal: &JournalResponse) -> String {
    let moods = Mood::ALL
        .iter()
        .map(|mood| {
            let checked = if *mood == Mood::default() { " checked" } else { "" };
            format!(
                r#"<label class="mood"><input type="radio" name="mood" value="{0}"{checked} /><span>{0}</span></label>"#,
                mood.symbol()
            )
        })
        .collect::<String>();

    let mut entries = String::new();
    for entry in &journal.entries {
        let _ = write!(
            entries,
            r#"<article class="entry"><p class="muted">Date: <strong>{}</strong></p><p class="entry-mood">{}</p><p class="entry-text">{}</p></article>"#,
            entry.date,
            entry.mood.symbol(),
            escape_html(&entry.text)
        );
    }
    if entries.is_empty() {
        entries.push_str(r#"<p class="muted">No entries yet.</p>"#);
    }

    let days = if journal.streak == 1 { "day" } else { "days" };
    let body = JOURNAL_BODY
        .replace("{{TODAY}}", &journal.today.to_string())
        .replace("{{MOODS}}", &moods)
        .replace("{{STREAK}}", &format!("{} {days}", journal.streak))
        .replace("{{HEATMAP}}", &render_heatmap(&journal.heatmap))
        .replace("{{ENTRIES}}", &entries);
    page("Daily Journal", &body)
}

pub fn render_chat(messages: &[ChatMessage], busy: bool) -> String {
    let mut bubbles = String::new();
    for message in messages {
        let class = match message.sender {
            Sender::User => "bubble user",
            Sender::Assistant => "bubble assistant",
        };
        let _ = write!(
            bubbles,
            r#"<div class="{class}">{}</div>"#,
            escape_html(&message.text)
        );
    }
    if busy {
        bubbles.push_str(r#"<p class="muted typing">Typing...</p>"#);
    }

    let body = CHAT_BODY.replace("{{MESSAGES}}", &bubbles);
    page("Emotional Support Chat", &body)
}

fn render_heatmap(cells: &[HeatmapCell]) -> String {
    cells
        .iter()
        .map(|cell| {
            let class = if cell.count > 0 { "cell filled" } else { "cell" };
            format!(r#"<span class="{class}" title="{}"></span>"#, cell.date)
        })
        .collect()
}

fn page(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BODY}}", body)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const HOME_BODY: &str = r#"
  <main class="app center">
    <h1>Welcome to EmoWeb 💙</h1>
    <p class="subtitle">A safe space to express your feelings, reflect on your day, and talk things through.</p>
    <nav class="stack">
      <a class="button" href="/journal">Start Journaling</a>
      <a class="button alt" href="/chat">Talk to AI</a>
    </nav>
  </main>
"#;

const JOURNAL_BODY: &str = r#"
  <main class="app">
    <a class="back" href="/">← Back to Home</a>
    <h1>📝 Daily Journal</h1>
    <p class="muted">Today's Date: <strong>{{TODAY}}</strong></p>
    <form method="post" action="/journal" class="stack">
      <div class="moods">{{MOODS}}</div>
      <textarea name="text" placeholder="Write about your day, thoughts, hobbies..."></textarea>
      <button type="submit">Save Entry</button>
    </form>
    <section class="card">
      <h2>📅 Your Journal Activity</h2>
      <p class="muted">🔥 Current Streak: <strong>{{STREAK}}</strong></p>
      <div class="heatmap">{{HEATMAP}}</div>
    </section>
    <section>
      <h2>📅 Past Entries</h2>
      {{ENTRIES}}
    </section>
  </main>
"#;

const CHAT_BODY: &str = r#"
  <main class="app">
    <a class="back" href="/">← Back to Home</a>
    <h1>🤖 Emotional Support Chat</h1>
    <div class="transcript">{{MESSAGES}}</div>
    <form method="post" action="/chat" class="row">
      <input name="text" placeholder="Type your message..." autocomplete="off" autofocus />
      <button type="submit">Send</button>
    </form>
  </main>
"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #f5f3ff;
      --bg-2: #ede9fe;
      --ink: #1f1d2b;
      --accent: #7c3aed;
      --accent-2: #6366f1;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 18px 40px rgba(76, 29, 149, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }

    .app {
      width: min(640px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 18px;
    }

    .center {
      min-height: 80vh;
      place-content: center;
      text-align: center;
    }

    h1 {
      margin: 0;
      color: var(--accent);
      font-size: clamp(1.6rem, 4vw, 2.4rem);
    }

    h2 {
      color: var(--accent);
      font-size: 1.2rem;
    }

    .subtitle,
    .muted {
      color: #6b6880;
      margin: 0;
    }

    .back {
      color: var(--accent);
      font-size: 0.9rem;
      text-decoration: none;
    }

    .stack {
      display: grid;
      gap: 12px;
    }

    .row {
      display: flex;
      gap: 8px;
    }

    .card,
    .entry,
    form {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 16px;
    }

    .button,
    button {
      display: block;
      border: none;
      border-radius: 12px;
      padding: 12px 18px;
      background: var(--accent);
      color: white;
      font-size: 1rem;
      text-decoration: none;
      cursor: pointer;
    }

    .button.alt {
      background: var(--accent-2);
    }

    textarea,
    input[name="text"] {
      flex: 1;
      width: 100%;
      border: 1px solid #d4d0e6;
      border-radius: 12px;
      padding: 12px;
      font: inherit;
    }

    textarea {
      height: 128px;
      resize: none;
    }

    .moods {
      display: flex;
      justify-content: center;
      gap: 8px;
      font-size: 1.6rem;
    }

    .mood input {
      display: none;
    }

    .mood span {
      display: inline-block;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid transparent;
      cursor: pointer;
    }

    .mood input:checked + span {
      border-color: var(--accent);
      background: white;
      transform: scale(1.1);
    }

    .heatmap {
      display: grid;
      grid-template-rows: repeat(7, 12px);
      grid-auto-flow: column;
      grid-auto-columns: 12px;
      gap: 3px;
      overflow-x: auto;
    }

    .cell {
      width: 12px;
      height: 12px;
      border-radius: 2px;
      background: #eee;
    }

    .cell.filled {
      background: #a855f7;
    }

    .entry-mood {
      font-size: 1.6rem;
      margin: 4px 0;
    }

    .entry-text {
      white-space: pre-wrap;
      overflow-wrap: anywhere;
    }

    .transcript {
      display: flex;
      flex-direction: column;
      gap: 10px;
    }

    .bubble {
      max-width: 85%;
      padding: 12px 16px;
      border-radius: 14px;
      overflow-wrap: anywhere;
    }

    .bubble.user {
      align-self: flex-end;
      background: #dbeafe;
    }

    .bubble.assistant {
      align-self: flex-start;
      background: white;
      box-shadow: var(--shadow);
    }

    .typing {
      text-align: center;
    }
  </style>
</head>
<body>
{{BODY}}
</body>
</html>
"#;
