//! Presentation of results and history for the terminal and as HTML.

use crate::history::SessionHistory;
use crate::speech::AudioClip;
use crate::translate::TranslationResult;
use crate::workflow::{Notice, NoticeLevel};

/// Plain-text result block for the terminal
pub fn result_text(result: &TranslationResult, audio: Option<&AudioClip>) -> String {
    let mut out = String::new();
    out.push_str("🔖 Translation Result\n");
    out.push_str(&format!("{}\n\n", result.path_display()));
    out.push_str(&format!("{}\n", result.text));
    if let Some(clip) = audio {
        out.push_str(&format!("\n🔊 {} ({} bytes)\n", clip.mime_type, clip.len()));
    }
    out
}

/// HTML card with the hop path, the text and an inline audio element
pub fn result_card_html(result: &TranslationResult, audio: Option<&AudioClip>, dark_mode: bool) -> String {
    let class = if dark_mode { "card dark-mode" } else { "card" };
    let mut html = format!(
        "<div class='{}'>\n    <h3>🔖 Translation Result</h3>\n    {}\n    <p style='font-size: 1.2rem; margin: 1rem 0;'>{}</p>\n",
        class,
        escape_html(&result.path_display()),
        escape_html(&result.text)
    );

    if let Some(clip) = audio {
        html.push_str(&format!(
            "    <audio controls>\n        <source src=\"{}\" type=\"{}\">\n    </audio>\n",
            clip.to_data_uri(),
            clip.mime_type
        ));
    }

    html.push_str("</div>\n");
    html
}

/// Most recent `limit` entries, newest first
pub fn history_text(history: &SessionHistory, limit: usize) -> String {
    if history.is_empty() {
        return "No translations yet.\n".to_string();
    }

    let mut out = String::from("📚 Translation History\n");
    for entry in history.recent(limit) {
        out.push_str(&format!("[{}] {}\n", entry.time_label(), entry.path.join(" ➔ ")));
        out.push_str(&format!("    {}\n", entry.text));
    }
    out
}

pub fn notice_text(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Warning => "⚠",
        NoticeLevel::Error => "✖",
    };
    format!("{} {}", marker, notice.message)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
