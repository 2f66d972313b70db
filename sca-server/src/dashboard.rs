//! Dashboard card rendering
//!
//! Turns consultation details into the HTML fragment the dashboard page
//! swaps in. Every interpolated value is escaped; transcripts keep their
//! text verbatim (whitespace is preserved by CSS).

use sca_common::db::{ConsultationDetail, Score};
use sca_common::time;
use std::fmt::Write;

/// Render the card grid, preserving the order given
pub fn render_cards(consultations: &[ConsultationDetail]) -> String {
    let mut html = String::from("<div class=\"grid\">\n");
    for consultation in consultations {
        html.push_str(&render_card(consultation));
    }
    html.push_str("</div>\n");
    html
}

/// Render one consultation card
pub fn render_card(consultation: &ConsultationDetail) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<article class="card" data-consultation-id="{id}">
  <div class="card-header">
    <div class="consultant">
      <span class="consultant-name">{name}</span>
      <span class="consultant-email">({email})</span>
    </div>
    <time datetime="{created_at}">{created_display}</time>
  </div>
  <div class="audio">
    <a href="{audio_url}" target="_blank" rel="noopener noreferrer">Listen to Recording</a>
  </div>
"#,
        id = escape_html(&consultation.id),
        name = escape_html(&consultation.consultant.name),
        email = escape_html(&consultation.consultant.email),
        created_at = escape_html(&consultation.created_at),
        created_display = escape_html(&time::format_display(&consultation.created_at)),
        audio_url = escape_html(safe_href(&consultation.audio_url)),
    );

    if let Some(transcript) = &consultation.transcript {
        let _ = write!(
            html,
            r#"  <div class="transcript">
    <h4>Transcript</h4>
    <p>{}</p>
  </div>
"#,
            escape_html(transcript)
        );
    }

    html.push_str("  <div class=\"scores\">\n    <h4>Scores</h4>\n");
    for score in &consultation.scores {
        html.push_str(&render_score(score));
    }
    html.push_str("  </div>\n</article>\n");

    html
}

fn render_score(score: &Score) -> String {
    format!(
        r#"    <div class="score-row">
      <div>
        <span class="category">{}</span>
        <p class="notes">{}</p>
      </div>
      <span class="score-value">{}%</span>
    </div>
"#,
        escape_html(&score.category),
        escape_html(&score.notes),
        score.score
    )
}

/// Only http(s) links are rendered as-is
fn safe_href(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url
    } else {
        "#"
    }
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
