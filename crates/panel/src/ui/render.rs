//! Pure mapping from a [`ViewState`] to the panel document.

use shared::{domain::SourceTag, protocol::ContextItem};

use crate::{
    controller::reducer::ViewState,
    ui::html::{document, escape_attr, escape_html},
};

const WELCOME_BODY: &str = r#"<div class="welcome-container">
    <div class="icon">🔍</div>
    <h2>ContextSync</h2>
    <p>Highlight code and run <b>ContextSync: Explain Intent</b> to reveal key insights.</p>
</div>"#;

const LOADING_BODY: &str = r#"<div class="loader-container">
    <div class="spinner"></div>
    <p>Analyzing Context...</p>
</div>"#;

/// Renders the full document for `view`. Same input, same bytes.
pub fn render(view: &ViewState) -> String {
    document(&render_body(view))
}

pub fn render_body(view: &ViewState) -> String {
    match view {
        ViewState::Welcome => WELCOME_BODY.to_string(),
        ViewState::Loading => LOADING_BODY.to_string(),
        ViewState::Explained(result) => render_explanation(&result.markdown),
        ViewState::ContextList(items) => render_cards(items),
        ViewState::Failed(message) => format!(
            "<div class=\"error-container\">\n    <h3>⚠️ Error</h3>\n    <p>{message}</p>\n</div>"
        ),
    }
}

fn render_explanation(markdown_body: &str) -> String {
    let html = markdown::to_html(markdown_body);
    format!(
        "<div class=\"explanation-container\">\n    <div id=\"markdown-content\">{html}</div>\n    <div class=\"actions\">\n        <button onclick=\"copyText()\" class=\"action-button\">📋 Copy</button>\n    </div>\n</div>"
    )
}

fn render_cards(items: &[ContextItem]) -> String {
    let mut body = String::from("<h3>Raw Context Data</h3>\n<div class=\"cards-container\">\n");
    if items.is_empty() {
        body.push_str("<p class=\"empty-note\">No related discussions or tickets found.</p>\n");
    }
    for item in items {
        body.push_str(&render_card(item));
    }
    body.push_str("</div>\n<button onclick=\"syncNow()\" class=\"sync-button\">🔄 Sync Now</button>");
    body
}

struct CardStyle {
    class: &'static str,
    icon: &'static str,
}

fn card_style(source: &SourceTag) -> CardStyle {
    match source {
        SourceTag::Slack => CardStyle {
            class: "slack",
            icon: "#",
        },
        SourceTag::Jira => CardStyle {
            class: "jira",
            icon: "🎫",
        },
        SourceTag::Other(_) => CardStyle {
            class: "other",
            icon: "📄",
        },
    }
}

fn render_card(item: &ContextItem) -> String {
    let style = card_style(&item.source);
    let source = item.source.as_str();
    let mut card = format!(
        "<div class=\"context-card {class}\">\n    <div class=\"context-header\">\n        <span class=\"context-badge\">{icon} {tag}</span>\n        <span class=\"context-user\">{user}</span>\n    </div>\n    <div class=\"context-summary\">{summary}</div>\n",
        class = style.class,
        icon = style.icon,
        tag = escape_html(&source.to_uppercase()),
        user = escape_html(&item.title_or_user),
        summary = escape_html(&item.content_summary),
    );
    if let Some(url) = item.url.as_deref().filter(|url| is_linkable(url)) {
        card.push_str(&format!(
            "    <a href=\"{href}\" class=\"context-link\">Open in {source}</a>\n",
            href = escape_attr(url.trim()),
            source = escape_html(source),
        ));
    }
    card.push_str("</div>\n");
    card
}

fn is_linkable(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
