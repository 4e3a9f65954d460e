//! HTML escaping and the fixed document shell around every panel view.

/// Escapes text for element content; newlines become `<br>`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes text for a double-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\n' => out.push_str("&#10;"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

pub fn document(body: &str) -> String {
    let mut out = String::with_capacity(STYLE.len() + SCRIPT.len() + body.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(body);
    out.push_str("\n<script>");
    out.push_str(SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

const STYLE: &str = r##"
body {
    padding: 0;
    color: var(--vscode-editor-foreground);
    font-family: var(--vscode-font-family);
    font-weight: var(--vscode-font-weight);
    font-size: var(--vscode-font-size);
}
.welcome-container, .loader-container {
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    height: 100vh;
    text-align: center;
}
.welcome-container { padding: 20px; color: var(--vscode-descriptionForeground); }
.welcome-container .icon { font-size: 3em; margin-bottom: 10px; opacity: 0.5; }
.spinner {
    border: 4px solid var(--vscode-widget-shadow);
    border-top: 4px solid var(--vscode-progressBar-background);
    border-radius: 50%;
    width: 30px;
    height: 30px;
    animation: spin 1s linear infinite;
    margin-bottom: 10px;
}
@keyframes spin { 0% { transform: rotate(0deg); } 100% { transform: rotate(360deg); } }
.cards-container { padding: 10px; }
.context-card {
    background-color: var(--vscode-sideBar-background);
    border: 1px solid var(--vscode-widget-border);
    border-left-width: 4px;
    padding: 12px;
    margin-bottom: 10px;
    border-radius: 4px;
}
.context-card.slack { border-left-color: #E01E5A; }
.context-card.jira { border-left-color: #0052CC; }
.context-card.other { border-left-color: var(--vscode-widget-border); }
.context-header { display: flex; justify-content: space-between; margin-bottom: 8px; font-size: 0.85em; }
.context-badge { font-weight: bold; opacity: 0.8; }
.context-user { opacity: 0.6; }
.context-summary { margin-bottom: 8px; line-height: 1.4; }
.context-link { color: var(--vscode-textLink-foreground); text-decoration: none; font-size: 0.9em; }
.empty-note { opacity: 0.7; }
.explanation-container { padding: 15px; }
#markdown-content h1, #markdown-content h2, #markdown-content h3 {
    border-bottom: 1px solid var(--vscode-widget-border);
    padding-bottom: 5px;
}
code {
    font-family: var(--vscode-editor-font-family);
    background: var(--vscode-textCodeBlock-background);
    padding: 2px 4px;
    border-radius: 3px;
}
button {
    background: var(--vscode-button-background);
    color: var(--vscode-button-foreground);
    border: none;
    padding: 6px 12px;
    border-radius: 2px;
    cursor: pointer;
}
.sync-button { width: 100%; margin-top: 10px; }
.action-button { background: var(--vscode-button-secondaryBackground); color: var(--vscode-button-secondaryForeground); }
.actions { margin-top: 15px; border-top: 1px solid var(--vscode-widget-border); padding-top: 10px; }
.error-container { padding: 20px; color: var(--vscode-errorForeground); text-align: center; }
"##;

const SCRIPT: &str = r##"
const host = typeof acquireVsCodeApi === 'function'
    ? acquireVsCodeApi()
    : { postMessage: (message) => window.parent.postMessage(message, '*') };
function syncNow() {
    host.postMessage({ command: 'sync' });
}
function copyText() {
    const content = document.getElementById('markdown-content') || document.body;
    host.postMessage({ command: 'copy', text: content.innerText });
}
"##;
