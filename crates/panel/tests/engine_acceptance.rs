use std::{sync::Arc, time::Duration};

use axum::{http::StatusCode, routing::post, Json, Router};
use client_core::{ContextEngineClient, EngineSettings};
use panel::{Notice, PanelHost, PanelRuntime, PanelState, Trigger, ViewState};
use serde_json::json;
use shared::domain::{LineRange, Selection};
use tokio::net::TcpListener;

#[derive(Default)]
struct CapturingHost {
    documents: Vec<String>,
    notices: Vec<Notice>,
}

impl PanelHost for CapturingHost {
    fn render(&mut self, document: &str) {
        self.documents.push(document.to_string());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn write_clipboard(&mut self, _text: &str) -> Result<(), String> {
        Ok(())
    }
}

async fn spawn_engine(app: Router) -> EngineSettings {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    EngineSettings {
        host: addr.ip().to_string(),
        port: addr.port(),
        request_timeout: Duration::from_secs(5),
        refresh_after_sync: false,
    }
}

fn runtime_for(settings: &EngineSettings) -> PanelRuntime<CapturingHost> {
    let client = ContextEngineClient::new(settings).expect("client");
    PanelRuntime::new(Arc::new(client), CapturingHost::default(), PanelState::new())
}

fn selection() -> Selection {
    Selection::new("def f(): pass", "a.py", LineRange::new(3, 3).expect("lines"))
}

#[tokio::test]
async fn explain_scenario_renders_bold_markdown() {
    let app = Router::new().route(
        "/explain",
        post(|| async { Json(json!({ "markdown": "**ok**" })) }),
    );
    let settings = spawn_engine(app).await;
    let mut runtime = runtime_for(&settings);

    runtime.handle_trigger(Trigger::ExplainSelection(Some(selection())));
    assert_eq!(runtime.state().view(), &ViewState::Loading);
    runtime.drain().await;

    assert!(matches!(runtime.state().view(), ViewState::Explained(_)));
    let document = runtime.host().documents.last().expect("document");
    assert!(document.contains("<strong>ok</strong>"));
}

#[tokio::test]
async fn retrieve_scenario_renders_escaped_card_and_sync_reports_zero() {
    let app = Router::new()
        .route(
            "/context/retrieve",
            post(|| async {
                Json(json!([{
                    "source": "slack",
                    "title_or_user": "alice",
                    "content_summary": "hi <b>there</b>",
                    "url": "https://x"
                }]))
            }),
        )
        .route(
            "/context/sync",
            post(|| async { Json(json!({ "status": "success", "items_synced": 0 })) }),
        );
    let settings = spawn_engine(app).await;
    let mut runtime = runtime_for(&settings);

    runtime.handle_trigger(Trigger::ShowContextForSelection(Some(selection())));
    runtime.drain().await;

    let document = runtime.host().documents.last().expect("document").clone();
    assert!(document.contains("SLACK"));
    assert!(document.contains("hi &lt;b&gt;there&lt;/b&gt;"));
    assert!(document.contains("href=\"https://x\""));

    runtime.handle_trigger(Trigger::SyncNow);
    runtime.drain().await;
    assert!(matches!(runtime.state().view(), ViewState::ContextList(items) if items.len() == 1));
    assert_eq!(
        runtime.host().notices.last(),
        Some(&Notice::info("Synced 0 items from Slack/Jira"))
    );
}

#[tokio::test]
async fn unreachable_engine_scenario_fails_with_connectivity_message() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let settings = EngineSettings {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..EngineSettings::default()
    };
    let mut runtime = runtime_for(&settings);

    runtime.handle_trigger(Trigger::ExplainSelection(Some(selection())));
    runtime.drain().await;

    match runtime.state().view() {
        ViewState::Failed(message) => assert!(message.contains("Disconnected")),
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn server_error_scenario_identifies_status() {
    let app = Router::new().route(
        "/context/retrieve",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let settings = spawn_engine(app).await;
    let mut runtime = runtime_for(&settings);

    runtime.handle_trigger(Trigger::ShowContextForSelection(Some(selection())));
    runtime.drain().await;

    assert_eq!(
        runtime.state().view(),
        &ViewState::Failed("Error: Server returned 500".into())
    );
}
