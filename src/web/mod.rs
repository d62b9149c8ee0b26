// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Web UI for interactive rename confirmation
//!
//! The graphical counterpart of the CLI confirm prompt: scan a directory,
//! show the proposed plans as a checklist with their reasons, apply the
//! selected renames. The pending batch is owned here, per batch, and the
//! page observes it; nothing mutates plans from the browser side except
//! selection.

use axum::{
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::history::History;
use crate::naming::form::DOCUMENT_FORMS;
use crate::orchestrator::{BatchOutcome, NamingOrchestrator, RenamePlan};

/// The batch currently shown in the checklist.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub directory: PathBuf,
    pub plans: Vec<RenamePlan>,
}

/// Shared application state
pub struct AppState {
    pub orchestrator: NamingOrchestrator,
    pub config: AppConfig,
    pub batch: Mutex<Option<Batch>>,
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(index_page))
        .route("/forms", get(forms_page))
        // API endpoints
        .route("/api/plan", post(api_plan))
        .route("/api/batch", get(api_get_batch))
        .route("/api/rename", post(api_rename))
        .route("/api/forms", get(api_get_forms))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === API Handlers ===

#[derive(Deserialize)]
struct PlanRequest {
    directory: String,
}

#[derive(Serialize)]
struct PlanResponse {
    ok: bool,
    error: Option<String>,
    count: usize,
}

async fn api_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Json<PlanResponse> {
    let dir = PathBuf::from(&request.directory);
    if !dir.is_dir() {
        return Json(PlanResponse {
            ok: false,
            error: Some(format!("Not a directory: {}", request.directory)),
            count: 0,
        });
    }

    match state.orchestrator.plan_directory(&dir).await {
        Ok(plans) => {
            let count = plans.len();
            info!("Planned {} renames in {:?}", count, dir);
            *state.batch.lock().await = Some(Batch {
                directory: dir,
                plans,
            });
            Json(PlanResponse {
                ok: true,
                error: None,
                count,
            })
        }
        Err(e) => Json(PlanResponse {
            ok: false,
            error: Some(e.to_string()),
            count: 0,
        }),
    }
}

async fn api_get_batch(State(state): State<Arc<AppState>>) -> Json<Option<Batch>> {
    Json(state.batch.lock().await.clone())
}

#[derive(Deserialize)]
struct RenameRequest {
    /// Source paths of the plans the user ticked.
    selected: Vec<String>,
}

async fn api_rename(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> Json<BatchOutcome> {
    let mut guard = state.batch.lock().await;
    let batch = match guard.take() {
        Some(b) => b,
        None => return Json(BatchOutcome::default()),
    };

    let selected: Vec<RenamePlan> = batch
        .plans
        .into_iter()
        .filter(|p| {
            request
                .selected
                .iter()
                .any(|s| PathBuf::from(s) == p.source_path)
        })
        .collect();

    let history = History::new(PathBuf::from(&state.config.history_file));
    let outcome = NamingOrchestrator::execute(&selected, &history, false);
    info!(
        "Applied batch: {} renamed, {} failed",
        outcome.renamed, outcome.failed
    );

    Json(outcome)
}

async fn api_get_forms() -> Json<Vec<(String, String)>> {
    Json(
        DOCUMENT_FORMS
            .iter()
            .map(|(c, d)| (c.to_string(), d.to_string()))
            .collect(),
    )
}

// === Page Handlers ===

async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let batch = state.batch.lock().await.clone();
    Html(render_index(batch.as_ref()))
}

async fn forms_page() -> Html<String> {
    Html(render_forms_page())
}

// === Template Rendering ===

fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Onomast</title>
    <style>
        :root {{
            --bg-primary: #1a1a2e;
            --bg-secondary: #16213e;
            --bg-card: #0f3460;
            --text-primary: #e8e8e8;
            --text-secondary: #a0a0a0;
            --accent: #e94560;
            --accent-hover: #ff6b6b;
            --success: #00d9a5;
            --border: #2a2a4a;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }}
        .container {{ max-width: 1400px; margin: 0 auto; padding: 20px; }}
        nav {{
            background: var(--bg-secondary);
            padding: 15px 20px;
            display: flex;
            align-items: center;
            gap: 30px;
            border-bottom: 1px solid var(--border);
        }}
        nav .logo {{
            font-size: 1.5em;
            font-weight: bold;
            color: var(--accent);
            text-decoration: none;
        }}
        nav a {{
            color: var(--text-secondary);
            text-decoration: none;
            transition: color 0.2s;
        }}
        nav a:hover {{ color: var(--text-primary); }}
        .card {{
            background: var(--bg-card);
            border-radius: 12px;
            padding: 20px;
            margin-bottom: 20px;
        }}
        .card h2 {{
            margin-bottom: 15px;
            color: var(--accent);
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
        }}
        th, td {{
            padding: 12px;
            text-align: left;
            border-bottom: 1px solid var(--border);
        }}
        th {{ color: var(--text-secondary); font-weight: 500; }}
        tr:hover {{ background: rgba(255,255,255,0.05); }}
        .reason {{ color: var(--text-secondary); font-size: 0.85em; }}
        button, input[type="text"] {{
            background: var(--bg-secondary);
            color: var(--text-primary);
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 8px 14px;
            font-size: 1em;
        }}
        button {{ cursor: pointer; }}
        button.primary {{ background: var(--accent); border-color: var(--accent); }}
        button.primary:hover {{ background: var(--accent-hover); }}
        .toolbar {{ display: flex; gap: 10px; margin-bottom: 15px; }}
        .toolbar input {{ flex: 1; }}
    </style>
</head>
<body>
    <nav>
        <a href="/" class="logo">Onomast</a>
        <a href="/">Rename</a>
        <a href="/forms">Form Codes</a>
    </nav>
    <main class="container">
        {}
    </main>
</body>
</html>"#,
        title, content
    )
}

fn render_index(batch: Option<&Batch>) -> String {
    let checklist = match batch {
        Some(batch) => {
            let rows: String = batch
                .plans
                .iter()
                .map(|plan| {
                    let from = plan
                        .source_path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    format!(
                        r#"
                <tr>
                    <td><input type="checkbox" class="pick" value="{}" checked></td>
                    <td>{}</td>
                    <td>{}</td>
                    <td class="reason">{}</td>
                </tr>
            "#,
                        escape(&plan.source_path.to_string_lossy()),
                        escape(&from),
                        escape(&plan.new_name),
                        escape(&plan.reason),
                    )
                })
                .collect();

            format!(
                r#"
        <div class="card">
            <h2>Proposed renames in {}</h2>
            <div class="toolbar">
                <button onclick="selectAll(true)">Select All</button>
                <button onclick="selectAll(false)">Deselect All</button>
                <button class="primary" onclick="applySelected()">Rename Selected Files</button>
            </div>
            <table>
                <tr><th></th><th>From</th><th>To</th><th>Reason</th></tr>
                {}
            </table>
        </div>
    "#,
                escape(&batch.directory.to_string_lossy()),
                rows
            )
        }
        None => r#"
        <div class="card">
            <h2>No batch yet</h2>
            <p>Enter a directory above and scan it to get naming suggestions.</p>
        </div>
    "#
        .to_string(),
    };

    let content = format!(
        r#"
        <h1>Rename Files</h1>
        <div class="card">
            <div class="toolbar">
                <input type="text" id="directory" placeholder="Directory to scan">
                <button class="primary" onclick="scan()">Scan &amp; Suggest</button>
            </div>
        </div>
        {}
        <script>
            async function scan() {{
                const directory = document.getElementById('directory').value;
                const res = await fetch('/api/plan', {{
                    method: 'POST',
                    headers: {{'Content-Type': 'application/json'}},
                    body: JSON.stringify({{directory}})
                }});
                const data = await res.json();
                if (!data.ok) {{ alert(data.error); return; }}
                location.reload();
            }}
            function selectAll(state) {{
                document.querySelectorAll('.pick').forEach(cb => cb.checked = state);
            }}
            async function applySelected() {{
                const selected = Array.from(document.querySelectorAll('.pick'))
                    .filter(cb => cb.checked)
                    .map(cb => cb.value);
                const res = await fetch('/api/rename', {{
                    method: 'POST',
                    headers: {{'Content-Type': 'application/json'}},
                    body: JSON.stringify({{selected}})
                }});
                const outcome = await res.json();
                alert(`Renamed ${{outcome.renamed}} files, ${{outcome.failed}} failed.`);
                location.reload();
            }}
        </script>
    "#,
        checklist
    );

    base_template("Rename", &content)
}

fn render_forms_page() -> String {
    let rows: String = DOCUMENT_FORMS
        .iter()
        .map(|(code, desc)| format!(r#"<tr><td>{}</td><td>{}</td></tr>"#, code, desc))
        .collect();

    let content = format!(
        r#"
        <h1>Document Form Codes</h1>
        <div class="card">
            <table>
                <tr><th>Code</th><th>Meaning</th></tr>
                {}
            </table>
        </div>
    "#,
        rows
    );

    base_template("Form Codes", &content)
}

/// Minimal HTML escaping for untrusted filename text.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Start the web server.
pub async fn start_server(state: Arc<AppState>) -> crate::Result<()> {
    let addr = format!("{}:{}", state.config.web.host, state.config.web.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Web UI available at http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router)
        .await
        .map_err(|e| crate::OnomastError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_neutralizes_markup() {
        assert_eq!(escape(r#"<b>"x"&</b>"#), "&lt;b&gt;&quot;x&quot;&amp;&lt;/b&gt;");
    }

    #[test]
    fn test_index_renders_plans() {
        let batch = Batch {
            directory: PathBuf::from("/inbox"),
            plans: vec![RenamePlan {
                source_path: PathBuf::from("/inbox/old.pdf"),
                new_name: "A_B_DOC_20240101_Rev0.pdf".to_string(),
                reason: "because".to_string(),
            }],
        };
        let html = render_index(Some(&batch));
        assert!(html.contains("old.pdf"));
        assert!(html.contains("A_B_DOC_20240101_Rev0.pdf"));
        assert!(html.contains("Rename Selected Files"));
    }

    #[test]
    fn test_index_without_batch() {
        let html = render_index(None);
        assert!(html.contains("No batch yet"));
    }
}
