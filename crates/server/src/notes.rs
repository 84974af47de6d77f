//! The notes board page and its actions.
//!
//! `GET /boards/:board` renders the board. GET actions: `ping`, `search`, `get_note`.
//! POST actions: `create`, `delete`.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use action_dispatch::{
    ActionDispatcher, ActionRegistry, ActionRequest, ActionView, Context, PageView, RegistryError,
};
use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::error::{ApiError, ErrorCode};
use tokio::sync::RwLock;
use tracing::info;

const DEFAULT_BOARD: &str = "main";
const MAX_TITLE_CHARS: usize = 200;

type ApiFailure = (StatusCode, Json<ApiError>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRef {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

pub struct NotesView {
    title: String,
    boards: RwLock<HashMap<String, Vec<Note>>>,
    next_id: AtomicU64,
}

impl NotesView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            boards: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn notes(&self, board: &str) -> Vec<Note> {
        self.boards
            .read()
            .await
            .get(board)
            .cloned()
            .unwrap_or_default()
    }

    async fn find(&self, board: &str, id: u64) -> Option<Note> {
        self.boards
            .read()
            .await
            .get(board)
            .and_then(|notes| notes.iter().find(|note| note.id == id).cloned())
    }

    async fn insert(&self, board: &str, title: String, body: String) -> Note {
        let note = Note {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            title,
            body,
        };
        self.boards
            .write()
            .await
            .entry(board.to_string())
            .or_default()
            .push(note.clone());
        note
    }

    async fn remove(&self, board: &str, id: u64) -> Option<Note> {
        let mut boards = self.boards.write().await;
        let notes = boards.get_mut(board)?;
        let index = notes.iter().position(|note| note.id == id)?;
        Some(notes.remove(index))
    }
}

#[async_trait]
impl PageView for NotesView {
    async fn get_context_data(&self, request: &ActionRequest) -> anyhow::Result<Context> {
        let board = board_of(request);
        let notes = self.notes(board).await;

        let mut context = Context::new();
        context.insert("title".into(), json!(self.title));
        context.insert("board".into(), json!(board));
        context.insert("notes".into(), serde_json::to_value(notes)?);
        Ok(context)
    }

    fn render_to_response(&self, context: Context) -> anyhow::Result<Response> {
        let text = |key: &str| {
            context
                .get(key)
                .and_then(Value::as_str)
                .map(escape_html)
                .unwrap_or_default()
        };
        let title = text("title");
        let board = text("board");
        let notes: Vec<Note> = match context.get("notes") {
            Some(notes) => serde_json::from_value(notes.clone())?,
            None => Vec::new(),
        };

        let mut page = format!(
            "<!doctype html>\n<html><head><title>{title}: {board}</title></head><body>\n<h1>{title}</h1>\n<h2>{board}</h2>\n"
        );
        if notes.is_empty() {
            page.push_str("<p>No notes yet.</p>\n");
        } else {
            page.push_str("<ul>\n");
            for note in &notes {
                page.push_str(&format!(
                    "<li id=\"note-{}\"><strong>{}</strong> {}</li>\n",
                    note.id,
                    escape_html(&note.title),
                    escape_html(&note.body)
                ));
            }
            page.push_str("</ul>\n");
        }
        page.push_str("</body></html>\n");
        Ok(Html(page).into_response())
    }
}

pub fn notes_view(view: NotesView) -> Result<ActionView<NotesView>, RegistryError> {
    let get_actions = ActionRegistry::new()
        .with("ping", ping)?
        .with("search", search)?
        .with("get_note", get_note)?;
    let post_actions = ActionRegistry::new()
        .with("create", create)?
        .with("delete", delete)?;
    Ok(ActionView::new(
        view,
        ActionDispatcher::new(get_actions, post_actions),
    ))
}

async fn ping(_view: Arc<NotesView>, _request: ActionRequest, data: Option<Value>) -> Json<Value> {
    Json(json!({ "pong": true, "echo": data }))
}

async fn search(
    view: Arc<NotesView>,
    request: ActionRequest,
    input: Option<SearchInput>,
) -> Json<Vec<Note>> {
    let notes = view.notes(board_of(&request)).await;
    let Some(SearchInput { query }) = input else {
        return Json(notes);
    };
    let needle = query.to_lowercase();
    Json(
        notes
            .into_iter()
            .filter(|note| note.title.to_lowercase().contains(&needle))
            .collect(),
    )
}

async fn get_note(
    view: Arc<NotesView>,
    request: ActionRequest,
    input: NoteRef,
) -> Result<Json<Note>, ApiFailure> {
    view.find(board_of(&request), input.id)
        .await
        .map(Json)
        .ok_or_else(|| note_not_found(input.id))
}

async fn create(
    view: Arc<NotesView>,
    request: ActionRequest,
    input: CreateNote,
) -> Result<(StatusCode, Json<Note>), ApiFailure> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, "title cannot be empty")),
        ));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                format!("title exceeds {MAX_TITLE_CHARS} characters"),
            )),
        ));
    }

    let board = board_of(&request);
    let note = view.insert(board, title.to_string(), input.body).await;
    info!(board, note_id = note.id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

async fn delete(
    view: Arc<NotesView>,
    request: ActionRequest,
    input: NoteRef,
) -> Result<StatusCode, ApiFailure> {
    let board = board_of(&request);
    view.remove(board, input.id)
        .await
        .ok_or_else(|| note_not_found(input.id))?;
    info!(board, note_id = input.id, "note deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn board_of(request: &ActionRequest) -> &str {
    request.route_param("board").unwrap_or(DEFAULT_BOARD)
}

fn note_not_found(id: u64) -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, format!("note {id} not found"))),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn boards_keep_their_own_notes() {
        let view = NotesView::new("Notes");
        let first = view.insert("a", "one".into(), String::new()).await;
        let second = view.insert("b", "two".into(), String::new()).await;

        assert_ne!(first.id, second.id);
        assert_eq!(view.notes("a").await, vec![first.clone()]);
        assert!(view.find("b", first.id).await.is_none());
        assert_eq!(view.remove("a", first.id).await, Some(first));
        assert!(view.notes("a").await.is_empty());
        assert!(view.remove("a", 99).await.is_none());
    }

    #[tokio::test]
    async fn rendered_page_escapes_note_content() {
        let view = NotesView::new("Notes");
        view.insert("team", "<script>".into(), "a & b".into()).await;

        let request = ActionRequest::new(
            axum::http::Method::GET,
            axum::http::Uri::from_static("/boards/team"),
        )
        .with_route_param("board", "team");
        let context = view.get_context_data(&request).await.expect("context");
        let response = view.render_to_response(context).expect("render");
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let html = String::from_utf8(bytes.to_vec()).expect("utf8");

        assert!(html.contains("<h2>team</h2>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<script>"));
    }
}
