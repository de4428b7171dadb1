//! In-process fake of the REST record API, served by axum on its own runtime
//! thread so the blocking client can call it from plain tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

#[derive(Clone, Default)]
struct Db {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    next_id: Arc<AtomicU64>,
    failures: Arc<Mutex<Vec<(StatusCode, Value)>>>,
}

impl Db {
    fn injected_failure(&self) -> Result<(), (StatusCode, Json<Value>)> {
        match self.failures.lock().unwrap().pop() {
            Some((status, body)) => Err((status, Json(body))),
            None => Ok(()),
        }
    }
}

#[derive(Deserialize)]
struct Window {
    #[serde(default)]
    skip: usize,
    take: Option<usize>,
}

pub struct FakeApi {
    pub base_url: String,
    db: Db,
}

impl FakeApi {
    pub fn start() -> Self {
        let db = Db {
            next_id: Arc::new(AtomicU64::new(100)),
            ..Db::default()
        };
        let app = router(db.clone());
        let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        let addr = rx.recv().unwrap();
        Self {
            base_url: format!("http://{addr}"),
            db,
        }
    }

    pub fn seed(&self, resource: &str, rows: Vec<Value>) {
        self.db
            .tables
            .lock()
            .unwrap()
            .insert(resource.to_string(), rows);
    }

    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.db
            .tables
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next request fail with `status` and `body`.
    pub fn fail_next(&self, status: StatusCode, body: Value) {
        self.db.failures.lock().unwrap().push((status, body));
    }
}

fn router(db: Db) -> Router {
    Router::new()
        .route("/:resource", get(list).post(create))
        .route("/:resource/:id", get(fetch).patch(update).delete(remove))
        .with_state(db)
}

fn id_of(row: &Value) -> String {
    match &row["id"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn not_found(resource: &str, id: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{resource} {id} not found") })),
    )
}

async fn list(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Query(window): Query<Window>,
) -> ApiResult {
    db.injected_failure()?;
    let rows = db.tables.lock().unwrap().get(&resource).cloned().unwrap_or_default();
    let total = rows.len();
    let page: Vec<Value> = rows
        .into_iter()
        .skip(window.skip)
        .take(window.take.unwrap_or(usize::MAX))
        .collect();

    // Assets answer with a bare array, everything else with a paged body.
    if resource == "assets" {
        return Ok((StatusCode::OK, Json(Value::Array(page))));
    }
    Ok((StatusCode::OK, Json(json!({ "data": page, "total": total }))))
}

async fn create(
    State(db): State<Db>,
    Path(resource): Path<String>,
    Json(mut row): Json<Value>,
) -> ApiResult {
    db.injected_failure()?;
    let mut tables = db.tables.lock().unwrap();
    let rows = tables.entry(resource).or_default();

    if let Some(email) = row.get("email").and_then(Value::as_str) {
        let taken = rows.iter().any(|r| {
            r["email"]
                .as_str()
                .is_some_and(|e| e.eq_ignore_ascii_case(email))
        });
        if taken {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({ "message": "Email already exists" })),
            ));
        }
    }

    row["id"] = json!(db.next_id.fetch_add(1, Ordering::SeqCst));
    rows.push(row.clone());
    Ok((StatusCode::CREATED, Json(row)))
}

async fn fetch(State(db): State<Db>, Path((resource, id)): Path<(String, String)>) -> ApiResult {
    db.injected_failure()?;
    let tables = db.tables.lock().unwrap();
    tables
        .get(&resource)
        .and_then(|rows| rows.iter().find(|r| id_of(r) == id))
        .map(|row| (StatusCode::OK, Json(row.clone())))
        .ok_or_else(|| not_found(&resource, &id))
}

async fn update(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> ApiResult {
    db.injected_failure()?;
    let mut tables = db.tables.lock().unwrap();
    let row = tables
        .get_mut(&resource)
        .and_then(|rows| rows.iter_mut().find(|r| id_of(r) == id))
        .ok_or_else(|| not_found(&resource, &id))?;

    if let (Value::Object(target), Value::Object(changes)) = (&mut *row, patch) {
        for (key, value) in changes {
            target.insert(key, value);
        }
    }
    Ok((StatusCode::OK, Json(row.clone())))
}

async fn remove(State(db): State<Db>, Path((resource, id)): Path<(String, String)>) -> ApiResult {
    db.injected_failure()?;
    let mut tables = db.tables.lock().unwrap();
    let rows = tables
        .get_mut(&resource)
        .ok_or_else(|| not_found(&resource, &id))?;
    let index = rows
        .iter()
        .position(|r| id_of(r) == id)
        .ok_or_else(|| not_found(&resource, &id))?;
    rows.remove(index);
    Ok((StatusCode::OK, Json(json!({}))))
}
