//! An in-process stand-in for the classroom REST API, served by axum on an
//! ephemeral port. Tokens are fixed per demo account and can be revoked to
//! simulate expiry.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use portal_lib::adapters::{FileStorage, ReqwestTransport};
use portal_lib::app::AppContext;
use portal_lib::config::Config;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEACHER: (&str, &str) = ("teacher@demo.com", "teacher123");
pub const STUDENT: (&str, &str) = ("student@demo.com", "student123");

struct Account {
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: &'static str,
    token: &'static str,
}

static ACCOUNTS: [Account; 2] = [
    Account {
        email: "teacher@demo.com",
        password: "teacher123",
        name: "Demo Teacher",
        role: "teacher",
        token: "teacher-token",
    },
    Account {
        email: "student@demo.com",
        password: "student123",
        name: "Demo Student",
        role: "student",
        token: "student-token",
    },
];

#[derive(Default)]
pub struct Stub {
    assignments: Mutex<Vec<Value>>,
    submissions: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
    posts: AtomicUsize,
    revoked: AtomicBool,
}

impl Stub {
    /// Number of POSTs received, login excluded.
    pub fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    /// Every token is rejected from now on.
    pub fn revoke_tokens(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    pub fn seed_assignment(&self, title: &str, status: &str) -> String {
        let id = self.fresh_id("a");
        self.assignments.lock().unwrap().push(json!({
            "_id": id, "title": title, "description": "", "dueDate": null, "status": status
        }));
        id
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn authenticate(stub: &Stub, headers: &HeaderMap) -> Result<&'static Account, Reply> {
    let unauthorized = || reply(StatusCode::UNAUTHORIZED, json!({ "message": "Token is not valid" }));
    if stub.revoked.load(Ordering::SeqCst) {
        return Err(unauthorized());
    }
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;
    ACCOUNTS.iter().find(|a| a.token == token).ok_or_else(unauthorized)
}

fn require_role(account: &Account, role: &str) -> Result<(), Reply> {
    if account.role != role {
        return Err(reply(StatusCode::FORBIDDEN, json!({ "message": "Access denied" })));
    }
    Ok(())
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Reply {
    match ACCOUNTS
        .iter()
        .find(|a| a.email == body.email && a.password == body.password)
    {
        Some(a) => reply(
            StatusCode::OK,
            json!({ "token": a.token, "name": a.name, "role": a.role }),
        ),
        None => reply(StatusCode::UNAUTHORIZED, json!({ "message": "Invalid credentials" })),
    }
}

async fn list_assignments(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Reply, Reply> {
    authenticate(&stub, &headers)?;
    let filter = params.get("status").filter(|s| !s.is_empty());
    let assignments: Vec<Value> = stub
        .assignments
        .lock()
        .unwrap()
        .iter()
        .filter(|a| filter.map_or(true, |f| a["status"] == f.as_str()))
        .cloned()
        .collect();
    Ok(reply(StatusCode::OK, json!({ "assignments": assignments })))
}

async fn create_assignment(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Reply, Reply> {
    stub.posts.fetch_add(1, Ordering::SeqCst);
    require_role(authenticate(&stub, &headers)?, "teacher")?;
    let title = body["title"].as_str().unwrap_or_default();
    if title.trim().is_empty() {
        return Err(reply(StatusCode::BAD_REQUEST, json!({ "message": "Title is required" })));
    }
    let assignment = json!({
        "_id": stub.fresh_id("a"),
        "title": title,
        "description": body["description"].clone(),
        "dueDate": body.get("dueDate").cloned().unwrap_or(Value::Null),
        "status": "Draft"
    });
    stub.assignments.lock().unwrap().push(assignment.clone());
    Ok(reply(StatusCode::CREATED, assignment))
}

async fn change_status(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Reply, Reply> {
    require_role(authenticate(&stub, &headers)?, "teacher")?;
    let mut assignments = stub.assignments.lock().unwrap();
    let assignment = assignments
        .iter_mut()
        .find(|a| a["_id"] == id.as_str())
        .ok_or_else(|| reply(StatusCode::NOT_FOUND, json!({ "message": "Assignment not found" })))?;
    assignment["status"] = body["status"].clone();
    Ok(reply(StatusCode::OK, assignment.clone()))
}

async fn submit(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Reply, Reply> {
    stub.posts.fetch_add(1, Ordering::SeqCst);
    let account = authenticate(&stub, &headers)?;
    require_role(account, "student")?;
    let assignment_id = body["assignmentId"].as_str().unwrap_or_default().to_string();
    let submission = json!({
        "_id": stub.fresh_id("s"),
        "assignmentId": assignment_id,
        "studentId": { "name": account.name, "email": account.email },
        "answer": body["answer"].clone(),
        "submittedAt": "2024-05-01T10:00:00Z",
        "reviewed": false
    });
    let mut submissions = stub.submissions.lock().unwrap();
    submissions.retain(|s| {
        !(s["assignmentId"] == assignment_id.as_str() && s["studentId"]["email"] == account.email)
    });
    submissions.push(submission.clone());
    Ok(reply(StatusCode::CREATED, submission))
}

async fn my_submission(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(assignment_id): Path<String>,
) -> Result<Reply, Reply> {
    let account = authenticate(&stub, &headers)?;
    stub.submissions
        .lock()
        .unwrap()
        .iter()
        .find(|s| s["assignmentId"] == assignment_id.as_str() && s["studentId"]["email"] == account.email)
        .map(|s| reply(StatusCode::OK, json!({ "submission": s })))
        .ok_or_else(|| reply(StatusCode::NOT_FOUND, json!({ "message": "No submission found" })))
}

async fn submissions_for(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(assignment_id): Path<String>,
) -> Result<Reply, Reply> {
    require_role(authenticate(&stub, &headers)?, "teacher")?;
    let submissions: Vec<Value> = stub
        .submissions
        .lock()
        .unwrap()
        .iter()
        .filter(|s| s["assignmentId"] == assignment_id.as_str())
        .cloned()
        .collect();
    Ok(reply(StatusCode::OK, json!({ "submissions": submissions })))
}

/// Starts the stub and returns its base URL.
pub async fn spawn_stub() -> (String, Arc<Stub>) {
    let stub = Arc::new(Stub::default());
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/assignments", get(list_assignments).post(create_assignment))
        .route("/api/assignments/{id}/status", put(change_status))
        .route("/api/submissions", post(submit))
        .route("/api/submissions/my/{assignment_id}", get(my_submission))
        .route("/api/submissions/{assignment_id}", get(submissions_for))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", address), stub)
}

/// A client context wired to the stub, persisting its session under `dir`.
pub fn client(base_url: &str, dir: &FsPath) -> AppContext {
    let config = Config {
        api_url: base_url.to_string(),
        session_dir: dir.to_path_buf(),
        ..Config::default()
    };
    let storage = Arc::new(FileStorage::open(dir).expect("session dir"));
    let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new(), base_url));
    AppContext::start(config, transport, storage)
}

/// Waits until the coordinator has logged the client out and moved it to login.
pub async fn wait_for_logout(ctx: &AppContext) {
    let mut watcher = ctx.navigator.watch();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let at_login = *watcher.borrow_and_update() == classroom_core::guard::View::Login;
            if at_login && ctx.session.get().is_none() {
                return;
            }
            watcher.changed().await.expect("navigator dropped");
        }
    })
    .await
    .expect("client was not logged out in time");
}
