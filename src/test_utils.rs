//! Test utilities: an in-process fake of the testcase service
//!
//! Serves `testcase_header.jsp` and `testcase.jsp` from tables the test fills
//! in, answering 404 for anything unknown, and records every request.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::models::Direction;
use crate::store::{CacheLayout, CaseStore, MetadataStore, Remote};
use crate::testcase::TestcaseManager;

#[derive(Default)]
struct FakeState {
    headers: HashMap<String, String>,
    cases: HashMap<(String, String, String), Vec<u8>>,
    header_requests: usize,
    case_log: Vec<(usize, String)>,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeAoj {
    addr: SocketAddr,
    state: Shared,
}

impl FakeAoj {
    /// Bind to an ephemeral port and serve in the background
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new()
            .route("/aoj/testcase_header.jsp", get(header))
            .route("/aoj/testcase.jsp", get(case))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake testcase service");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/aoj", self.addr)
    }

    /// Configuration pointing at this service and a fresh cache directory
    pub fn config(&self) -> (Config, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path());
        config.remote.base_url = self.base_url();
        (config, dir)
    }

    pub fn manager(&self) -> (TestcaseManager, TempDir) {
        let (config, dir) = self.config();
        (TestcaseManager::new(&config).unwrap(), dir)
    }

    pub fn metadata_store(&self) -> (MetadataStore, TempDir) {
        let (config, dir) = self.config();
        let remote = Remote::new(&config.remote).unwrap();
        (
            MetadataStore::new(remote, CacheLayout::new(&config.cache)),
            dir,
        )
    }

    pub fn case_store(&self) -> (CaseStore, TempDir) {
        let (config, dir) = self.config();
        let remote = Remote::new(&config.remote).unwrap();
        (CaseStore::new(remote, CacheLayout::new(&config.cache)), dir)
    }

    pub fn set_header(&self, problem_id: &str, body: &str) {
        self.state
            .lock()
            .unwrap()
            .headers
            .insert(problem_id.to_string(), body.to_string());
    }

    /// Register a case by its 1-based number
    pub fn set_case(&self, problem_id: &str, number: usize, direction: Direction, data: &str) {
        self.state.lock().unwrap().cases.insert(
            (
                problem_id.to_string(),
                number.to_string(),
                direction.as_query().to_string(),
            ),
            data.as_bytes().to_vec(),
        );
    }

    /// Register a whole problem: a manifest plus every input/output pair
    pub fn add_problem(&self, problem_id: &str, cases: &[(&str, &str)]) {
        let describe = |prefix: &str, i: usize, data: &str| {
            serde_json::json!({ "Name": format!("{}{}", prefix, i + 1), "Size": data.len() })
        };
        let header = serde_json::json!({
            "ID": problem_id,
            "Available": 1,
            "Input": cases.iter().enumerate().map(|(i, c)| describe("in", i, c.0)).collect::<Vec<_>>(),
            "Output": cases.iter().enumerate().map(|(i, c)| describe("out", i, c.1)).collect::<Vec<_>>(),
            "case_mapping": (1..=cases.len()).map(|n| n.to_string()).collect::<Vec<_>>(),
        });
        self.set_header(problem_id, &header.to_string());

        for (i, (input, output)) in cases.iter().enumerate() {
            self.set_case(problem_id, i + 1, Direction::Input, input);
            self.set_case(problem_id, i + 1, Direction::Output, output);
        }
    }

    pub fn header_requests(&self) -> usize {
        self.state.lock().unwrap().header_requests
    }

    pub fn case_requests(&self) -> usize {
        self.state.lock().unwrap().case_log.len()
    }

    /// `(case number, type)` of every case request, in arrival order
    pub fn case_log(&self) -> Vec<(usize, String)> {
        self.state.lock().unwrap().case_log.clone()
    }
}

async fn header(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.header_requests += 1;

    match query.get("id").and_then(|id| state.headers.get(id)) {
        Some(body) => (StatusCode::OK, body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn case(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let param = |name: &str| query.get(name).cloned().unwrap_or_default();
    let key = (param("id"), param("case"), param("type"));

    state
        .case_log
        .push((key.1.parse().unwrap_or(0), key.2.clone()));

    match state.cases.get(&key) {
        Some(data) => (StatusCode::OK, data.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
