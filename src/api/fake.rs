use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::client::{ApiError, DashboardApi};

enum Canned {
    Json(Value),
    Status(u16),
    Malformed,
}

/// In-memory backend keyed by path.
///
/// Each path holds a queue of responses; the last one is repeated once the
/// queue is down to a single entry.
#[derive(Default)]
pub struct FakeApi {
    responses: Mutex<HashMap<String, VecDeque<Canned>>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, canned: Canned) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(canned);
    }

    pub fn respond(&self, path: &str, value: Value) {
        self.push(path, Canned::Json(value));
    }

    pub fn fail(&self, path: &str, status: u16) {
        self.push(path, Canned::Status(status));
    }

    pub fn malformed(&self, path: &str) {
        self.push(path, Canned::Malformed);
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }

    fn answer(&self, path: &str) -> Result<Value, ApiError> {
        let url = format!("http://fake{}", path);
        let mut responses = self.responses.lock().unwrap();
        let Some(queue) = responses.get_mut(path) else {
            return Err(ApiError::Http { url, status: 404 });
        };

        let popped = if queue.len() > 1 {
            queue.pop_front()
        } else {
            None
        };

        let picked = popped.as_ref().or(queue.front());
        let answer = match picked {
            Some(Canned::Json(v)) => Ok(v.clone()),
            Some(Canned::Status(status)) => Err(ApiError::Http {
                url,
                status: *status,
            }),
            Some(Canned::Malformed) => Err(ApiError::Parse {
                url,
                source: serde_json::from_str::<Value>("{").unwrap_err(),
            }),
            None => Err(ApiError::Http { url, status: 404 }),
        };
        answer
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.gets.lock().unwrap().push(path.to_string());
        self.answer(path)
    }

    async fn post_json(&self, path: &str) -> Result<Value, ApiError> {
        self.posts.lock().unwrap().push(path.to_string());
        self.answer(path)
    }
}
