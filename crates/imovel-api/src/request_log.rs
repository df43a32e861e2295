//! In-memory request log
//!
//! A bounded ring buffer of recent request records, owned by [`RequestLog`]
//! and injected through `AppState`. The [`track`] middleware feeds it and
//! also emits a structured tracing event per request.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: f64,
    pub timestamp: DateTime<Utc>,
}

/// Bounded ring buffer of request records. Cheap to clone; all clones share
/// the same buffer.
#[derive(Clone)]
pub struct RequestLog {
    inner: Arc<Mutex<VecDeque<RequestRecord>>>,
    capacity: usize,
}

impl RequestLog {
    pub fn new(capacity: usize) -> Self {
        RequestLog {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, record: RequestRecord) {
        let mut buffer = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(record);
    }

    /// Recent records, newest first.
    pub fn recent(&self) -> Vec<RequestRecord> {
        let buffer = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        buffer.iter().rev().cloned().collect()
    }
}

/// Middleware: record every request into the ring buffer after it settles.
pub async fn track(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(
        method = %method,
        path = %path,
        status = status,
        duration_ms = duration_ms,
        "Request completed"
    );

    state.request_log.record(RequestRecord {
        method,
        path,
        status,
        duration_ms,
        timestamp: Utc::now(),
    });

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_path(path: &str) -> RequestRecord {
        RequestRecord {
            method: "GET".to_string(),
            path: path.to_string(),
            status: 200,
            duration_ms: 1.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_capacity_is_bounded() {
        let log = RequestLog::new(3);
        for i in 0..10 {
            log.record(record_with_path(&format!("/r{i}")));
        }
        let recent = log.recent();
        assert_eq!(recent.len(), 3);
        // newest first, oldest entries evicted
        assert_eq!(recent[0].path, "/r9");
        assert_eq!(recent[2].path, "/r7");
    }

    #[test]
    fn test_clones_share_buffer() {
        let log = RequestLog::new(8);
        let clone = log.clone();
        clone.record(record_with_path("/shared"));
        assert_eq!(log.recent().len(), 1);
    }

    #[test]
    fn test_empty_log() {
        let log = RequestLog::new(8);
        assert!(log.recent().is_empty());
    }
}
