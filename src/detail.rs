use crate::client::ApiError;
use crate::model::Profile;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

// Tokens are unique for the lifetime of the process, not per controller:
// a fresh screen must never reuse a token that an earlier, cancelled
// screen's request is still carrying.
static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_token() -> u64 {
    TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPhase {
    /// Opened without an id; no request is ever made.
    MissingId,
    Loading,
    Loaded(Profile),
    /// The server answered, but with nothing usable. Distinct from Error.
    NotFound,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub id: String,
    pub token: u64,
}

pub struct ProfileDetail {
    pub id: Option<String>,
    pub phase: DetailPhase,
    inflight: Option<u64>,
}

impl ProfileDetail {
    pub fn new(id: Option<String>) -> Self {
        let phase = if id.is_some() {
            DetailPhase::Loading
        } else {
            DetailPhase::MissingId
        };
        Self {
            id,
            phase,
            inflight: None,
        }
    }

    /// Issue (or re-issue) the fetch. None when there is no id to fetch.
    pub fn start(&mut self) -> Option<DetailRequest> {
        let id = self.id.clone()?;
        self.phase = DetailPhase::Loading;
        let token = next_token();
        self.inflight = Some(token);
        Some(DetailRequest { id, token })
    }

    pub fn retry(&mut self) -> Option<DetailRequest> {
        self.start()
    }

    /// Invalidate the in-flight request (navigation away). A completion
    /// arriving afterwards is dropped.
    pub fn cancel(&mut self) {
        self.inflight = None;
    }

    pub fn finish(&mut self, request: &DetailRequest, result: Result<Option<Profile>, ApiError>) {
        if self.inflight != Some(request.token) {
            debug!("dropping stale response for profile {}", request.id);
            return;
        }
        self.inflight = None;

        self.phase = match result {
            Ok(Some(profile)) => DetailPhase::Loaded(profile),
            Ok(None) => DetailPhase::NotFound,
            Err(e) => DetailPhase::Error(e.to_string()),
        };
    }

    pub fn profile(&self) -> Option<&Profile> {
        match &self.phase {
            DetailPhase::Loaded(p) => Some(p),
            _ => None,
        }
    }
}
