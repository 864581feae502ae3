use crate::client::ApiError;
use crate::model::Profile;
use log::debug;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

pub const PAGE_SIZE: usize = 10;

// Process-wide so tokens never repeat, even across controller instances.
static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_token() -> u64 {
    TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Initial,
    Refresh,
    Append,
}

/// Exactly one phase at a time; invalid loading-flag combinations cannot
/// be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    InitialLoading,
    Refreshing,
    Paginating,
    Error(String),
}

/// Descriptor handed to the network side. The token ties the eventual
/// completion back to the state that issued it; a completion whose token
/// no longer matches is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub mode: FetchMode,
    pub token: u64,
}

pub struct ProfileList {
    pub items: Vec<Profile>,
    pub current_page: u32,
    pub page_size: usize,
    pub has_more: bool,
    pub phase: LoadPhase,
    inflight: Option<u64>,
}

impl Default for ProfileList {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            page_size: PAGE_SIZE,
            has_more: true,
            phase: LoadPhase::Idle,
            inflight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            LoadPhase::InitialLoading | LoadPhase::Refreshing | LoadPhase::Paginating
        )
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// First load. The TUI calls this exactly once on startup; `retry`
    /// reuses it from an error state.
    pub fn initial(&mut self) -> Option<PageRequest> {
        Some(self.start(1, FetchMode::Initial))
    }

    pub fn retry(&mut self) -> Option<PageRequest> {
        self.initial()
    }

    /// Replaces the whole list on success, never appends. Supersedes any
    /// request already in flight (its completion becomes stale).
    pub fn refresh(&mut self) -> Option<PageRequest> {
        Some(self.start(1, FetchMode::Refresh))
    }

    /// Next page, merged in. No-op while a load is in flight or when the
    /// last page was short.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.is_loading() || !self.has_more {
            return None;
        }
        Some(self.start(self.current_page + 1, FetchMode::Append))
    }

    fn start(&mut self, page: u32, mode: FetchMode) -> PageRequest {
        self.phase = match mode {
            FetchMode::Initial => LoadPhase::InitialLoading,
            FetchMode::Refresh => LoadPhase::Refreshing,
            FetchMode::Append => LoadPhase::Paginating,
        };
        let token = next_token();
        self.inflight = Some(token);
        PageRequest { page, mode, token }
    }

    pub fn finish(&mut self, request: &PageRequest, result: Result<Vec<Profile>, ApiError>) {
        if self.inflight != Some(request.token) {
            debug!("dropping stale page {} response", request.page);
            return;
        }
        self.inflight = None;

        match result {
            Ok(batch) => {
                self.has_more = batch.len() >= self.page_size;
                match request.mode {
                    FetchMode::Append => self.merge(batch),
                    _ => {
                        self.items.clear();
                        self.merge(batch);
                    }
                }
                self.current_page = request.page;
                self.phase = LoadPhase::Idle;
            }
            // Whatever was on screen stays there; recovery is manual.
            Err(e) => self.phase = LoadPhase::Error(e.to_string()),
        }
    }

    fn merge(&mut self, batch: Vec<Profile>) {
        let mut seen: HashSet<String> = self.items.iter().map(|p| p.id.clone()).collect();
        self.items
            .extend(batch.into_iter().filter(|p| seen.insert(p.id.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(id: &str) -> Profile {
        serde_json::from_value(json!({ "id": id })).unwrap()
    }

    fn page_of(ids: &[&str]) -> Vec<Profile> {
        ids.iter().map(|id| profile(id)).collect()
    }

    fn full_page(start: usize) -> Vec<Profile> {
        (start..start + PAGE_SIZE)
            .map(|i| profile(&format!("p{}", i)))
            .collect()
    }

    #[test]
    fn test_initial_load() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(list.phase, LoadPhase::InitialLoading);

        list.finish(&req, Ok(full_page(0)));
        assert_eq!(list.items.len(), PAGE_SIZE);
        assert!(list.has_more);
        assert_eq!(list.current_page, 1);
        assert_eq!(list.phase, LoadPhase::Idle);
    }

    #[test]
    fn test_full_then_short_page() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Ok(full_page(0)));
        assert!(list.has_more);

        let req = list.load_more().unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(list.phase, LoadPhase::Paginating);
        list.finish(&req, Ok(page_of(&["x", "y", "z"])));

        assert!(!list.has_more);
        assert_eq!(list.items.len(), 13);
        assert_eq!(list.current_page, 2);
        // A short page blocks further pagination
        assert!(list.load_more().is_none());
    }

    #[test]
    fn test_append_dedupes_and_keeps_order() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Ok(page_of(&["a", "b", "c"])));
        list.has_more = true;

        let req = list.load_more().unwrap();
        list.finish(&req, Ok(page_of(&["b", "d", "d", "e"])));

        let ids: Vec<&str> = list.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_load_more_guards() {
        let mut list = ProfileList::new();
        let _req = list.initial().unwrap();
        // In flight: no second request
        assert!(list.load_more().is_none());

        let mut list = ProfileList::new();
        list.has_more = false;
        assert!(list.load_more().is_none());
    }

    #[test]
    fn test_failure_keeps_items() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Ok(full_page(0)));

        let req = list.load_more().unwrap();
        list.finish(&req, Err(ApiError::NotFound));

        assert_eq!(list.phase, LoadPhase::Error("Not found (404)".to_string()));
        assert_eq!(list.error(), Some("Not found (404)"));
        assert_eq!(list.items.len(), PAGE_SIZE);
        assert_eq!(list.current_page, 1);
    }

    #[test]
    fn test_network_error_message() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Err(ApiError::Network));
        assert_eq!(
            list.error(),
            Some("Network error: cannot reach the server")
        );
    }

    #[test]
    fn test_retry_from_error() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Err(ApiError::Server(500)));

        let req = list.retry().unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(list.phase, LoadPhase::InitialLoading);
        assert!(list.error().is_none());

        list.finish(&req, Ok(page_of(&["a"])));
        assert_eq!(list.phase, LoadPhase::Idle);
    }

    #[test]
    fn test_refresh_replaces_wholesale() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Ok(page_of(&["a", "b", "c"])));

        let req = list.refresh().unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(list.phase, LoadPhase::Refreshing);
        list.finish(&req, Ok(page_of(&["b", "z"])));

        let ids: Vec<&str> = list.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "z"]);
        assert_eq!(list.current_page, 1);
    }

    #[test]
    fn test_refresh_supersedes_inflight_append() {
        let mut list = ProfileList::new();
        let req = list.initial().unwrap();
        list.finish(&req, Ok(full_page(0)));

        let append_req = list.load_more().unwrap();
        let refresh_req = list.refresh().unwrap();

        // The append resolves late; its token no longer matches.
        list.finish(&append_req, Ok(page_of(&["late"])));
        assert_eq!(list.phase, LoadPhase::Refreshing);
        assert_eq!(list.items.len(), PAGE_SIZE);

        list.finish(&refresh_req, Ok(page_of(&["fresh"])));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, "fresh");
    }
}
