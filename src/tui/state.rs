use crate::detail::{DetailRequest, ProfileDetail};
use crate::list::ProfileList;
use crate::model::Profile;
use ratatui::widgets::ListState;

/// Selection this close to the bottom of the list triggers the next page.
const SCROLL_THRESHOLD: usize = 3;

#[derive(PartialEq, Clone, Copy)]
pub enum Screen {
    List,
    Detail,
}

pub struct AppState {
    // Data
    pub list: ProfileList,
    pub detail: Option<ProfileDetail>,

    // UI State
    pub screen: Screen,
    pub list_state: ListState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let mut l_state = ListState::default();
        l_state.select(Some(0));

        Self {
            list: ProfileList::new(),
            detail: None,
            screen: Screen::List,
            list_state: l_state,
        }
    }

    pub fn selected_profile(&self) -> Option<&Profile> {
        if let Some(idx) = self.list_state.selected() {
            self.list.items.get(idx)
        } else {
            None
        }
    }

    /// Keep the selection inside the list after it changed size.
    pub fn clamp_selection(&mut self) {
        let len = self.list.items.len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(len - 1)));
        }
    }

    /// True when the selection sits in the last few rows, i.e. the user is
    /// about to run out of list.
    pub fn near_end(&self) -> bool {
        let len = self.list.items.len();
        match self.list_state.selected() {
            Some(idx) if len > 0 => idx + SCROLL_THRESHOLD >= len,
            _ => false,
        }
    }

    pub fn open_detail(&mut self) -> Option<DetailRequest> {
        let id = self.selected_profile().map(|p| p.id.clone())?;
        let mut detail = ProfileDetail::new(Some(id));
        let req = detail.start();
        self.detail = Some(detail);
        self.screen = Screen::Detail;
        req
    }

    /// Back to the list. Any fetch still in flight is cancelled so its
    /// completion cannot touch a dismissed screen.
    pub fn close_detail(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.cancel();
        }
        self.detail = None;
        self.screen = Screen::List;
    }

    // --- NAVIGATION ---
    pub fn next(&mut self) {
        if self.list.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.list.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.list.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.list.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn jump_forward(&mut self, step: usize) {
        if !self.list.items.is_empty() {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state
                .select(Some((current + step).min(self.list.items.len() - 1)));
        }
    }

    pub fn jump_backward(&mut self, step: usize) {
        if !self.list.items.is_empty() {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.saturating_sub(step)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dummy_profile(id: &str) -> Profile {
        serde_json::from_value(json!({ "id": id })).unwrap()
    }

    fn state_with(n: usize) -> AppState {
        let mut state = AppState::new();
        state.list.items = (0..n).map(|i| dummy_profile(&format!("p{}", i))).collect();
        state
    }

    #[test]
    fn test_navigation_next_wraps() {
        let mut state = state_with(3);
        state.list_state.select(Some(0));

        state.next(); // 1
        assert_eq!(state.list_state.selected(), Some(1));

        state.next(); // 2
        assert_eq!(state.list_state.selected(), Some(2));

        state.next(); // Wrap to 0
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_previous_wraps() {
        let mut state = state_with(3);
        state.list_state.select(Some(0));

        state.previous(); // Wrap to last (2)
        assert_eq!(state.list_state.selected(), Some(2));

        state.previous(); // 1
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn test_navigation_empty_list_safety() {
        let mut state = state_with(0);

        // Should not panic
        state.next();
        state.previous();
        state.jump_forward(10);
        state.jump_backward(10);
    }

    #[test]
    fn test_near_end_threshold() {
        let mut state = state_with(10);

        state.list_state.select(Some(0));
        assert!(!state.near_end());

        state.list_state.select(Some(6));
        assert!(!state.near_end());

        state.list_state.select(Some(7));
        assert!(state.near_end());

        state.list_state.select(Some(9));
        assert!(state.near_end());
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut state = state_with(10);
        state.list_state.select(Some(9));

        state.list.items.truncate(4);
        state.clamp_selection();
        assert_eq!(state.list_state.selected(), Some(3));

        state.list.items.clear();
        state.clamp_selection();
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn test_open_and_close_detail() {
        let mut state = state_with(3);
        state.list_state.select(Some(1));

        let req = state.open_detail().unwrap();
        assert_eq!(req.id, "p1");
        assert!(state.screen == Screen::Detail);

        state.close_detail();
        assert!(state.screen == Screen::List);
        assert!(state.detail.is_none());
    }

    #[test]
    fn test_open_detail_without_selection() {
        let mut state = state_with(0);
        state.list_state.select(None);
        assert!(state.open_detail().is_none());
        assert!(state.screen == Screen::List);
    }
}
