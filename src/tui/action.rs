use crate::client::ApiError;
use crate::detail::DetailRequest;
use crate::list::PageRequest;
use crate::model::Profile;

/// UI -> network actor.
#[derive(Debug)]
pub enum Action {
    FetchPage(PageRequest),
    FetchProfile(DetailRequest),
    Quit,
}

/// Network actor -> UI. Each completion carries the request descriptor so
/// the controllers can reject a stale one.
#[derive(Debug)]
pub enum AppEvent {
    PageLoaded(PageRequest, Result<Vec<Profile>, ApiError>),
    ProfileLoaded(DetailRequest, Result<Option<Profile>, ApiError>),
}
