//! Remote directory workflow: loading, success and failure states for the
//! user list and the user detail.
//!
//! Every fetch is tagged with a [`RequestToken`]. A completion only lands in
//! its slot when the token is still the slot's current one, so a slow
//! response for a previously selected user can never overwrite the user on
//! screen.

use crate::domain::RemoteUser;
use crate::infrastructure::{DirectoryError, DirectorySource};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Identifies one initiated fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// What a view shows for a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Failure(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl<T> From<Result<T, DirectoryError>> for FetchState<T> {
    fn from(result: Result<T, DirectoryError>) -> Self {
        match result {
            Ok(data) => FetchState::Success(data),
            Err(e) => FetchState::Failure(e.to_string()),
        }
    }
}

/// Fetches the whole directory.
pub async fn fetch_collection(source: &dyn DirectorySource) -> Result<Vec<RemoteUser>, DirectoryError> {
    source.fetch_users().await
}

/// Fetches a single user. An unknown id is a failure, never an empty success.
pub async fn fetch_by_id(source: &dyn DirectorySource, id: u64) -> Result<RemoteUser, DirectoryError> {
    source.fetch_user(id).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRequest {
    Collection,
    Item(u64),
}

impl DirectoryRequest {
    pub async fn run(self, source: &dyn DirectorySource) -> FetchOutcome {
        match self {
            DirectoryRequest::Collection => FetchOutcome::Collection(fetch_collection(source).await),
            DirectoryRequest::Item(id) => FetchOutcome::Item(fetch_by_id(source, id).await),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Collection(Result<Vec<RemoteUser>, DirectoryError>),
    Item(Result<RemoteUser, DirectoryError>),
}

/// A resolved fetch on its way back to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCompletion {
    pub token: RequestToken,
    pub outcome: FetchOutcome,
}

/// State of one kind of request plus the token it is waiting for.
#[derive(Debug, Clone)]
pub struct FetchSlot<T> {
    state: FetchState<T>,
    current: Option<RequestToken>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Loading,
            current: None,
        }
    }
}

impl<T> FetchSlot<T> {
    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    fn begin(&mut self, token: RequestToken) {
        self.state = FetchState::Loading;
        self.current = Some(token);
    }

    /// Applies `result` if `token` is the one this slot waits for.
    fn resolve(&mut self, token: RequestToken, result: Result<T, DirectoryError>) -> bool {
        if self.current != Some(token) {
            return false;
        }
        self.state = result.into();
        true
    }
}

/// The directory's list and detail slots.
#[derive(Debug, Default)]
pub struct Directory {
    next_token: u64,
    list: FetchSlot<Vec<RemoteUser>>,
    detail: FetchSlot<RemoteUser>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &FetchState<Vec<RemoteUser>> {
        self.list.state()
    }

    pub fn detail(&self) -> &FetchState<RemoteUser> {
        self.detail.state()
    }

    /// Starts a request: its slot goes back to `Loading` and waits for the new token.
    pub fn begin(&mut self, request: DirectoryRequest) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        match request {
            DirectoryRequest::Collection => self.list.begin(token),
            DirectoryRequest::Item(_) => self.detail.begin(token),
        }
        tracing::debug!(?token, ?request, "fetch started");
        token
    }

    /// Applies a completion. Returns false when it was stale and got discarded.
    pub fn complete(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion { token, outcome } = completion;
        let applied = match outcome {
            FetchOutcome::Collection(result) => self.list.resolve(token, result),
            FetchOutcome::Item(result) => self.detail.resolve(token, result),
        };
        if !applied {
            tracing::debug!(?token, "discarding stale fetch result");
        }
        applied
    }
}

/// Runs `request` on the current runtime and sends the completion to `tx`.
pub fn spawn_fetch(
    source: Arc<dyn DirectorySource>,
    token: RequestToken,
    request: DirectoryRequest,
    tx: UnboundedSender<FetchCompletion>,
) {
    tokio::spawn(async move {
        let outcome = request.run(source.as_ref()).await;
        if tx.send(FetchCompletion { token, outcome }).is_err() {
            tracing::debug!(?token, "ui loop gone, dropping fetch result");
        }
    });
}
