use std::future::Future;

use super::errors::FetchError;
use super::types::ServerSnapshot;
use crate::session::Credential;

/// The only network boundary of the system.
///
/// Implementations return the roster in backend order. The poller owns
/// scheduling, deduplication and error surfacing; sources just fetch.
pub trait RosterSource: Send + Sync + 'static {
    fn fetch_roster(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<ServerSnapshot>, FetchError>> + Send;
}
