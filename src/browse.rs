use crate::artists::filter::FilterSpec;
use crate::artists::matcher::{filter_artists_with, MatchMode};
use crate::artists::Artist;
use crate::backend::BackendClient;

/// Identifies one fetch; only the most recent ticket may update a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// What a front end renders for the current filter
#[derive(Debug)]
pub struct BrowseView<'a> {
    pub artists: Vec<&'a Artist>,
    pub count: usize,
    pub loading: bool,
    pub error: Option<&'a str>,
}

/// Artist collection plus the loading/error state of the fetch behind it
pub struct BrowseSession {
    mode: MatchMode,
    artists: Vec<Artist>,
    loading: bool,
    error: Option<String>,
    latest: u64,
}

impl BrowseSession {
    /// `MatchMode::ClientOnly` makes the session ask the backend to filter and
    /// only search locally.
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            artists: Vec::new(),
            loading: true,
            error: None,
            latest: 0,
        }
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.latest)
    }

    /// Applies a fetch outcome unless a newer fetch has started since.
    /// A failure keeps the previous collection and records the message.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Artist>, String>) -> bool {
        if ticket.0 != self.latest {
            log::warn!(
                "discarding stale fetch #{} (latest is #{})",
                ticket.0,
                self.latest
            );
            return false;
        }
        match result {
            Ok(artists) => self.artists = artists,
            Err(err) => {
                log::debug!("fetch #{} failed: {}", ticket.0, err);
                self.error = Some(err);
            }
        }
        self.loading = false;
        true
    }

    /// Fetches the collection for `spec` and applies it
    pub async fn refresh(&mut self, client: &BackendClient, spec: &FilterSpec) -> bool {
        let ticket = self.begin_fetch();
        let server_filter = match self.mode {
            MatchMode::ClientOnly => Some(spec),
            MatchMode::Full => None,
        };
        let result = client
            .list_artists(server_filter)
            .await
            .map_err(|err| err.to_string());
        self.finish_fetch(ticket, result)
    }

    pub fn view(&self, spec: &FilterSpec) -> BrowseView<'_> {
        let artists = filter_artists_with(&self.artists, spec, self.mode);
        BrowseView {
            count: artists.len(),
            artists,
            loading: self.loading,
            error: self.error.as_deref(),
        }
    }
}
