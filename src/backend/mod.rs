use serde::Deserialize;
use serde_json::Value;

use crate::artists::filter::{render_query, FilterSpec};
use crate::artists::registration::Submission;
use crate::artists::{Artist, ArtistId};
use crate::ArtistlyError;

// MARK: Response payloads

/// What the backend echoes back after a registration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RegisteredArtist {
    #[serde(default)]
    pub id: Option<ArtistId>,
    #[serde(default)]
    pub name: String,
}

// MARK: Client

/// Way to interact with the hosted artists backend
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    pub fn artists_url(&self) -> String {
        format!("{}{}", self.base_url, "/artists")
    }

    /// Fetches the artist collection. With a filter, the server-side fields
    /// (category, location, price band) are forwarded as query parameters.
    pub async fn list_artists(
        &self,
        server_filter: Option<&FilterSpec>,
    ) -> Result<Vec<Artist>, ArtistlyError> {
        let query = server_filter
            .map(|spec| render_query(&spec.server_params()))
            .unwrap_or_default();
        let url = if query.is_empty() {
            self.artists_url()
        } else {
            format!("{}?{}", self.artists_url(), query)
        };

        log::debug!("GET {}", url);
        let res = self.client.get(url.as_str()).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(format!("Failed to fetch artists: {}", text).into());
        }
        let artists = parse_artists(&text)?;
        log::debug!("fetched {} artists", artists.len());
        Ok(artists)
    }

    /// POSTs a validated registration
    pub async fn register_artist(
        &self,
        submission: &Submission,
    ) -> Result<RegisteredArtist, ArtistlyError> {
        let url = self.artists_url();
        log::debug!("POST {} (id {})", url, submission.id);
        let res = self
            .client
            .post(url.as_str())
            .json(submission)
            .send()
            .await?;
        if !res.status().is_success() {
            log::debug!("registration rejected with {}", res.status());
            return Err("Failed to register artist".into());
        }
        let registered: RegisteredArtist = res.json().await?;
        Ok(registered)
    }
}

/// Reads an artists payload, either a bare array or `{"artists": [...]}`.
/// Records that do not fit the artist model are skipped; well-formed JSON of
/// any other shape yields an empty collection. Malformed JSON is an error
/// quoting the body.
pub fn parse_artists(body: &str) -> Result<Vec<Artist>, ArtistlyError> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|_| format!("Invalid JSON response from server: {}", body))?;
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut fields) => match fields.remove("artists") {
            Some(Value::Array(records)) => records,
            _ => {
                log::warn!("artists payload has no `artists` array, treating as empty");
                return Ok(Vec::new());
            }
        },
        _ => {
            log::warn!("unexpected artists payload, treating as empty");
            return Ok(Vec::new());
        }
    };

    let mut artists = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Artist>(record) {
            Ok(artist) => artists.push(artist),
            Err(err) => log::warn!("skipping artist record #{}: {}", index, err),
        }
    }
    Ok(artists)
}
