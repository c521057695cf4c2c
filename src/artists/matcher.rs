use super::filter::FilterSpec;
use super::Artist;

/// Which predicates the matcher evaluates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Every active predicate, for unfiltered collections
    Full,
    /// Only free-text search, for collections the backend already narrowed
    /// by category, location and price
    ClientOnly,
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::Full
    }
}

/// Filter terms normalised once per run instead of once per artist
struct Predicates {
    category: Option<String>,
    location: Option<String>,
    price_tokens: &'static [&'static str],
    search: Option<String>,
}

impl Predicates {
    fn new(spec: &FilterSpec, mode: MatchMode) -> Self {
        let search = spec.search().trim();
        let search = if search.is_empty() {
            None
        } else {
            Some(search.to_lowercase())
        };
        match mode {
            MatchMode::Full => Self {
                category: spec.category().map(|c| c.trim().to_lowercase()),
                location: spec.location().map(|l| l.trim().to_lowercase()),
                price_tokens: spec.price_band().tokens(),
                search,
            },
            MatchMode::ClientOnly => Self {
                category: None,
                location: None,
                price_tokens: &[],
                search,
            },
        }
    }

    fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.location.is_none()
            && self.price_tokens.is_empty()
            && self.search.is_none()
    }

    fn accepts(&self, artist: &Artist) -> bool {
        if let Some(category) = &self.category {
            if artist.category().trim().to_lowercase() != *category {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !artist.location().to_lowercase().contains(location.as_str()) {
                return false;
            }
        }
        if !self.price_tokens.is_empty() {
            let price_range = artist.price_range();
            if !self.price_tokens.iter().any(|token| price_range.contains(*token)) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let found = [
                artist.name.as_str(),
                artist.bio(),
                artist.category(),
                artist.location(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(term.as_str()));
            if !found {
                return false;
            }
        }
        true
    }
}

/// Whether `artist` satisfies every active predicate of `spec`
pub fn matches(artist: &Artist, spec: &FilterSpec) -> bool {
    Predicates::new(spec, MatchMode::Full).accepts(artist)
}

/// Artists satisfying `spec`, in their original order
pub fn filter_artists<'a>(artists: &'a [Artist], spec: &FilterSpec) -> Vec<&'a Artist> {
    filter_artists_with(artists, spec, MatchMode::Full)
}

pub fn filter_artists_with<'a>(
    artists: &'a [Artist],
    spec: &FilterSpec,
    mode: MatchMode,
) -> Vec<&'a Artist> {
    let predicates = Predicates::new(spec, mode);
    if predicates.is_empty() {
        return artists.iter().collect();
    }
    let matched: Vec<&Artist> = artists.iter().filter(|a| predicates.accepts(a)).collect();
    log::debug!(
        "{} of {} artists match `{}` ({:?})",
        matched.len(),
        artists.len(),
        spec.to_query(),
        mode
    );
    matched
}
