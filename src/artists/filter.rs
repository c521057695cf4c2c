//! Filter state and its flat parameter form.
//!
//! A [`FilterSpec`] is what the matcher consumes; a [`ParamMap`] is what ends up
//! in a shareable URL. Fields sitting at their neutral value ("all" or an empty
//! search) never appear in the mapping, and decoding never fails: missing,
//! unknown or malformed parameters all resolve to the neutral default.

use phf::phf_map;
use std::collections::BTreeMap;
use std::fmt;

/// Flat string-keyed parameters, ordered so rendered queries are deterministic
pub type ParamMap = BTreeMap<String, String>;

pub const CATEGORY_KEY: &str = "category";
pub const LOCATION_KEY: &str = "location";
pub const PRICE_KEY: &str = "priceRange";
pub const SEARCH_KEY: &str = "search";

/// Neutral sentinel for category, location and price band
pub const ALL: &str = "all";

// MARK: Price bands

/// Named fee bucket, matched loosely against an artist's price range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PriceBand {
    All,
    Budget,
    Mid,
    Premium,
}

static PRICE_BANDS: phf::Map<&'static str, PriceBand> = phf_map! {
    "all" => PriceBand::All,
    "budget" => PriceBand::Budget,
    "mid" => PriceBand::Mid,
    "premium" => PriceBand::Premium,
};

impl PriceBand {
    /// Looks a band up by its URL slug, ignoring case and surrounding blanks
    pub fn from_slug(slug: &str) -> Option<Self> {
        PRICE_BANDS
            .get(slug.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    pub fn slug(&self) -> &'static str {
        match self {
            PriceBand::All => ALL,
            PriceBand::Budget => "budget",
            PriceBand::Mid => "mid",
            PriceBand::Premium => "premium",
        }
    }

    /// Substrings of which at least one must occur in an artist's price range.
    ///
    /// This is containment on raw text, not a numeric comparison: `mid` accepts
    /// `"1800-2500"` because it contains `"800"`, and `premium` accepts
    /// `"21000"`. `All` has no tokens and accepts everything.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            PriceBand::All => &[],
            PriceBand::Budget => &["300"],
            PriceBand::Mid => &["500", "800"],
            PriceBand::Premium => &["1000", "1500"],
        }
    }
}

impl Default for PriceBand {
    fn default() -> Self {
        PriceBand::All
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// MARK: Filter specification

/// Active search and filter constraints. `None` and a blank search mean "no
/// constraint" for their field.
///
/// Built through the `with_*` builders or [`decode`], both of which normalise
/// neutral values.
///
/// [`decode`]: FilterSpec::decode
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    category: Option<String>,
    location: Option<String>,
    price_band: PriceBand,
    search: String,
}

impl FilterSpec {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn price_band(&self) -> PriceBand {
        self.price_band
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_neutral(&self) -> bool {
        self.encode().is_empty()
    }

    pub fn with_category<S: Into<String>>(&self, category: S) -> Self {
        Self {
            category: selection(category.into()),
            ..self.clone()
        }
    }

    pub fn with_location<S: Into<String>>(&self, location: S) -> Self {
        Self {
            location: selection(location.into()),
            ..self.clone()
        }
    }

    pub fn with_price_band(&self, price_band: PriceBand) -> Self {
        Self {
            price_band,
            ..self.clone()
        }
    }

    pub fn with_search<S: Into<String>>(&self, search: S) -> Self {
        Self {
            search: search_term(search.into()),
            ..self.clone()
        }
    }

    /// Parameters for every field not at its neutral value
    pub fn encode(&self) -> ParamMap {
        let mut params = ParamMap::new();
        if let Some(category) = self.category.clone().and_then(selection) {
            params.insert(CATEGORY_KEY.into(), category);
        }
        if let Some(location) = self.location.clone().and_then(selection) {
            params.insert(LOCATION_KEY.into(), location);
        }
        if self.price_band != PriceBand::All {
            params.insert(PRICE_KEY.into(), self.price_band.slug().into());
        }
        let search = search_term(self.search.clone());
        if !search.is_empty() {
            params.insert(SEARCH_KEY.into(), search);
        }
        params
    }

    /// Builds a specification from parameters. Unknown keys are ignored and an
    /// unrecognised price band falls back to [`PriceBand::All`].
    pub fn decode(params: &ParamMap) -> Self {
        let price_band = match params.get(PRICE_KEY) {
            Some(slug) => PriceBand::from_slug(slug).unwrap_or_else(|| {
                log::debug!("unknown price band `{}`, using `{}`", slug, ALL);
                PriceBand::All
            }),
            None => PriceBand::All,
        };
        Self {
            category: params.get(CATEGORY_KEY).cloned().and_then(selection),
            location: params.get(LOCATION_KEY).cloned().and_then(selection),
            price_band,
            search: params
                .get(SEARCH_KEY)
                .cloned()
                .map(search_term)
                .unwrap_or_default(),
        }
    }

    /// The subset of parameters a filtering backend understands. Search always
    /// stays on the client.
    pub fn server_params(&self) -> ParamMap {
        let mut params = self.encode();
        params.remove(SEARCH_KEY);
        params
    }

    pub fn to_query(&self) -> String {
        render_query(&self.encode())
    }

    pub fn from_query(query: &str) -> Self {
        Self::decode(&parse_query(query))
    }
}

/// Maps the neutral sentinel and blank input to `None`
fn selection(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(value)
    }
}

/// A search of only blanks is no search at all
fn search_term(value: String) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        value
    }
}

// MARK: Query strings

/// Renders parameters as a percent-encoded query string, without leading `?`
pub fn render_query(params: &ParamMap) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Parses a query string, with or without leading `?`. Pairs that do not
/// decode are skipped; a repeated key keeps its last value.
pub fn parse_query(query: &str) -> ParamMap {
    let query = query.trim();
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = ParamMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        match (decode_component(key), decode_component(value)) {
            (Some(key), Some(value)) if !key.is_empty() => {
                params.insert(key, value);
            }
            _ => log::debug!("skipping query pair `{}`", pair),
        }
    }
    params
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}
