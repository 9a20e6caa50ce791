use crate::client::BeatSaver;
use crate::error::Result;
use crate::http::RequestOptions;
use crate::types::Beatmap;
use serde::{Deserialize, Serialize};

/// Identity of a listing: its URL template plus an optional search query.
///
/// Not part of the wire payload; attached after a page is decoded so the
/// listing can be walked without re-supplying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSource {
    /// Path without the page index, e.g. `maps/latest` or `search/text`.
    pub uri: String,
    pub query: Option<String>,
}

impl PageSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Request path for `index`. The query is encoded here and nowhere
    /// else, so every hop carries the same bytes.
    pub fn path(&self, index: u32) -> String {
        match &self.query {
            Some(q) => format!("{}/{}?q={}", self.uri, index, urlencoding::encode(q)),
            None => format!("{}/{}", self.uri, index),
        }
    }
}

/// One page of a map listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub docs: Vec<Beatmap>,
    pub total_docs: u64,
    pub last_page: u32,
    #[serde(default)]
    pub prev_page: Option<u32>,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(skip)]
    pub(crate) source: PageSource,
}

impl Page {
    pub fn source(&self) -> &PageSource {
        &self.source
    }

    pub(crate) fn attach(mut self, source: PageSource) -> Self {
        self.source = source;
        self
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.prev_page.is_some()
    }

    /// First-and-only page: nowhere to go in either direction.
    pub fn is_terminal(&self) -> bool {
        !self.has_next() && !self.has_previous()
    }

    /// Fetch the following page of the same listing, `None` past the end.
    pub async fn next(&self, client: &BeatSaver, opts: &RequestOptions) -> Result<Option<Page>> {
        match self.next_page {
            Some(index) => client.fetch_page(&self.source, index, opts).await,
            None => Ok(None),
        }
    }

    /// Fetch the preceding page of the same listing, `None` before the start.
    pub async fn previous(&self, client: &BeatSaver, opts: &RequestOptions) -> Result<Option<Page>> {
        match self.prev_page {
            Some(index) => client.fetch_page(&self.source, index, opts).await,
            None => Ok(None),
        }
    }
}
