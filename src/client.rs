use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{encode_path_segment, RequestOptions, Transport};
use crate::page::{Page, PageSource};
use crate::types::{Beatmap, RestError, User};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Sort orders of the global map listing (`maps/{order}/{page}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Latest,
    Hot,
    Rating,
    Downloads,
    Plays,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Hot => "hot",
            SortOrder::Rating => "rating",
            SortOrder::Downloads => "downloads",
            SortOrder::Plays => "plays",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortOrder::Latest),
            "hot" => Ok(SortOrder::Hot),
            "rating" => Ok(SortOrder::Rating),
            "downloads" => Ok(SortOrder::Downloads),
            "plays" => Ok(SortOrder::Plays),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Free-text search.
    Text,
    /// Lucene query syntax.
    Advanced,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Text => "text",
            SearchKind::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    fn wire(self) -> &'static str {
        match self {
            VoteDirection::Up => "1",
            VoteDirection::Down => "-1",
        }
    }
}

#[derive(Debug, Serialize)]
struct VotePayload<'a> {
    #[serde(rename = "steamID")]
    steam_id: &'a str,
    ticket: &'a str,
    direction: &'static str,
}

/// Catalog client. Cheap to clone; clones share one [`Transport`].
#[derive(Debug, Clone)]
pub struct BeatSaver {
    transport: Arc<Transport>,
}

impl BeatSaver {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(Transport::new(config)?)))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    pub fn with_transport(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// GET `path` and decode it as `T`; `None` on 404.
    pub async fn fetch_single<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: &RequestOptions,
    ) -> Result<Option<T>> {
        let resp = self.transport.get(path, opts).await?;
        if resp.is_not_found() {
            debug!("{} not found", path);
            return Ok(None);
        }
        if !resp.is_success() {
            return Err(Error::UnexpectedStatus {
                url: self.transport.api_path(path)?.to_string(),
                status: resp.status(),
            });
        }
        resp.json().map(Some)
    }

    /// Fetch page `index` of a listing and attach the listing's source to it.
    pub async fn fetch_page(
        &self,
        source: &PageSource,
        index: u32,
        opts: &RequestOptions,
    ) -> Result<Option<Page>> {
        let page: Option<Page> = self.fetch_single(&source.path(index), opts).await?;
        Ok(page.map(|p| p.attach(source.clone())))
    }

    pub async fn maps(&self, order: SortOrder, page: u32, opts: &RequestOptions) -> Result<Option<Page>> {
        let source = PageSource::new(format!("maps/{}", order));
        self.fetch_page(&source, page, opts).await
    }

    pub async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        page: u32,
        opts: &RequestOptions,
    ) -> Result<Option<Page>> {
        let source = PageSource::new(format!("search/{}", kind.as_str())).with_query(query);
        self.fetch_page(&source, page, opts).await
    }

    pub async fn map_by_key(&self, key: &str, opts: &RequestOptions) -> Result<Option<Beatmap>> {
        self.fetch_single(&format!("maps/detail/{}", encode_path_segment(key)?), opts)
            .await
    }

    pub async fn map_by_hash(&self, hash: &str, opts: &RequestOptions) -> Result<Option<Beatmap>> {
        self.fetch_single(&format!("maps/by-hash/{}", encode_path_segment(hash)?), opts)
            .await
    }

    pub async fn user(&self, id: &str, opts: &RequestOptions) -> Result<Option<User>> {
        self.fetch_single(&format!("users/find/{}", encode_path_segment(id)?), opts)
            .await
    }

    /// Maps uploaded by a user.
    pub async fn user_maps(&self, user_id: &str, page: u32, opts: &RequestOptions) -> Result<Option<Page>> {
        let source = PageSource::new(format!("maps/uploader/{}", encode_path_segment(user_id)?));
        self.fetch_page(&source, page, opts).await
    }

    /// Current state of `map`, looked up by hash.
    pub async fn refresh(&self, map: &Beatmap, opts: &RequestOptions) -> Result<Option<Beatmap>> {
        self.map_by_hash(&map.hash, opts).await
    }

    /// Vote on a map as a Steam user. `ticket` is the hex auth ticket.
    ///
    /// Returns the updated map, or `None` when the key is unknown.
    pub async fn vote(
        &self,
        key: &str,
        direction: VoteDirection,
        steam_id: &str,
        ticket: &str,
        opts: &RequestOptions,
    ) -> Result<Option<Beatmap>> {
        let payload = VotePayload {
            steam_id,
            ticket,
            direction: direction.wire(),
        };
        let path = format!("vote/steam/{}", encode_path_segment(key)?);
        let resp = self.transport.post_json(&path, &payload, opts).await?;

        if resp.is_not_found() {
            return Ok(None);
        }
        if resp.is_success() {
            info!("vote {:?} recorded for {}", direction, key);
            return resp.json().map(Some);
        }

        let err: RestError = match resp.json() {
            Ok(err) => err,
            Err(_) => {
                return Err(Error::UnexpectedStatus {
                    url: self.transport.api_path(&path)?.to_string(),
                    status: resp.status(),
                })
            }
        };
        Err(match err.identifier.as_str() {
            "ERR_INVALID_STEAM_ID" | "ERR_STEAM_ID_MISMATCH" => Error::InvalidIdentity {
                steam_id: steam_id.to_string(),
            },
            "ERR_INVALID_TICKET" | "ERR_BAD_TICKET" => Error::InvalidCredential,
            _ => Error::VoteRejected {
                status: resp.status(),
                code: err.code,
                identifier: err.identifier.clone(),
            },
        })
    }

    /// Download the map archive. `direct` skips the download counter.
    pub async fn download_zip(&self, map: &Beatmap, direct: bool, opts: &RequestOptions) -> Result<Vec<u8>> {
        let link = if direct {
            &map.direct_download
        } else {
            &map.download_url
        };
        self.download(link, opts).await
    }

    pub async fn cover_image(&self, map: &Beatmap, opts: &RequestOptions) -> Result<Vec<u8>> {
        self.download(&map.cover_url, opts).await
    }

    async fn download(&self, link: &str, opts: &RequestOptions) -> Result<Vec<u8>> {
        let url = self.transport.host_path(link)?;
        let resp = self.transport.get_url(url.clone(), opts).await?;
        if !resp.is_success() {
            return Err(Error::UnexpectedStatus {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        Ok(resp.into_bytes())
    }
}
