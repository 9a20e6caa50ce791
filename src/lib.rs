//! Client for the BeatSaver map catalog.
//!
//! All network I/O goes through [`http::Transport`], which streams bodies
//! with progress reporting and cooperative cancellation, surfaces HTTP 429
//! as [`Error::RateLimited`], and hands back a [`http::BufferedResponse`]
//! that can be decoded any number of times. Lookups return `Ok(None)` on
//! 404. Listings come back as a [`Page`] that knows how to fetch its
//! neighbours.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod page;
pub mod types;

pub use client::{BeatSaver, SearchKind, SortOrder, VoteDirection};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{BufferedResponse, RateLimitInfo, RequestOptions, Transport};
pub use page::{Page, PageSource};
pub use tokio_util::sync::CancellationToken;
pub use types::{Beatmap, RestError, User};
