//! Client for the qBittorrent WebUI API (v2).
//!
//! [`QBittorrentClient`] holds the authenticated session; every API call is a
//! method on it. Bulk torrent commands take a [`Target`] so the same call
//! covers one torrent, a list, or all of them.

mod app;
mod auth;
mod categories;
mod client;
mod config;
mod error;
pub mod models;
mod params;
mod sync;
mod target;
mod torrents;
mod transfer;

pub use client::QBittorrentClient;
pub use config::ClientConfig;
pub use error::QBittorrentError;
pub use models::{
    AddTorrentRequest, JsonMap, TorrentFile, TorrentFilter, TorrentInfo, TorrentInfoRequest,
    TorrentProperties, Tracker, WebSeed,
};
pub use params::{serialize_list, Params};
pub use target::Target;

pub use reqwest::Response;

pub type Result<T> = std::result::Result<T, QBittorrentError>;
