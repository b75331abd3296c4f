use std::fmt;

use reqwest::multipart::Form;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::QBittorrentError;
use crate::params::Params;
use crate::target::Target;

/// Torrent state filter accepted by `torrents/info`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorrentFilter {
    All,
    Downloading,
    Seeding,
    Completed,
    Paused,
    Resumed,
    Stopped,
    Running,
    Active,
    Inactive,
    Stalled,
    StalledUploading,
    StalledDownloading,
    Errored,
}

impl fmt::Display for TorrentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TorrentFilter::All => "all",
            TorrentFilter::Downloading => "downloading",
            TorrentFilter::Seeding => "seeding",
            TorrentFilter::Completed => "completed",
            TorrentFilter::Paused => "paused",
            TorrentFilter::Resumed => "resumed",
            TorrentFilter::Stopped => "stopped",
            TorrentFilter::Running => "running",
            TorrentFilter::Active => "active",
            TorrentFilter::Inactive => "inactive",
            TorrentFilter::Stalled => "stalled",
            TorrentFilter::StalledUploading => "stalled_uploading",
            TorrentFilter::StalledDownloading => "stalled_downloading",
            TorrentFilter::Errored => "errored",
        };
        write!(f, "{}", s)
    }
}

/// Request parameters for getting torrent list
#[derive(Debug, Clone, Default)]
pub struct TorrentInfoRequest {
    /// Filter by torrent state
    pub filter: Option<TorrentFilter>,
    /// Filter by category (empty string = without category)
    pub category: Option<String>,
    /// Filter by tag (empty string = without tag)
    pub tag: Option<String>,
    /// Sort by any field of the torrent summary
    pub sort: Option<String>,
    /// Reverse the sort order
    pub reverse: Option<bool>,
    /// Maximum number of torrents returned
    pub limit: Option<i64>,
    /// Offset into the list (negative = from the end)
    pub offset: Option<i64>,
    /// Restrict to these torrents
    pub hashes: Option<Target>,
}

impl TorrentInfoRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: TorrentFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort = Some(key.into());
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn hashes(mut self, hashes: impl Into<Target>) -> Self {
        self.hashes = Some(hashes.into());
        self
    }

    /// Query parameters, in the order the WebUI documents them
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(filter) = self.filter {
            params.insert("filter", filter.to_string());
        }
        if let Some(category) = &self.category {
            params.insert("category", category.as_str());
        }
        if let Some(tag) = &self.tag {
            params.insert("tag", tag.as_str());
        }
        if let Some(sort) = &self.sort {
            params.insert("sort", sort.as_str());
        }
        if let Some(reverse) = self.reverse {
            params.insert("reverse", reverse.to_string());
        }
        if let Some(limit) = self.limit {
            params.insert("limit", limit.to_string());
        }
        if let Some(offset) = self.offset {
            params.insert("offset", offset.to_string());
        }
        if let Some(hashes) = &self.hashes {
            params.insert("hashes", hashes.to_param());
        }
        params
    }
}

impl From<TorrentInfoRequest> for Params {
    fn from(request: TorrentInfoRequest) -> Self {
        request.to_params()
    }
}

/// Trait for converting a serializable struct to a multipart form
pub trait IntoForm: Serialize {
    /// Convert this struct to a multipart form by serializing to JSON
    /// and then converting each key-value pair to a form field
    fn into_form(self) -> crate::Result<Form>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(&self)
            .map_err(|e| QBittorrentError::Build(format!("Failed to serialize form: {}", e)))?;
        let Value::Object(obj) = value else {
            return Err(QBittorrentError::Build("Expected a JSON object".into()));
        };

        Ok(obj.into_iter().fold(Form::new(), |form, (k, v)| {
            // Skip null values
            if v.is_null() {
                return form;
            }
            // Convert value to string without quotes for string types
            let v_str = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            form.text(k, v_str)
        }))
    }
}

/// Torrent summary as returned by `torrents/info`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TorrentInfo {
    /// Torrent hash
    pub hash: String,
    /// Torrent name
    pub name: String,
    /// Torrent state (downloading, uploading, pausedDL, pausedUP, stalledDL, stalledUP, checkingDL, checkingUP, ...)
    pub state: String,
    /// Torrent progress (0.0 to 1.0)
    pub progress: f64,
    /// Full path to the torrent's download location
    pub save_path: String,
    /// Path of the torrent's content (root folder or single file)
    pub content_path: String,
    /// Total size of the selected files (bytes)
    pub size: i64,
    /// Total size of all files (bytes)
    pub total_size: i64,
    /// Amount of data downloaded (bytes)
    pub downloaded: i64,
    /// Amount of data uploaded (bytes)
    pub uploaded: i64,
    /// Data left to download (bytes)
    pub amount_left: i64,
    /// Download speed (bytes/s)
    pub dlspeed: i64,
    /// Upload speed (bytes/s)
    pub upspeed: i64,
    /// Download limit (bytes/s, -1 = unlimited)
    pub dl_limit: i64,
    /// Upload limit (bytes/s, -1 = unlimited)
    pub up_limit: i64,
    /// Torrent ETA (seconds)
    pub eta: i64,
    /// Share ratio
    pub ratio: f64,
    /// Per-torrent ratio limit (-2 = global, -1 = unlimited)
    pub ratio_limit: f64,
    /// Per-torrent seeding time limit in minutes (-2 = global, -1 = unlimited)
    pub seeding_time_limit: i64,
    /// Queue position (-1 if not queued)
    pub priority: i64,
    /// Number of connected seeds
    pub num_seeds: i64,
    /// Number of connected leechers
    pub num_leechs: i64,
    /// Seeds in the swarm
    pub num_complete: i64,
    /// Leechers in the swarm
    pub num_incomplete: i64,
    /// Category
    pub category: String,
    /// Tags (comma separated)
    pub tags: String,
    /// Current working tracker
    pub tracker: String,
    /// Magnet URI
    pub magnet_uri: String,
    /// Time when torrent was added (Unix timestamp)
    pub added_on: i64,
    /// Time when torrent completed (Unix timestamp)
    pub completion_on: i64,
    /// Last time data was transferred (Unix timestamp)
    pub last_activity: i64,
    /// Automatic torrent management enabled
    pub auto_tmm: bool,
    /// Force start enabled
    pub force_start: bool,
    /// Sequential download enabled
    pub seq_dl: bool,
    /// First/last piece prioritized
    pub f_l_piece_prio: bool,
    /// Super seeding enabled
    pub super_seeding: bool,
}

impl TorrentInfo {
    /// Check if the torrent download is completed
    ///
    /// A torrent is considered completed when:
    /// - Progress is 100% (>= 1.0)
    /// - State indicates upload-related status (uploading, stalledUP, pausedUP, stoppedUP, forcedUP, queuedUP)
    /// - State indicates checking after download (checkingUP)
    pub fn is_completed(&self) -> bool {
        self.progress >= 1.0
            || matches!(
                self.state.as_str(),
                "uploading"
                    | "stalledUP"
                    | "pausedUP"
                    | "stoppedUP"
                    | "forcedUP"
                    | "queuedUP"
                    | "checkingUP"
            )
    }

    /// Tags split on commas, trimmed
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Detailed properties from `torrents/properties`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TorrentProperties {
    pub save_path: String,
    pub creation_date: i64,
    pub piece_size: i64,
    pub comment: String,
    pub total_wasted: i64,
    pub total_uploaded: i64,
    pub total_uploaded_session: i64,
    pub total_downloaded: i64,
    pub total_downloaded_session: i64,
    pub up_limit: i64,
    pub dl_limit: i64,
    pub time_elapsed: i64,
    pub seeding_time: i64,
    pub nb_connections: i64,
    pub nb_connections_limit: i64,
    pub share_ratio: f64,
    pub addition_date: i64,
    pub completion_date: i64,
    pub created_by: String,
    pub dl_speed_avg: i64,
    pub dl_speed: i64,
    pub eta: i64,
    pub last_seen: i64,
    pub peers: i64,
    pub peers_total: i64,
    pub pieces_have: i64,
    pub pieces_num: i64,
    pub reannounce: i64,
    pub seeds: i64,
    pub seeds_total: i64,
    pub total_size: i64,
    pub up_speed_avg: i64,
    pub up_speed: i64,
}

/// One entry of `torrents/trackers`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tracker {
    /// Tracker URL (or `** [DHT] **` style pseudo entries)
    pub url: String,
    /// 0 disabled, 1 not contacted, 2 working, 3 updating, 4 not working
    pub status: i64,
    /// Tier; older WebUI versions send an empty string for pseudo trackers
    #[serde(deserialize_with = "lenient_i64")]
    pub tier: i64,
    pub num_peers: i64,
    pub num_seeds: i64,
    pub num_leeches: i64,
    pub num_downloaded: i64,
    /// Last tracker message
    pub msg: String,
}

/// One entry of `torrents/webseeds`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebSeed {
    pub url: String,
}

/// File information within a torrent
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TorrentFile {
    /// File index
    pub index: i32,
    /// File name (including relative path)
    pub name: String,
    /// File size (bytes)
    pub size: i64,
    /// File progress (0.0 to 1.0)
    pub progress: f64,
    /// File priority (0 = do not download, 1-7 = priority levels)
    pub priority: i32,
    /// True if file is seeding/complete
    pub is_seed: bool,
    /// First and last piece index of the file
    pub piece_range: Vec<i64>,
    /// Percentage of file pieces currently available
    pub availability: f64,
}

impl TorrentFile {
    /// Check if the file download is completed
    pub fn is_completed(&self) -> bool {
        self.progress >= 1.0
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        let (_, ext) = self.name.rsplit_once('.')?;
        Some(ext)
    }
}

/// Multipart body of `torrents/add`.
///
/// Unset options are left out of the form so the server applies its own
/// defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddTorrentRequest {
    /// HTTP(S) or magnet links, sent newline-separated
    #[serde(serialize_with = "newline_joined")]
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Sent comma-separated
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_joined")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    /// Add in the paused (stopped) state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_checking: Option<bool>,
    /// Automatic torrent management
    #[serde(rename = "autoTMM", skip_serializing_if = "Option::is_none")]
    pub auto_tmm: Option<bool>,
    /// Bytes/s
    #[serde(rename = "dlLimit", skip_serializing_if = "Option::is_none")]
    pub download_limit: Option<i64>,
    /// Bytes/s
    #[serde(rename = "upLimit", skip_serializing_if = "Option::is_none")]
    pub upload_limit: Option<i64>,
}

fn newline_joined<S>(items: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&items.join("\n"))
}

fn comma_joined<S>(items: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&items.join(","))
}

impl AddTorrentRequest {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_urls([url])
    }

    /// Blank entries are dropped
    pub fn with_urls(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            urls: urls
                .into_iter()
                .map(Into::into)
                .filter(|url: &String| !url.trim().is_empty())
                .collect(),
            ..Default::default()
        }
    }

    pub fn savepath(mut self, path: impl Into<String>) -> Self {
        self.savepath = Some(path.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the tag list
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Torrent name shown in the WebUI
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    pub fn skip_checking(mut self, skip: bool) -> Self {
        self.skip_checking = Some(skip);
        self
    }

    pub fn auto_management(mut self, enable: bool) -> Self {
        self.auto_tmm = Some(enable);
        self
    }

    pub fn download_limit(mut self, limit: i64) -> Self {
        self.download_limit = Some(limit);
        self
    }

    pub fn upload_limit(mut self, limit: i64) -> Self {
        self.upload_limit = Some(limit);
        self
    }
}

impl IntoForm for AddTorrentRequest {}

/// Schema-less JSON object (preferences, categories).
///
/// Keys keep the order the server sent them in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct JsonMap(Map<String, Value>);

impl JsonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Nested object, e.g. one category entry
    pub fn get_object(&self, key: &str) -> Option<JsonMap> {
        self.0
            .get(key)
            .and_then(Value::as_object)
            .map(|obj| JsonMap(obj.clone()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for JsonMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or(-1),
        _ => -1,
    })
}
