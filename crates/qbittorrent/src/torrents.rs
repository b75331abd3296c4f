use reqwest::Response;

use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;
use crate::models::{
    AddTorrentRequest, IntoForm, TorrentFile, TorrentInfo, TorrentInfoRequest, TorrentProperties,
    Tracker, WebSeed,
};
use crate::params::{join_list, Params};
use crate::target::Target;

/// `hashes` parameter for a bulk command
fn hashes(target: impl Into<Target>) -> Params {
    target.into().into_params("hashes")
}

fn hash(hash: &str) -> Params {
    Params::new().with("hash", hash)
}

impl QBittorrentClient {
    /// Get torrent list with optional filters
    /// GET /api/v2/torrents/info
    ///
    /// # Arguments
    /// * `request` - Optional request parameters for filtering torrents
    ///
    /// # Example
    /// ```ignore
    /// // Everything the server knows about
    /// let all = client.get_torrents_info(None).await?;
    ///
    /// // Two specific torrents that are still downloading
    /// let request = TorrentInfoRequest::new()
    ///     .filter(TorrentFilter::Downloading)
    ///     .hashes(["8c4a0f", "d1e2b3"]);
    /// let active = client.get_torrents_info(Some(request)).await?;
    ///
    /// // Same query with hand-built parameters
    /// let filters = Params::from([("filter", "downloading"), ("hashes", "8c4a0f|d1e2b3")]);
    /// let active = client.get_torrent_list(&filters).await?;
    /// ```
    pub async fn get_torrents_info(
        &self,
        request: Option<TorrentInfoRequest>,
    ) -> crate::Result<Vec<TorrentInfo>> {
        let params = request.map(Params::from).unwrap_or_default();
        self.get_torrent_list(&params).await
    }

    /// Get torrent list with raw filter parameters
    /// GET /api/v2/torrents/info
    pub async fn get_torrent_list(&self, filters: &Params) -> crate::Result<Vec<TorrentInfo>> {
        self.get_json("torrents/info", filters).await
    }

    /// Get generic properties of a torrent
    /// GET /api/v2/torrents/properties
    pub async fn properties(&self, hash_value: &str) -> crate::Result<TorrentProperties> {
        self.get_json("torrents/properties", &hash(hash_value)).await
    }

    /// Get trackers of a torrent
    /// GET /api/v2/torrents/trackers
    pub async fn trackers(&self, hash_value: &str) -> crate::Result<Vec<Tracker>> {
        self.get_json("torrents/trackers", &hash(hash_value)).await
    }

    /// Get web seeds of a torrent
    /// GET /api/v2/torrents/webseeds
    pub async fn webseeds(&self, hash_value: &str) -> crate::Result<Vec<WebSeed>> {
        self.get_json("torrents/webseeds", &hash(hash_value)).await
    }

    /// Get files for a specific torrent
    /// GET /api/v2/torrents/files
    ///
    /// # Arguments
    /// * `hash` - The torrent hash
    pub async fn get_torrent_files(&self, hash_value: &str) -> crate::Result<Vec<TorrentFile>> {
        self.get_json("torrents/files", &hash(hash_value)).await
    }

    /// Get piece states: 0 not downloaded, 1 downloading, 2 downloaded
    /// GET /api/v2/torrents/pieceStates
    pub async fn piece_states(&self, hash_value: &str) -> crate::Result<Vec<i64>> {
        self.get_json("torrents/pieceStates", &hash(hash_value)).await
    }

    /// Get piece hashes
    /// GET /api/v2/torrents/pieceHashes
    pub async fn piece_hashes(&self, hash_value: &str) -> crate::Result<Vec<String>> {
        self.get_json("torrents/pieceHashes", &hash(hash_value)).await
    }

    /// Pause torrent(s)
    /// GET /api/v2/torrents/pause
    ///
    /// # Arguments
    /// * `target` - One hash, a list of hashes, or [`Target::All`]
    pub async fn pause(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.get("torrents/pause", &hashes(target)).await
    }

    /// Resume torrent(s)
    /// GET /api/v2/torrents/resume
    pub async fn resume(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.get("torrents/resume", &hashes(target)).await
    }

    /// Delete torrent(s)
    /// GET /api/v2/torrents/delete
    ///
    /// # Arguments
    /// * `target` - One hash, a list of hashes, or [`Target::All`]
    /// * `delete_files` - Whether to delete downloaded files
    pub async fn delete_torrents(
        &self,
        target: impl Into<Target>,
        delete_files: bool,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("deleteFiles", delete_files.to_string());
        self.get("torrents/delete", &params).await
    }

    /// Recheck torrent(s)
    /// GET /api/v2/torrents/recheck
    pub async fn recheck(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.get("torrents/recheck", &hashes(target)).await
    }

    /// Reannounce torrent(s) to their trackers
    /// GET /api/v2/torrents/reannounce
    pub async fn reannounce(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.get("torrents/reannounce", &hashes(target)).await
    }

    /// Add new torrent(s) via URLs
    /// POST /api/v2/torrents/add
    ///
    /// Fails with [`QBittorrentError::InvalidTorrent`] before sending when
    /// the request has no URL, and when the server answers `415`.
    pub async fn add_torrent(&self, request: AddTorrentRequest) -> crate::Result<Response> {
        if request.urls.is_empty() {
            return Err(QBittorrentError::InvalidTorrent(
                "At least one URL must be provided".into(),
            ));
        }

        let form = request.into_form()?;
        let response = self.post_multipart("torrents/add", form).await?;

        if response.status().as_u16() == 415 {
            return Err(QBittorrentError::InvalidTorrent(
                "Invalid torrent URL or file".into(),
            ));
        }
        Ok(response)
    }

    /// Add trackers to a torrent
    /// POST /api/v2/torrents/addTrackers
    pub async fn add_trackers(&self, hash_value: &str, urls: &[&str]) -> crate::Result<Response> {
        let params = hash(hash_value).with("urls", urls.join("\n"));
        self.post("torrents/addTrackers", &params).await
    }

    /// Replace one tracker URL of a torrent
    /// POST /api/v2/torrents/editTracker
    pub async fn edit_tracker(
        &self,
        hash_value: &str,
        orig_url: &str,
        new_url: &str,
    ) -> crate::Result<Response> {
        let params = hash(hash_value)
            .with("origUrl", orig_url)
            .with("newUrl", new_url);
        self.post("torrents/editTracker", &params).await
    }

    /// Remove trackers from a torrent
    /// POST /api/v2/torrents/removeTrackers
    pub async fn remove_trackers(
        &self,
        hash_value: &str,
        urls: &[&str],
    ) -> crate::Result<Response> {
        let params = hash(hash_value).with("urls", join_list(urls));
        self.post("torrents/removeTrackers", &params).await
    }

    /// Add peers to torrent(s)
    /// POST /api/v2/torrents/addPeers
    ///
    /// # Arguments
    /// * `peers` - `host:port` entries
    pub async fn add_peers(
        &self,
        target: impl Into<Target>,
        peers: &[&str],
    ) -> crate::Result<Response> {
        let params = hashes(target).with("peers", join_list(peers));
        self.post("torrents/addPeers", &params).await
    }

    /// Move torrent(s) one step up the queue
    /// POST /api/v2/torrents/increasePrio
    pub async fn increase_priority(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.post("torrents/increasePrio", &hashes(target)).await
    }

    /// Move torrent(s) one step down the queue
    /// POST /api/v2/torrents/decreasePrio
    pub async fn decrease_priority(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.post("torrents/decreasePrio", &hashes(target)).await
    }

    /// Move torrent(s) to the top of the queue
    /// POST /api/v2/torrents/topPrio
    pub async fn top_priority(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.post("torrents/topPrio", &hashes(target)).await
    }

    /// Move torrent(s) to the bottom of the queue
    /// POST /api/v2/torrents/bottomPrio
    pub async fn bottom_priority(&self, target: impl Into<Target>) -> crate::Result<Response> {
        self.post("torrents/bottomPrio", &hashes(target)).await
    }

    /// Set file priority
    /// POST /api/v2/torrents/filePrio
    ///
    /// # Arguments
    /// * `file_ids` - File indexes as returned by [`get_torrent_files`](Self::get_torrent_files)
    /// * `priority` - 0 do not download, 1 normal, 6 high, 7 maximal
    pub async fn set_file_priority(
        &self,
        hash_value: &str,
        file_ids: &[i32],
        priority: i32,
    ) -> crate::Result<Response> {
        let ids: Vec<String> = file_ids.iter().map(ToString::to_string).collect();
        let params = hash(hash_value)
            .with("id", join_list(&ids))
            .with("priority", priority.to_string());
        self.post("torrents/filePrio", &params).await
    }

    /// Per-torrent download limits (raw JSON text, hash -> bytes/s)
    /// POST /api/v2/torrents/downloadLimit
    pub async fn download_limit(&self, target: impl Into<Target>) -> crate::Result<String> {
        self.post_text("torrents/downloadLimit", &hashes(target)).await
    }

    /// Set per-torrent download limit
    /// POST /api/v2/torrents/setDownloadLimit
    pub async fn set_download_limit(
        &self,
        target: impl Into<Target>,
        limit: i64,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("limit", limit.to_string());
        self.post("torrents/setDownloadLimit", &params).await
    }

    /// Set share limits
    /// POST /api/v2/torrents/setShareLimits
    ///
    /// # Arguments
    /// * `ratio_limit` - Max ratio, `-2` for the global limit, `-1` for none
    /// * `seeding_time_limit` - Max seeding minutes, `-2` for the global limit, `-1` for none
    pub async fn set_share_limits(
        &self,
        target: impl Into<Target>,
        ratio_limit: f64,
        seeding_time_limit: i64,
    ) -> crate::Result<Response> {
        let params = hashes(target)
            .with("ratioLimit", ratio_limit.to_string())
            .with("seedingTimeLimit", seeding_time_limit.to_string());
        self.post("torrents/setShareLimits", &params).await
    }

    /// Per-torrent upload limits (raw JSON text, hash -> bytes/s)
    /// POST /api/v2/torrents/uploadLimit
    pub async fn upload_limit(&self, target: impl Into<Target>) -> crate::Result<String> {
        self.post_text("torrents/uploadLimit", &hashes(target)).await
    }

    /// Set per-torrent upload limit
    /// POST /api/v2/torrents/setUploadLimit
    pub async fn set_upload_limit(
        &self,
        target: impl Into<Target>,
        limit: i64,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("limit", limit.to_string());
        self.post("torrents/setUploadLimit", &params).await
    }

    /// Set torrent location (move files to new directory)
    /// POST /api/v2/torrents/setLocation
    ///
    /// # Arguments
    /// * `target` - One hash, a list of hashes, or [`Target::All`]
    /// * `location` - The new absolute path for the torrent files
    ///
    /// # Notes
    /// - If the location doesn't exist, it will be created
    /// - Files are physically moved to the new location
    pub async fn set_location(
        &self,
        target: impl Into<Target>,
        location: &str,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("location", location);
        self.post("torrents/setLocation", &params).await
    }

    /// Rename a torrent
    /// POST /api/v2/torrents/rename
    pub async fn rename_torrent(&self, hash_value: &str, name: &str) -> crate::Result<Response> {
        let params = hash(hash_value).with("name", name);
        self.post("torrents/rename", &params).await
    }

    /// Enable or disable automatic torrent management
    /// POST /api/v2/torrents/setAutoManagement
    pub async fn set_auto_management(
        &self,
        target: impl Into<Target>,
        enable: bool,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("enable", enable.to_string());
        self.post("torrents/setAutoManagement", &params).await
    }

    /// Toggle sequential download
    /// POST /api/v2/torrents/toggleSequentialDownload
    pub async fn toggle_sequential_download(
        &self,
        target: impl Into<Target>,
    ) -> crate::Result<Response> {
        self.post("torrents/toggleSequentialDownload", &hashes(target)).await
    }

    /// Toggle first/last piece priority
    /// POST /api/v2/torrents/toggleFirstLastPiecePrio
    pub async fn toggle_first_last_piece_priority(
        &self,
        target: impl Into<Target>,
    ) -> crate::Result<Response> {
        self.post("torrents/toggleFirstLastPiecePrio", &hashes(target)).await
    }

    /// Set force start
    /// POST /api/v2/torrents/setForceStart
    pub async fn set_force_start(
        &self,
        target: impl Into<Target>,
        value: bool,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("value", value.to_string());
        self.post("torrents/setForceStart", &params).await
    }

    /// Set super seeding
    /// POST /api/v2/torrents/setSuperSeeding
    pub async fn set_super_seeding(
        &self,
        target: impl Into<Target>,
        value: bool,
    ) -> crate::Result<Response> {
        let params = hashes(target).with("value", value.to_string());
        self.post("torrents/setSuperSeeding", &params).await
    }

    /// Rename a file in a torrent
    /// POST /api/v2/torrents/renameFile
    ///
    /// # Arguments
    /// * `hash` - The torrent hash
    /// * `old_path` - The old file path (relative to the torrent's root)
    /// * `new_path` - The new file path (relative to the torrent's root)
    pub async fn rename_file(
        &self,
        hash_value: &str,
        old_path: &str,
        new_path: &str,
    ) -> crate::Result<Response> {
        let params = hash(hash_value)
            .with("oldPath", old_path)
            .with("newPath", new_path);
        self.post("torrents/renameFile", &params).await
    }

    /// Rename a folder in a torrent
    /// POST /api/v2/torrents/renameFolder
    pub async fn rename_folder(
        &self,
        hash_value: &str,
        old_path: &str,
        new_path: &str,
    ) -> crate::Result<Response> {
        let params = hash(hash_value)
            .with("oldPath", old_path)
            .with("newPath", new_path);
        self.post("torrents/renameFolder", &params).await
    }
}
