use reqwest::Response;

use crate::client::QBittorrentClient;
use crate::params::{serialize_list, Params};

impl QBittorrentClient {
    /// Get global transfer info (raw JSON text)
    /// GET /api/v2/transfer/info
    pub async fn transfer_info(&self) -> crate::Result<String> {
        self.get_text("transfer/info", &Params::new()).await
    }

    /// Whether alternative speed limits are enabled (`"1"`) or not (`"0"`)
    /// GET /api/v2/transfer/speedLimitsMode
    pub async fn speed_limits_mode(&self) -> crate::Result<String> {
        self.get_text("transfer/speedLimitsMode", &Params::new()).await
    }

    /// Toggle alternative speed limits
    /// POST /api/v2/transfer/toggleSpeedLimitsMode
    pub async fn toggle_speed_limits_mode(&self) -> crate::Result<Response> {
        self.post("transfer/toggleSpeedLimitsMode", &Params::new()).await
    }

    /// Global download limit in bytes/s (`"0"` = unlimited)
    /// GET /api/v2/transfer/downloadLimit
    pub async fn global_download_limit(&self) -> crate::Result<String> {
        self.get_text("transfer/downloadLimit", &Params::new()).await
    }

    /// Set global download limit
    /// POST /api/v2/transfer/setDownloadLimit
    ///
    /// # Arguments
    /// * `limit` - Bytes/s, `0` for unlimited
    pub async fn set_global_download_limit(&self, limit: i64) -> crate::Result<Response> {
        let params = Params::new().with("limit", limit.to_string());
        self.post("transfer/setDownloadLimit", &params).await
    }

    /// Global upload limit in bytes/s (`"0"` = unlimited)
    /// GET /api/v2/transfer/uploadLimit
    pub async fn global_upload_limit(&self) -> crate::Result<String> {
        self.get_text("transfer/uploadLimit", &Params::new()).await
    }

    /// Set global upload limit
    /// POST /api/v2/transfer/setUploadLimit
    ///
    /// # Arguments
    /// * `limit` - Bytes/s, `0` for unlimited
    pub async fn set_global_upload_limit(&self, limit: i64) -> crate::Result<Response> {
        let params = Params::new().with("limit", limit.to_string());
        self.post("transfer/setUploadLimit", &params).await
    }

    /// Ban peers
    /// POST /api/v2/transfer/banPeers
    ///
    /// # Arguments
    /// * `peers` - `host:port` entries
    pub async fn ban_peers(&self, peers: &[&str]) -> crate::Result<Response> {
        self.post("transfer/banPeers", &serialize_list("peers", peers)).await
    }
}
