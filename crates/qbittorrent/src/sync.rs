use crate::client::QBittorrentClient;
use crate::params::Params;

impl QBittorrentClient {
    /// Get main data (raw JSON text)
    /// GET /api/v2/sync/maindata
    ///
    /// # Arguments
    /// * `rid` - Response ID of the previous call, `0` for a full update
    pub async fn main_data(&self, rid: i64) -> crate::Result<String> {
        let params = Params::new().with("rid", rid.to_string());
        self.get_text("sync/maindata", &params).await
    }

    /// Get peers of a torrent (raw JSON text)
    /// GET /api/v2/sync/torrentPeers
    ///
    /// # Arguments
    /// * `hash` - The torrent hash
    /// * `rid` - Response ID of the previous call, `0` for a full update
    pub async fn torrent_peers(&self, hash: &str, rid: i64) -> crate::Result<String> {
        let params = Params::new()
            .with("hash", hash)
            .with("rid", rid.to_string());
        self.get_text("sync/torrentPeers", &params).await
    }
}
