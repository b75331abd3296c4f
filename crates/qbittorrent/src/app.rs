use reqwest::Response;
use serde::Serialize;

use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;
use crate::models::JsonMap;
use crate::params::Params;

impl QBittorrentClient {
    /// Get application version
    /// GET /api/v2/app/version
    pub async fn application_version(&self) -> crate::Result<String> {
        self.get_text("app/version", &Params::new()).await
    }

    /// Get Web API version
    /// GET /api/v2/app/webapiVersion
    pub async fn webapi_version(&self) -> crate::Result<String> {
        self.get_text("app/webapiVersion", &Params::new()).await
    }

    /// Get build info (raw JSON text)
    /// GET /api/v2/app/buildInfo
    pub async fn build_info(&self) -> crate::Result<String> {
        self.get_text("app/buildInfo", &Params::new()).await
    }

    /// Shut down the application
    /// POST /api/v2/app/shutdown
    pub async fn shutdown(&self) -> crate::Result<Response> {
        self.post("app/shutdown", &Params::new()).await
    }

    /// Get application preferences
    /// GET /api/v2/app/preferences
    ///
    /// The key set depends on the server version, so the result is a
    /// dynamic map rather than a fixed record.
    pub async fn preferences(&self) -> crate::Result<JsonMap> {
        self.get_json("app/preferences", &Params::new()).await
    }

    /// Set a single preference
    /// POST /api/v2/app/setPreferences
    ///
    /// # Arguments
    /// * `token` - The name of the preference
    /// * `value` - The value, passed through verbatim
    pub async fn set_preferences(&self, token: &str, value: &str) -> crate::Result<Response> {
        let params = Params::new().with("token", token).with("value", value);
        self.post("app/setPreferences", &params).await
    }

    /// Set application preferences
    /// POST /api/v2/app/setPreferences
    ///
    /// # Arguments
    /// * `prefs` - A JSON object containing the preferences to set
    pub async fn set_preferences_json<T: Serialize>(&self, prefs: &T) -> crate::Result<Response> {
        let json_str = serde_json::to_string(prefs).map_err(|e| {
            QBittorrentError::Build(format!("Failed to serialize preferences: {}", e))
        })?;

        let params = Params::new().with("json", json_str);
        self.post("app/setPreferences", &params).await
    }

    /// Get default save path
    /// GET /api/v2/app/defaultSavePath
    pub async fn default_save_path(&self) -> crate::Result<String> {
        self.get_text("app/defaultSavePath", &Params::new()).await
    }
}
