use reqwest::cookie::Jar;
use reqwest::header::SET_COOKIE;
use reqwest::{Response, StatusCode};

use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;
use crate::params::Params;

impl QBittorrentClient {
    /// Login to qBittorrent WebUI
    /// POST /api/v2/auth/login
    ///
    /// Succeeds only when the response carries a session cookie and the
    /// status is exactly `200 OK`. The first well-formed cookie becomes the
    /// session cookie for every later request on this client; on failure the
    /// previous session is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> crate::Result<()> {
        let params = Params::new()
            .with("username", username)
            .with("password", password);
        let response = self.post("auth/login", &params).await?;

        let status = response.status();
        let Some(jar) = self.first_session_jar(&response) else {
            tracing::warn!(
                status = status.as_u16(),
                "qBittorrent login returned no session cookie"
            );
            return Err(QBittorrentError::MissingSessionCookie);
        };
        if status != StatusCode::OK {
            tracing::warn!(
                status = status.as_u16(),
                "qBittorrent rejected the login, the client IP may be banned"
            );
            return Err(QBittorrentError::AuthRejected {
                status: status.as_u16(),
            });
        }

        self.install_session(jar);
        tracing::info!("Logged in to qBittorrent");
        Ok(())
    }

    /// Logout from qBittorrent WebUI
    /// GET /api/v2/auth/logout
    ///
    /// Once the request went out the local session is dropped as well, so
    /// [`is_authenticated`](Self::is_authenticated) reports `false`.
    pub async fn logout(&self) -> crate::Result<Response> {
        let response = self.get("auth/logout", &Params::new()).await?;
        self.clear_session();
        tracing::info!("Logged out of qBittorrent");
        Ok(response)
    }

    /// Session jar from the first `Set-Cookie` header that parses
    fn first_session_jar(&self, response: &Response) -> Option<Jar> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| self.session_jar(value))
    }
}
