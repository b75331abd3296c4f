use std::fmt;

use parking_lot::RwLock;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderValue, COOKIE, REFERER};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::QBittorrentError;
use crate::params::Params;

const API_PATH: &str = "api/v2/";

/// Cookie jar and login flag, replaced as a unit on login/logout
#[derive(Default)]
struct SessionState {
    jar: Option<Jar>,
    authenticated: bool,
}

/// Authenticated HTTP session against one qBittorrent WebUI instance.
///
/// Every command on this type goes through [`get`](Self::get) or
/// [`post`](Self::post), which add the `Referer` header the WebUI's CSRF
/// protection requires and replay the session cookie stored by
/// [`login`](Self::login). The session state sits behind a lock, so one
/// client can be shared across tasks.
pub struct QBittorrentClient {
    client: Client,
    base_url: Url,
    state: RwLock<SessionState>,
}

impl QBittorrentClient {
    /// Create a client with default settings. No request is made.
    pub fn new(base_url: impl Into<String>) -> crate::Result<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    /// Create a client from connection settings. No request is made.
    pub fn from_config(config: &ClientConfig) -> crate::Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| QBittorrentError::Build(format!("Failed to create HTTP client: {}", e)))?;
        Self::with_client(client, &config.url)
    }

    /// Create a client around a shared reqwest client.
    ///
    /// Session cookies are managed by this type, so the reqwest client does
    /// not need a cookie store of its own.
    pub fn with_client(client: Client, base_url: impl AsRef<str>) -> crate::Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.as_ref())?,
            state: RwLock::new(SessionState::default()),
        })
    }

    /// Build the client from settings and log in when credentials are set
    pub async fn connect(config: &ClientConfig) -> crate::Result<Self> {
        let client = Self::from_config(config)?;
        if let Some((username, password)) = config.login_credentials() {
            client.login(username, password).await?;
        }
        Ok(client)
    }

    /// Session URL, always ending in `/api/v2/`
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().authenticated
    }

    /// Send a GET with `params` encoded as the query string.
    ///
    /// The response is returned as-is: the status code is not inspected.
    pub async fn get(&self, endpoint: &str, params: &Params) -> crate::Result<Response> {
        let request = self.build_request(Method::GET, endpoint, params)?;
        tracing::debug!(endpoint, params = ?params.keys(), "Sending GET request");
        request
            .send()
            .await
            .map_err(|e| QBittorrentError::transport(endpoint, e))
    }

    /// Send a POST with `params` as an `application/x-www-form-urlencoded` body.
    ///
    /// The response is returned as-is: the status code is not inspected.
    pub async fn post(&self, endpoint: &str, params: &Params) -> crate::Result<Response> {
        let request = self.build_request(Method::POST, endpoint, params)?;
        tracing::debug!(endpoint, params = ?params.keys(), "Sending POST request");
        request
            .send()
            .await
            .map_err(|e| QBittorrentError::transport(endpoint, e))
    }

    pub(crate) async fn post_multipart(
        &self,
        endpoint: &str,
        form: Form,
    ) -> crate::Result<Response> {
        let url = self.endpoint_url(endpoint)?;
        let request = self.decorate(self.client.post(url.clone()), &url).multipart(form);
        tracing::debug!(endpoint, "Sending multipart POST request");
        request
            .send()
            .await
            .map_err(|e| QBittorrentError::transport(endpoint, e))
    }

    pub(crate) fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &Params,
    ) -> crate::Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        let request = self.decorate(self.client.request(method.clone(), url.clone()), &url);

        Ok(if method == Method::GET {
            if params.is_empty() {
                request
            } else {
                request.query(params.as_pairs())
            }
        } else {
            request.form(params.as_pairs())
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> crate::Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| QBittorrentError::Build(format!("Invalid endpoint '{}': {}", endpoint, e)))
    }

    /// Referer plus the stored session cookie, if any
    fn decorate(&self, request: RequestBuilder, url: &Url) -> RequestBuilder {
        let request = request.header(REFERER, self.base_url.as_str());
        match self.session_cookie(url) {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    fn session_cookie(&self, url: &Url) -> Option<HeaderValue> {
        self.state.read().jar.as_ref().and_then(|jar| jar.cookies(url))
    }

    /// Fresh jar holding only `set_cookie`, or `None` when the header does
    /// not yield a cookie sent back to the session URL
    pub(crate) fn session_jar(&self, set_cookie: &str) -> Option<Jar> {
        let jar = Jar::default();
        jar.add_cookie_str(set_cookie, &self.base_url);
        jar.cookies(&self.base_url).map(|_| jar)
    }

    /// Replace the session with `jar`
    pub(crate) fn install_session(&self, jar: Jar) {
        let mut state = self.state.write();
        state.jar = Some(jar);
        state.authenticated = true;
    }

    pub(crate) fn clear_session(&self) {
        let mut state = self.state.write();
        state.jar = None;
        state.authenticated = false;
    }

    /// Fail with [`QBittorrentError::Api`] unless the status is 2xx
    pub async fn check_response(response: Response) -> crate::Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QBittorrentError::Api {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    pub(crate) async fn get_text(&self, endpoint: &str, params: &Params) -> crate::Result<String> {
        let response = self.get(endpoint, params).await?;
        self.read_text(endpoint, response).await
    }

    pub(crate) async fn post_text(&self, endpoint: &str, params: &Params) -> crate::Result<String> {
        let response = self.post(endpoint, params).await?;
        self.read_text(endpoint, response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> crate::Result<T> {
        let response = self.get(endpoint, params).await?;
        self.read_json(endpoint, response).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> crate::Result<T> {
        let response = self.post(endpoint, params).await?;
        self.read_json(endpoint, response).await
    }

    /// Body of a successful response as text
    pub(crate) async fn read_text(
        &self,
        endpoint: &str,
        response: Response,
    ) -> crate::Result<String> {
        let response = Self::check_response(response).await?;
        response
            .text()
            .await
            .map_err(|e| QBittorrentError::transport(endpoint, e))
    }

    /// Body of a successful response decoded as JSON
    pub(crate) async fn read_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: Response,
    ) -> crate::Result<T> {
        let body = self.read_text(endpoint, response).await?;
        decode_json(endpoint, &body)
    }
}

impl fmt::Debug for QBittorrentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QBittorrentClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Exactly one trailing `/`, then the API prefix
pub(crate) fn normalize_base_url(base_url: &str) -> crate::Result<Url> {
    let invalid = |message: &str| QBittorrentError::InvalidUrl {
        url: base_url.to_string(),
        message: message.to_string(),
    };

    let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(invalid("expected an absolute http(s) URL"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("base URL must not carry a query or fragment"));
    }

    let trimmed = parsed.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/{}", trimmed, API_PATH)).map_err(|e| invalid(&e.to_string()))
}

pub(crate) fn decode_json<T: DeserializeOwned>(endpoint: &str, body: &str) -> crate::Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        tracing::debug!(endpoint, "Response did not match the expected schema");
        QBittorrentError::Json {
            endpoint: endpoint.to_string(),
            path: e.path().to_string(),
            source: e.into_inner(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::serialize_list;
    use crate::target::Target;

    fn client() -> QBittorrentClient {
        QBittorrentClient::new("http://localhost:8080").unwrap()
    }

    fn body_of(request: &reqwest::Request) -> String {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap_or_default();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        for input in [
            "http://localhost:8080",
            "http://localhost:8080/",
            "http://localhost:8080//",
        ] {
            assert_eq!(
                normalize_base_url(input).unwrap().as_str(),
                "http://localhost:8080/api/v2/"
            );
        }
        assert_eq!(
            normalize_base_url("https://seedbox.example/qbt").unwrap().as_str(),
            "https://seedbox.example/qbt/api/v2/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            QBittorrentClient::new("not a url"),
            Err(QBittorrentError::InvalidUrl { .. })
        ));
        assert!(matches!(
            QBittorrentClient::new("mailto:admin@example.com"),
            Err(QBittorrentError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_with_query_or_fragment_is_rejected() {
        for input in [
            "http://localhost:8080/?x=1",
            "http://localhost:8080?x=1",
            "http://localhost:8080/#top",
            "http://localhost:8080/qbt?x=1#top",
        ] {
            assert!(
                matches!(
                    normalize_base_url(input),
                    Err(QBittorrentError::InvalidUrl { .. })
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn test_session_jar_rejects_unusable_cookies() {
        let client = client();
        assert!(client.session_jar("garbage").is_none());
        assert!(client.session_jar("").is_none());
        assert!(client.session_jar("SID=abc; path=/elsewhere").is_none());
        assert!(client.session_jar("SID=abc; path=/").is_some());
    }

    #[test]
    fn test_new_client_is_not_authenticated() {
        let client = client();
        assert!(!client.is_authenticated());
        assert_eq!(client.base_url(), "http://localhost:8080/api/v2/");
    }

    #[test]
    fn test_get_encodes_query_and_referer() {
        let client = client();
        let params = serialize_list("hashes", &["aaa", "bbb"]).with("deleteFiles", "true");
        let request = client
            .build_request(Method::GET, "torrents/delete", &params)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/v2/torrents/delete?hashes=aaa%7Cbbb&deleteFiles=true"
        );
        assert_eq!(
            request.headers().get(REFERER).unwrap(),
            "http://localhost:8080/api/v2/"
        );
        assert!(request.headers().get(COOKIE).is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn test_get_without_params_has_no_query() {
        let request = client()
            .build_request(Method::GET, "app/version", &Params::new())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/v2/app/version");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_post_encodes_form_body() {
        let client = client();
        let params = Params::new()
            .with("hash", "abc")
            .with("oldPath", "a b/c.mkv")
            .with("newPath", "d&e.mkv");
        let request = client
            .build_request(Method::POST, "torrents/renameFile", &params)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().query(), None);
        assert_eq!(
            request.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(body_of(&request), "hash=abc&oldPath=a+b%2Fc.mkv&newPath=d%26e.mkv");
    }

    #[test]
    fn test_targets_differ_only_in_hashes() {
        let client = client();
        let targets = [
            Target::one("aaa"),
            Target::many(["aaa", "bbb"]),
            Target::All,
        ];
        let requests: Vec<_> = targets
            .into_iter()
            .map(|t| {
                let params = t.into_params("hashes");
                client
                    .build_request(Method::GET, "torrents/pause", &params)
                    .unwrap()
                    .build()
                    .unwrap()
            })
            .collect();

        for request in &requests {
            assert_eq!(request.method(), Method::GET);
            assert_eq!(request.url().path(), "/api/v2/torrents/pause");
        }
        let queries: Vec<_> = requests.iter().map(|r| r.url().query().unwrap()).collect();
        assert_eq!(queries, vec!["hashes=aaa", "hashes=aaa%7Cbbb", "hashes=all"]);
    }

    #[test]
    fn test_session_cookie_is_replayed() {
        let client = client();
        let jar = client.session_jar("SID=abc123; HttpOnly; path=/").unwrap();
        client.install_session(jar);
        assert!(client.is_authenticated());

        let request = client
            .build_request(Method::GET, "torrents/info", &Params::new())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers().get(COOKIE).unwrap(), "SID=abc123");

        client.clear_session();
        assert!(!client.is_authenticated());
        let request = client
            .build_request(Method::POST, "torrents/pause", &Params::new())
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_cookie_without_path_covers_api() {
        let client = client();
        client.install_session(client.session_jar("SID=xyz").unwrap());
        let request = client
            .build_request(Method::GET, "sync/maindata", &Params::new())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers().get(COOKIE).unwrap(), "SID=xyz");
    }

    #[test]
    fn test_decode_json_reports_path() {
        let err = decode_json::<Vec<crate::models::Tracker>>(
            "torrents/trackers",
            r#"[{"url":"udp://t","status":"working"}]"#,
        )
        .unwrap_err();
        match err {
            QBittorrentError::Json { endpoint, path, .. } => {
                assert_eq!(endpoint, "torrents/trackers");
                assert_eq!(path, "[0].status");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_empty_array() {
        let torrents: Vec<crate::models::TorrentInfo> = decode_json("torrents/info", "[]").unwrap();
        assert!(torrents.is_empty());
    }
}
