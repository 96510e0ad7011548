use crate::config::{ClientConfig, Credentials};
use crate::error::{Result, TeamCityError};
use crate::queue::QueueService;
use log::{debug, error, warn};
use reqwest::{header, Client, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

/// HTTP client for the TeamCity REST API
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TeamCityClient {
    rest: RestHelper,
    build_queue: QueueService,
}

impl TeamCityClient {
    /// Create a new client with a default HTTP client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use teamcity_queue::{Credentials, TeamCityClient};
    ///
    /// let client = TeamCityClient::new("http://localhost:8111", Credentials::token("t0k3n")).unwrap();
    /// ```
    pub fn new(base_url: impl AsRef<str>, credentials: Credentials) -> Result<Self> {
        Self::with_client(base_url, credentials, Client::new())
    }

    /// Create a new client with a custom reqwest client
    ///
    /// Timeouts, proxies and TLS settings all come from `client`.
    pub fn with_client(
        base_url: impl AsRef<str>,
        credentials: Credentials,
        client: Client,
    ) -> Result<Self> {
        let root = rest_root(base_url.as_ref(), &credentials)?;
        let rest = RestHelper {
            client,
            base: root,
            credentials,
        };
        let build_queue = QueueService::new(rest.nested("buildQueue/")?);

        Ok(Self { rest, build_queue })
    }

    /// Create a client from configuration, building an HTTP client with the
    /// configured timeout
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(&config.base_url, config.credentials.clone(), client)
    }

    /// Operations on the server's build queue
    pub fn build_queue(&self) -> &QueueService {
        &self.build_queue
    }

    /// Check that the server's REST API answers
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use teamcity_queue::{Credentials, TeamCityClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = TeamCityClient::new("http://localhost:8111", Credentials::Guest)?;
    /// let is_healthy = client.health_check().await?;
    /// println!("Server healthy: {}", is_healthy);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn health_check(&self) -> Result<bool> {
        let url = self.rest.resource_url("server")?;
        debug!("Checking server health at {}", url);

        let response = self.rest.authorize(self.rest.client.get(url)).send().await?;
        Ok(response.status().is_success())
    }

    /// REST root this client talks to, e.g. `http://host/app/rest/`
    pub fn rest_url(&self) -> &Url {
        &self.rest.base
    }
}

/// Normalize the server URL and append the REST prefix for `credentials`
fn rest_root(base_url: &str, credentials: &Credentials) -> Result<Url> {
    let mut base = Url::parse(base_url).map_err(|e| TeamCityError::InvalidUrl(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(TeamCityError::InvalidUrl(format!(
            "{base_url} cannot be used as a base URL"
        )));
    }
    // Without the trailing slash `join` would replace a context path such as `/teamcity`.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(credentials.rest_prefix())
        .map_err(|e| TeamCityError::InvalidUrl(e.to_string()))
}

/// Shared request plumbing for the resource services
#[derive(Debug, Clone)]
pub(crate) struct RestHelper {
    client: Client,
    base: Url,
    credentials: Credentials,
}

impl RestHelper {
    /// Helper rooted at `path` below this one; `path` must end with `/`
    pub(crate) fn nested(&self, path: &str) -> Result<Self> {
        let base = self
            .base
            .join(path)
            .map_err(|e| TeamCityError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client: self.client.clone(),
            base,
            credentials: self.credentials.clone(),
        })
    }

    /// URL of `segment` below the base; an empty segment is the base itself
    pub(crate) fn resource_url(&self, segment: &str) -> Result<Url> {
        let mut url = self.base.clone();
        if segment.is_empty() {
            return Ok(url);
        }

        url.path_segments_mut()
            .map_err(|_| TeamCityError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    pub(crate) async fn get<T>(&self, segment: &str, operation: &'static str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.resource_url(segment)?;
        debug!("{}: GET {}", operation, url);

        let request = self.client.get(url);
        self.send(request, operation).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        segment: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.resource_url(segment)?;
        let payload = serde_json::to_vec(body).map_err(|e| {
            error!("{}: failed to serialize request body: {}", operation, e);
            TeamCityError::serialization(operation, e)
        })?;
        debug!("{}: POST {}", operation, url);

        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(request, operation).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Guest => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => request.bearer_auth(token),
        }
    }

    async fn send<T>(&self, request: RequestBuilder, operation: &'static str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .authorize(request)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("{}: request failed: {}", operation, e);
                TeamCityError::Http(e)
            })?;

        Self::handle_response(response, operation).await
    }

    async fn handle_response<T>(response: Response, operation: &'static str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("{}: could not read error body: {}", operation, e);
                String::new()
            });
            warn!("{}: server answered {}: {}", operation, status, body);
            return Err(TeamCityError::request(operation, status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("{}: failed to deserialize response: {}", operation, e);
            TeamCityError::serialization(operation, e)
        })
    }
}
