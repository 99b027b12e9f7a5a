use std::sync::Arc;

use futures_util::FutureExt;
use reqwest::{Client, StatusCode};
use session_state::SessionStore;
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::error::{parse_error_message, TransportError};
use crate::headers::{bearer_value, to_header_map, HEADER_AUTHORIZATION};
use crate::navigator::Navigator;
use crate::refresh::{RefreshFailure, RefreshGate};
use crate::request::{ApiRequest, ApiResponse};
use crate::url::{join_url, same_path};

/// Request function shared by every resource client.
pub struct AuthTransport {
    http: Client,
    config: TransportConfig,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    gate: RefreshGate,
}

impl AuthTransport {
    pub fn new(
        config: TransportConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build().map_err(TransportError::from)?;

        Ok(Self {
            http,
            config,
            session,
            navigator,
            gate: RefreshGate::new(),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Sends a request, recovering at most once from an authorization failure.
    ///
    /// Recovery applies only to a 401 on a non-refresh target that has not been
    /// replayed yet; every other failure propagates unchanged. N requests
    /// failing while no refresh is in flight produce exactly one refresh call,
    /// and all of them settle on that call's outcome.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, TransportError> {
        loop {
            // A send error carries no response to recover from; propagate it.
            let response = self.send_once(&request).await?;

            if response.status == StatusCode::UNAUTHORIZED {
                if same_path(&request.path, &self.config.refresh_path) {
                    // A rejected refresh target must never recurse into
                    // another refresh attempt.
                    return Err(status_error(&response));
                }
                if request.retried {
                    return Err(status_error(&response));
                }

                request.retried = true;
                self.restore_session().await?;
                debug!(path = %request.path, "replaying request with refreshed credential");
                continue;
            }

            if !response.status.is_success() {
                return Err(status_error(&response));
            }

            return Ok(response);
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = join_url(&self.config.base_url, &request.path);
        let mut headers = request.headers.clone();

        // Credential hook: the refresh target is exempt so a stale bearer can
        // never shadow the cookie the refresh endpoint authenticates with.
        if !same_path(&request.path, &self.config.refresh_path) {
            if let Some(token) = self.session.token() {
                headers.insert(HEADER_AUTHORIZATION.to_owned(), bearer_value(&token));
            }
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(to_header_map(&headers)?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(TransportError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(TransportError::from)?;
        Ok(ApiResponse { status, body })
    }

    /// Runs the single-flight refresh protocol and maps its failure to the
    /// distinguished session-expired error.
    async fn restore_session(&self) -> Result<(), TransportError> {
        let http = self.http.clone();
        let refresh_url = join_url(&self.config.base_url, &self.config.refresh_path);
        let session = Arc::clone(&self.session);
        let navigator = Arc::clone(&self.navigator);

        self.gate
            .run(move || refresh_once(http, refresh_url, session, navigator).boxed())
            .await
            .map(|_token| ())
            .map_err(|failure| TransportError::SessionExpired(failure.message().to_owned()))
    }
}

fn status_error(response: &ApiResponse) -> TransportError {
    TransportError::Status(
        response.status,
        parse_error_message(response.status, &response.body),
    )
}

/// One refresh call. Side effects run here, inside the single-flight future,
/// so they happen exactly once no matter how many requests are attached.
async fn refresh_once(
    http: Client,
    refresh_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
) -> Result<String, RefreshFailure> {
    match request_new_token(&http, &refresh_url).await {
        Ok(token) => {
            session.set_token(token.clone());
            debug!("session credential refreshed");
            Ok(token)
        }
        Err(failure) => {
            warn!(error = %failure, "session restore failed; logging out");
            session.logout();
            if !navigator.at_login() {
                navigator.goto_login();
            }
            Err(failure)
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshReply {
    access_token: Option<String>,
}

/// The refresh endpoint authenticates via a same-origin cookie, never via the
/// bearer header; the request is built outside the credential hook.
async fn request_new_token(http: &Client, refresh_url: &str) -> Result<String, RefreshFailure> {
    let response = http
        .post(refresh_url)
        .send()
        .await
        .map_err(|error| RefreshFailure::new(format!("refresh call failed: {error}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RefreshFailure::new(format!(
            "refresh endpoint returned HTTP {status}"
        )));
    }

    let reply = response
        .json::<RefreshReply>()
        .await
        .map_err(|error| RefreshFailure::new(format!("malformed refresh reply: {error}")))?;

    match reply
        .access_token
        .filter(|token| !token.trim().is_empty())
    {
        Some(token) => Ok(token),
        None => Err(RefreshFailure::new("refresh endpoint returned no credential")),
    }
}
