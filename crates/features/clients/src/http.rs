//! Record gateway over the REST API.
//!
//! Envelopes are mapped back into [`ClientError`]: 404 becomes `NotFound`, 422 with
//! field errors becomes `Validation` or `DuplicateKey`, and anything that is not the
//! expected JSON (proxies answering with HTML, dropped connections) becomes `Transport`.

use crate::error::{ClientError, DUPLICATE_KEY_CODE};
use crate::gateway::ClientGateway;
use crate::model::{ClientId, ClientRecord, NewClient};
use crate::rules::{Field, ValidationReport, Violation, ViolationKind};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use rolo_kernel::domain::constants::{API_PREFIX, CLIENTS_PATH};
use rolo_kernel::envelope::{Envelope, FieldErrors};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, instrument};

const SNIPPET_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// # Errors
    /// Returns [`ClientError::Transport`] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    /// # Errors
    /// Returns [`ClientError::Transport`] if `base_url` is not an absolute http(s) URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::Transport {
            message: e.to_string().into(),
            context: Some(format!("Invalid server URL '{base_url}'").into()),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::Transport {
                message: format!("'{base_url}' is not an http(s) URL").into(),
                context: None,
            });
        }
        Ok(Self { client, base })
    }

    fn url(&self, id: Option<&ClientId>) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::Transport {
                message: format!("'{}' cannot carry a path", self.base).into(),
                context: None,
            })?;
            segments.pop_if_empty();
            segments.extend(
                API_PREFIX.split('/').chain(CLIENTS_PATH.split('/')).filter(|s| !s.is_empty()),
            );
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ClientGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ClientRecord>, ClientError> {
        let url = self.url(None)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;
        let envelope: Envelope<Vec<ClientRecord>> = decode(response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    #[instrument(skip_all, fields(email = %client.email()))]
    async fn create(&self, client: NewClient) -> Result<ClientRecord, ClientError> {
        let url = self.url(None)?;
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&client)
            .send()
            .await
            .map_err(transport)?;
        let envelope: Envelope<ClientRecord> = decode(response).await?;
        envelope.data.ok_or_else(|| ClientError::Transport {
            message: "Server accepted the client but returned no record".into(),
            context: None,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ClientId) -> Result<(), ClientError> {
        let url = self.url(Some(id))?;
        let response = self
            .client
            .delete(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;
        let _: Envelope<IgnoredAny> = decode(response).await?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport {
        message: err.to_string().into(),
        context: err.url().map(|url| format!("Requesting {url}").into()),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ClientError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    let body = response.text().await.map_err(transport)?;
    debug!(%status, bytes = body.len(), "Response received");

    if !is_json {
        let message = non_json_message(status, &body);
        return Err(ClientError::Transport { message: message.into(), context: None });
    }

    if status.is_success() {
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| ClientError::Transport {
            message: e.to_string().into(),
            context: Some("Invalid response from server".into()),
        })?;
        if envelope.success {
            return Ok(envelope);
        }
        return Err(ClientError::Transport { message: envelope.message.into(), context: None });
    }

    let envelope: Envelope<IgnoredAny> =
        serde_json::from_str(&body).map_err(|_| ClientError::Transport {
            message: format!("Error {status}").into(),
            context: Some("Invalid error response from server".into()),
        })?;
    Err(failure(status, envelope))
}

fn failure(status: StatusCode, envelope: Envelope<IgnoredAny>) -> ClientError {
    let Envelope { message, error, errors, .. } = envelope;
    match (status, errors) {
        (StatusCode::NOT_FOUND, _) => {
            ClientError::NotFound { message: message.into(), context: None }
        },
        (StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST, Some(errors))
            if !errors.is_empty() =>
        {
            if error.as_deref() == Some(DUPLICATE_KEY_CODE) {
                duplicate(errors, message)
            } else {
                let report = report_from(&errors, ViolationKind::Format);
                ClientError::Validation { report, context: None }
            }
        },
        _ => {
            let detail =
                error.map_or_else(|| message.clone(), |error| format!("{message}: {error}"));
            ClientError::Transport {
                message: detail.into(),
                context: Some(format!("Status {status}").into()),
            }
        },
    }
}

fn duplicate(errors: FieldErrors, message: String) -> ClientError {
    let (field, reason) = errors
        .into_iter()
        .find_map(|(name, reason)| Field::parse(&name).map(|field| (field, reason)))
        .unwrap_or((Field::Email, message));
    ClientError::DuplicateKey { field, message: reason.into(), context: None }
}

fn report_from(errors: &FieldErrors, kind: ViolationKind) -> ValidationReport {
    errors
        .iter()
        .filter_map(|(name, reason)| {
            Field::parse(name).map(|field| Violation::new(field, kind, reason.clone()))
        })
        .collect()
}

fn non_json_message(status: StatusCode, body: &str) -> String {
    if body.contains("<!DOCTYPE") || body.contains("<html") {
        return format!("Unexpected HTML response from server (status {status})");
    }
    let snippet: String = body.trim().chars().take(SNIPPET_LEN).collect();
    if snippet.is_empty() { format!("Error {status}") } else { snippet }
}
