//! A [`QuerySource`] that GETs a URL built from the query key

use async_trait::async_trait;
use responder_application::{QuerySource, SourceError};
use responder_domain::QueryKey;
use reqwest::Url;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Placeholder replaced by the percent-encoded key in URL templates
pub const KEY_PLACEHOLDER: &str = "{key}";

/// REST endpoint source, e.g. `https://brasilapi.com.br/api/cep/v1/{key}`
#[derive(Debug, Clone)]
pub struct HttpQuerySource {
    url_template: String,
    client: reqwest::Client,
    expect_json: bool,
}

impl HttpQuerySource {
    pub fn new(url_template: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url_template: url_template.into(),
            client,
            expect_json: true,
        }
    }

    /// Whether the body must parse as JSON (and not be an error document)
    pub fn with_expect_json(mut self, expect_json: bool) -> Self {
        self.expect_json = expect_json;
        self
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// The URL requested for `key`.
    ///
    /// `{key}` in the path is encoded as a path segment and `{key}` in the
    /// query as a form value. A template without `{key}` gets the key
    /// appended as a final path segment.
    pub fn url_for(&self, key: &QueryKey) -> Result<Url, SourceError> {
        let template = self.url_template.as_str();
        let mut url = Url::parse(template).map_err(|e| invalid_template(template, e))?;

        if !template.contains(KEY_PLACEHOLDER) {
            url.path_segments_mut()
                .map_err(|_| invalid_template(template, "cannot hold a path"))?
                .pop_if_empty()
                .push(key.as_str());
            return Ok(url);
        }

        let (path, query) = template.split_at(template.find('?').unwrap_or(template.len()));
        let filled = format!(
            "{}{}",
            path.replace(KEY_PLACEHOLDER, &path_encoded(&url, key.as_str())?),
            query.replace(KEY_PLACEHOLDER, &query_encoded(&url, key.as_str())),
        );
        Url::parse(&filled).map_err(|e| invalid_template(template, e))
    }
}

#[async_trait]
impl QuerySource for HttpQuerySource {
    async fn invoke(&self, key: &QueryKey, deadline: Instant) -> Result<String, SourceError> {
        let budget = deadline.saturating_duration_since(Instant::now());
        if budget.is_zero() {
            return Err(SourceError::Timeout);
        }

        let url = self.url_for(key)?;
        debug!("GET {} (budget {:?})", url, budget);

        let response = self
            .client
            .get(url.clone())
            .timeout(budget)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        trace!("{} returned {} bytes", url, body.len());

        if self.expect_json {
            validate_json_payload(&body)?;
        }
        Ok(body)
    }
}

/// Reject bodies that are empty, not JSON, or a JSON error document.
///
/// Some lookup services answer unknown keys with `200 OK` and
/// `{"erro": true}` instead of a 404.
pub fn validate_json_payload(body: &str) -> Result<(), SourceError> {
    if body.trim().is_empty() {
        return Err(SourceError::InvalidResponse("empty body".to_string()));
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SourceError::InvalidResponse(format!("not JSON: {}", e)))?;

    let flagged = match value.get("erro") {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    };
    if flagged {
        return Err(SourceError::InvalidResponse(
            "service reported an error".to_string(),
        ));
    }
    Ok(())
}

fn map_reqwest_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else {
        SourceError::Transport(e.to_string())
    }
}

fn invalid_template(template: &str, reason: impl std::fmt::Display) -> SourceError {
    SourceError::Transport(format!("invalid URL template '{}': {}", template, reason))
}

/// `raw` encoded as a single path segment by `base`'s serializer
fn path_encoded(base: &Url, raw: &str) -> Result<String, SourceError> {
    let mut scratch = base.clone();
    scratch.set_query(None);
    scratch
        .path_segments_mut()
        .map_err(|_| invalid_template(base.as_str(), "cannot hold a path"))?
        .clear()
        .push(raw);
    Ok(scratch.path().trim_start_matches('/').to_string())
}

/// `raw` encoded as an `application/x-www-form-urlencoded` value
fn query_encoded(base: &Url, raw: &str) -> String {
    let mut scratch = base.clone();
    scratch.query_pairs_mut().clear().append_pair("k", raw);
    scratch
        .query()
        .and_then(|q| q.strip_prefix("k="))
        .unwrap_or_default()
        .to_string()
}
