//! Generic authenticated HTTP passthrough.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use url::{ParseError, Url};

use super::VlmClient;
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};
use crate::transport::{FormPart, Method, RequestBody};
use crate::types::UploadFile;

/// Methods supported by [`VlmClient::passthrough`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PassthroughMethod {
    #[default]
    Get,
    Post,
}

impl From<PassthroughMethod> for Method {
    fn from(method: PassthroughMethod) -> Self {
        match method {
            PassthroughMethod::Get => Method::GET,
            PassthroughMethod::Post => Method::POST,
        }
    }
}

/// A name/value pair used for headers, query parameters and body fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Body of a passthrough `POST`.
#[derive(Debug, Clone, PartialEq)]
pub enum PassthroughBody {
    /// JSON object built from the fields.
    ///
    /// Values that parse as JSON are embedded as parsed JSON.
    Json(Vec<KeyValue>),
    /// `multipart/form-data` with an optional file part named `file`.
    Form {
        fields: Vec<KeyValue>,
        file: Option<UploadFile>,
    },
}

impl PassthroughBody {
    fn is_empty(&self) -> bool {
        match self {
            PassthroughBody::Json(fields) => fields.is_empty(),
            PassthroughBody::Form { fields, file } => fields.is_empty() && file.is_none(),
        }
    }

    fn into_request_body(self) -> RequestBody {
        match self {
            PassthroughBody::Json(fields) => {
                let object: Map<String, Value> = fields
                    .into_iter()
                    .map(|kv| (kv.key, parse_json_value(kv.value)))
                    .collect();
                RequestBody::Json(Value::Object(object))
            }
            PassthroughBody::Form { fields, file } => {
                let file_part = file.map(|file| FormPart::File {
                    name: "file".to_owned(),
                    data: file.data,
                    file_name: file.file_name,
                    mime_type: file.mime_type,
                });
                let text_parts = fields.into_iter().map(|kv| FormPart::Text {
                    name: kv.key,
                    value: kv.value,
                });
                RequestBody::Multipart(file_part.into_iter().chain(text_parts).collect())
            }
        }
    }
}

/// An arbitrary call against the API base URL.
///
/// `None` means the list is not used. `Some` with an empty list is rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassthroughRequest {
    pub method: PassthroughMethod,
    /// Appended verbatim to the base URL.
    pub path: String,
    pub headers: Option<Vec<KeyValue>>,
    pub query: Option<Vec<KeyValue>>,
    /// Only sent with `POST`.
    pub body: Option<PassthroughBody>,
}

impl PassthroughRequest {
    pub fn new(method: PassthroughMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: Vec<KeyValue>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_query(mut self, query: Vec<KeyValue>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: PassthroughBody) -> Self {
        self.body = Some(body);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.headers.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::validation("Header is required."));
        }
        if self.query.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::validation("Query params are required."));
        }
        if self.method == PassthroughMethod::Post
            && self.body.as_ref().is_some_and(PassthroughBody::is_empty)
        {
            return Err(Error::validation("Provide request body."));
        }
        Ok(())
    }
}

/// Parses `raw` as JSON, falling back to a JSON string.
fn parse_json_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

impl VlmClient {
    /// Sends an authenticated request to `base URL + path`.
    ///
    /// User `Content-Type` headers are dropped and `Authorization` always
    /// carries the configured key. Returns the JSON response, a JSON string
    /// for non-JSON bodies, or `null` for empty ones.
    pub async fn passthrough(&self, request: PassthroughRequest) -> Result<Value> {
        request.validate()?;

        let raw = format!("{}{}", self.credentials().base_url(), request.path);
        let mut url = match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
                return Err(Error::validation(
                    "Invalid URL. Please include the protocol (http:// or https://).",
                ));
            }
            Err(e) => return Err(Error::validation(format!("Invalid URL '{raw}': {e}"))),
        };
        if let Some(query) = &request.query {
            let mut pairs = url.query_pairs_mut();
            for kv in query {
                pairs.append_pair(&kv.key, &kv.value);
            }
        }

        let mut http = self.request(request.method.into(), url);
        for header in request.headers.iter().flatten() {
            if header.key.eq_ignore_ascii_case("content-type")
                || header.key.eq_ignore_ascii_case("authorization")
            {
                continue;
            }
            http.set_header(header.key.as_str(), header.value.as_str());
        }

        if request.method == PassthroughMethod::Post
            && let Some(body) = request.body
        {
            http = http.with_body(body.into_request_body());
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            method = %request.method,
            url = %http.url,
            "Executing passthrough request"
        );

        let response = self.execute(http, "Failed to execute request").await?;
        if response.body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&response.body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&response.body).into_owned())
        }))
    }
}
