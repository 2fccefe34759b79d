use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::creation::NewPatient;
use crate::patient::{self, PatientRecord};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    /// Extra header sent with every request, `Key: Value`.
    pub header: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            proxy: None,
            header: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("invalid header '{header}', expected 'Key: Value'")]
    InvalidHeader { header: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode patient list: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

/// HTTP access to the patient backend (`{base}/user`).
#[derive(Clone, Debug)]
pub struct PatientClient {
    http: reqwest::Client,
    users_url: String,
}

impl PatientClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let base = options.base_url.trim();
        if reqwest::Url::parse(base).is_err() {
            return Err(ClientError::InvalidBaseUrl {
                url: options.base_url.clone(),
            });
        }
        let users_url = format!("{}/user", base.trim_end_matches('/'));
        let http = build_http_client(options)?;
        Ok(Self { http, users_url })
    }

    pub fn users_url(&self) -> &str {
        &self.users_url
    }

    /// `GET /user`, expecting `{ "data": [...] }`.
    pub async fn list_patients(&self) -> Result<Vec<PatientRecord>, ClientError> {
        tracing::debug!(url = %self.users_url, "fetching patient list");
        let response = self
            .http
            .get(&self.users_url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: self.users_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        let decoded =
            patient::decode_patient_list(&body).map_err(|e| ClientError::Decode { source: e })?;
        tracing::info!(
            count = decoded.records.len(),
            skipped = decoded.skipped,
            "patient list loaded"
        );
        Ok(decoded.records)
    }

    /// `POST /user` with a JSON body. Any 2xx is an acknowledgement.
    pub async fn create_patient(&self, patient: &NewPatient) -> Result<(), ClientError> {
        tracing::debug!(url = %self.users_url, name = %patient.name, "creating patient");
        let response = self
            .http
            .post(&self.users_url)
            .json(patient)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: self.users_url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn request_error(&self, source: reqwest::Error) -> ClientError {
        ClientError::Request {
            url: self.users_url.clone(),
            source,
        }
    }
}

fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client, ClientError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            "patientdesk/",
            env!("CARGO_PKG_VERSION")
        )),
    );
    if let Some(raw) = options.header.as_deref().filter(|h| !h.trim().is_empty()) {
        let (key, value) = parse_header(raw)?;
        headers.insert(key, value);
    }

    let timeout = Duration::from_secs(options.timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout);

    if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| ClientError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ClientError::HttpClientBuild { source: e })
}

fn parse_header(
    raw: &str,
) -> Result<(reqwest::header::HeaderName, reqwest::header::HeaderValue), ClientError> {
    let invalid = || ClientError::InvalidHeader {
        header: raw.to_string(),
    };
    let (key, value) = raw.split_once(':').ok_or_else(invalid)?;
    let key = reqwest::header::HeaderName::from_str(key.trim()).map_err(|_| invalid())?;
    let value = reqwest::header::HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((key, value))
}
