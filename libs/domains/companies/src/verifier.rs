//! Tax ID (CNPJ) verification against the CNPJá lookup service.
//!
//! [`TaxIdVerifier::verify`] has three outcomes:
//!
//! - `Ok(Some(record))`: the registry knows the tax ID
//! - `Ok(None)`: malformed or unknown tax ID
//! - `Err(VerifierError::Unavailable)`: the service could not answer (timeout,
//!   rate limit, 5xx, unreadable body)

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use strum::{Display, EnumString};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://open.cnpja.com";

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("Tax ID verifier unavailable: {0}")]
    Unavailable(String),

    #[error("Tax ID verifier misconfigured: {0}")]
    Configuration(String),
}

/// What the registry reports for a tax ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxIdRecord {
    pub tax_id: String,
    pub active: bool,
    pub registered_name: String,
    pub status_id: Option<i32>,
    pub status_text: Option<String>,
}

impl TaxIdRecord {
    pub fn active(tax_id: impl Into<String>, registered_name: impl Into<String>) -> Self {
        Self {
            tax_id: tax_id.into(),
            active: true,
            registered_name: registered_name.into(),
            status_id: Some(2),
            status_text: Some("Ativa".to_string()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxIdVerifier: Send + Sync {
    async fn verify(&self, tax_id: &str) -> Result<Option<TaxIdRecord>, VerifierError>;
}

// ===== Configuration =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VerifierMode {
    /// Live CNPJá lookups
    #[default]
    Cnpja,
    /// Offline verifier accepting any 14-digit tax ID
    Static,
}

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub mode: VerifierMode,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            mode: VerifierMode::Cnpja,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl FromEnv for VerifierConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs: u64 = env_parse("CNPJA_TIMEOUT_SECS", "10")?;

        Ok(Self {
            mode: env_parse("VERIFIER_MODE", "cnpja")?,
            base_url: env_or_default("CNPJA_BASE_URL", DEFAULT_BASE_URL),
            api_key: env_optional("CNPJA_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// ===== CNPJá client =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfficeResponse {
    #[serde(default)]
    tax_id: Option<String>,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    company: Option<CompanyPayload>,
    #[serde(default)]
    status: Option<StatusPayload>,
}

#[derive(Debug, Deserialize)]
struct CompanyPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<StatusPayload>,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    id: Option<i32>,
    #[serde(default)]
    text: Option<String>,
}

impl OfficeResponse {
    fn into_record(self, requested: &str) -> TaxIdRecord {
        let (name, company_status) = match self.company {
            Some(company) => (company.name, company.status),
            None => (None, None),
        };
        let status = self.status.or(company_status);
        let status_id = status.as_ref().and_then(|s| s.id);
        let status_text = status.and_then(|s| s.text);

        // Without an explicit flag the registration status text decides
        let active = self.active.unwrap_or_else(|| {
            status_text
                .as_deref()
                .is_some_and(|text| text.eq_ignore_ascii_case("ativa"))
        });

        TaxIdRecord {
            tax_id: self.tax_id.unwrap_or_else(|| requested.to_string()),
            active,
            registered_name: name.unwrap_or_default(),
            status_id,
            status_text,
        }
    }
}

/// HTTP client for `GET {base_url}/office/{tax_id}`.
#[derive(Clone)]
pub struct CnpjaClient {
    base_url: Url,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl CnpjaClient {
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| VerifierError::Configuration(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(VerifierError::Configuration(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pricewhisper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VerifierError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url,
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    fn office_url(&self, tax_id: &str) -> Url {
        let mut url = self.base_url.clone();
        // checked in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("office").push(tax_id);
        }
        url
    }
}

#[async_trait]
impl TaxIdVerifier for CnpjaClient {
    async fn verify(&self, tax_id: &str) -> Result<Option<TaxIdRecord>, VerifierError> {
        let mut request = self.http_client.get(self.office_url(tax_id));
        if let Some(api_key) = &self.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                VerifierError::Unavailable("request timed out".to_string())
            } else {
                VerifierError::Unavailable(format!("request failed: {}", e))
            }
        })?;

        match response.status() {
            StatusCode::OK => {
                let office: OfficeResponse = response.json().await.map_err(|e| {
                    VerifierError::Unavailable(format!("unreadable response: {}", e))
                })?;

                let record = office.into_record(tax_id);
                tracing::debug!(
                    tax_id = %record.tax_id,
                    active = record.active,
                    "Tax ID verified"
                );
                Ok(Some(record))
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                tracing::debug!(tax_id = %tax_id, status = %response.status(), "Tax ID rejected");
                Ok(None)
            }
            status => Err(VerifierError::Unavailable(format!(
                "CNPJá returned {}",
                status
            ))),
        }
    }
}

// ===== Static verifier =====

/// In-memory verifier for tests and offline development.
#[derive(Debug, Clone, Default)]
pub struct StaticTaxIdVerifier {
    records: HashMap<String, TaxIdRecord>,
    accept_well_formed: bool,
}

impl StaticTaxIdVerifier {
    /// Knows nothing until records are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats every 14-digit tax ID as an active registration.
    pub fn well_formed() -> Self {
        Self {
            records: HashMap::new(),
            accept_well_formed: true,
        }
    }

    pub fn with_record(mut self, record: TaxIdRecord) -> Self {
        self.records.insert(record.tax_id.clone(), record);
        self
    }
}

fn is_well_formed(tax_id: &str) -> bool {
    tax_id.len() == 14 && tax_id.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl TaxIdVerifier for StaticTaxIdVerifier {
    async fn verify(&self, tax_id: &str) -> Result<Option<TaxIdRecord>, VerifierError> {
        if let Some(record) = self.records.get(tax_id) {
            return Ok(Some(record.clone()));
        }

        if self.accept_well_formed && is_well_formed(tax_id) {
            return Ok(Some(TaxIdRecord::active(tax_id, "")));
        }

        Ok(None)
    }
}
