// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use datadesk_core::{DomainKind, Record, User};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const PAGE_SIZE: usize = 500;
const MAX_PAGES: usize = 100;

/// Blocking client for the datadesk backend API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let parsed = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!(
                "api.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }

        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            token,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks the backend health endpoint.
    pub fn ping(&self) -> Result<()> {
        let response = self
            .with_auth(self.http.get(format!("{}/health", self.base_url)))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let health: HealthResponse = response.json().context("decode health response")?;
        if health.status != "healthy" {
            bail!("backend reports status {:?}", health.status);
        }
        Ok(())
    }

    /// The user the configured token authenticates as.
    pub fn current_user(&self) -> Result<User> {
        let response = self
            .with_auth(self.http.get(format!("{}/api/v1/auth/me", self.base_url)))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: UserResponse = response.json().context("decode user response")?;
        parsed
            .data
            .ok_or_else(|| anyhow!("no user in auth response"))
    }

    /// Fetches every record of `domain`, following pagination until the
    /// reported total is reached.
    pub fn list_records(&self, domain: DomainKind) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for page in 1..=MAX_PAGES {
            let request = self
                .http
                .get(format!("{}/api/v1/{}", self.base_url, domain.label()))
                .query(&[("page", page.to_string()), ("page_size", PAGE_SIZE.to_string())]);
            let response = self
                .with_auth(request)
                .send()
                .map_err(|error| connection_error(&self.base_url, error))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(clean_error_response(status, &body));
            }

            let parsed: ListResponse = response
                .json()
                .with_context(|| format!("decode {} page {page}", domain.label()))?;
            if !parsed.success {
                bail!(
                    "backend rejected {} request: {}",
                    domain.label(),
                    parsed.message
                );
            }

            let total = usize::try_from(parsed.total.max(0)).unwrap_or(0);
            let page_len = parsed.data.len();
            records.extend(parsed.data);

            if records.len() >= total || page_len == 0 {
                break;
            }
        }

        Ok(records)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Vec<Record>,
    #[serde(default)]
    total: i64,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: Option<User>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check api.base_url and that the backend is running ({} )",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<DetailEnvelope>(body)
        && let Some(detail) = parsed.detail
        && !detail.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), detail);
    }

    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}
