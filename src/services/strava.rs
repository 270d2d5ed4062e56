// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the dashboard's activity snapshot.
//!
//! Handles:
//! - Exchanging the long-lived refresh token for an access token
//! - Paginated listing of the athlete's activities, capped at 5 pages
//!
//! Every request is sent exactly once. There is no retry or backoff; a failed
//! call fails the whole fetch and nothing partial is returned.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::{Config, StravaCredentials};
use crate::error::AppError;
use crate::models::Activity;

/// Hard ceiling on pages fetched per snapshot.
pub const MAX_PAGES: u32 = 5;

/// Page size requested from the activities endpoint.
pub const PER_PAGE: u32 = 100;

/// Short-lived bearer token. Lives only for one fetch cycle.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    oauth_url: String,
    api_url: String,
    credentials: StravaCredentials,
}

impl StravaClient {
    /// Create a client from the application config.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            oauth_url: config.strava_oauth_url.clone(),
            api_url: config.strava_api_url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// Exchange the refresh token and download the activity snapshot.
    ///
    /// The access token is dropped when this returns.
    pub async fn fetch_activities(&self) -> Result<Vec<Activity>, AppError> {
        let token = self.refresh_access_token().await?;
        self.fetch_all_activities(&token).await
    }

    /// Exchange the refresh token for a short-lived access token.
    pub async fn refresh_access_token(&self) -> Result<AccessToken, AppError> {
        let response = self
            .http
            .post(&self.oauth_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::authentication(format!("Token refresh request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != StatusCode::OK {
            tracing::error!(status = %status, "Strava token exchange failed");
            return Err(AppError::authentication(format!("HTTP {}: {}", status, body)));
        }

        let parsed: TokenRefreshResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::authentication(format!("Failed to parse token response: {}: {}", e, body))
        })?;

        match parsed.access_token {
            Some(token) if !token.is_empty() => {
                tracing::debug!("Access token obtained");
                Ok(AccessToken(token))
            }
            _ => Err(AppError::authentication(format!(
                "No access token in response: {}",
                body
            ))),
        }
    }

    /// List one page of the athlete's activities.
    pub async fn list_activities(
        &self,
        access_token: &AccessToken,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token.as_str())
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::fetch(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Strava rate limit hit (429)");
            }
            return Err(AppError::fetch(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::fetch(format!("JSON parse error: {}", e)))
    }

    /// Fetch pages until one comes back empty or [`MAX_PAGES`] is reached.
    pub async fn fetch_all_activities(
        &self,
        access_token: &AccessToken,
    ) -> Result<Vec<Activity>, AppError> {
        let mut activities = Vec::new();
        let mut pages = 0;

        for page in 1..=MAX_PAGES {
            let batch = self.list_activities(access_token, page, PER_PAGE).await?;
            pages = page;
            if batch.is_empty() {
                break;
            }
            activities.extend(batch);
        }

        tracing::info!(
            count = activities.len(),
            pages,
            "Fetched Strava activities"
        );
        Ok(activities)
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
struct TokenRefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
}
