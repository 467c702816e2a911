//! Access tokens for the Google Calendar API.
//!
//! A service account signs an RS256 assertion and trades it at its
//! `token_uri` for a short-lived bearer token, which is cached until shortly
//! before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use slotsync_core::storage::StoreError;

use super::error::{transport_error, GoogleAuthError};

/// OAuth scope granting read/write access to calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a service account key file we need.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, GoogleAuthError> {
        serde_json::from_str(json).map_err(|e| GoogleAuthError::InvalidKey(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, GoogleAuthError> {
        let json = std::fs::read_to_string(path).map_err(|e| GoogleAuthError::ReadKey {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs the JWT assertion a service account presents at its token endpoint.
pub fn build_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, GoogleAuthError> {
    let issued_at = now.timestamp();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: CALENDAR_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| GoogleAuthError::InvalidKey(e.to_string()))?;

    encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
        .map_err(|e| GoogleAuthError::Signing(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Service account credentials with a cached access token.
#[derive(Debug)]
pub struct ServiceAccountTokens {
    key: ServiceAccountKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cached: Mutex::new(None),
        }
    }

    async fn access_token(&self, http: &reqwest::Client) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let fresh = self.exchange(http, now).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn exchange(&self, http: &reqwest::Client, now: DateTime<Utc>) -> Result<CachedToken, StoreError> {
        let assertion = build_assertion(&self.key, now)?;

        let response = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, client_email = %self.key.client_email, "Token exchange rejected");
            return Err(GoogleAuthError::TokenExchange(format!("{status}: {}", body.trim())).into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tracing::debug!(expires_in = token.expires_in, "Obtained Google access token");
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

/// Where the bearer token for each API call comes from.
#[derive(Debug)]
pub enum TokenSource {
    /// A token issued out of band; never refreshed.
    Static(String),
    ServiceAccount(ServiceAccountTokens),
}

impl TokenSource {
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, StoreError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount(tokens) => tokens.access_token(http).await,
        }
    }
}
