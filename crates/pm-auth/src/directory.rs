//! Clerk Backend API user directory.
//!
//! Calls the Clerk Backend API directly via `reqwest` and reduces each user
//! record to a [`UserProjection`] before it leaves this module.

use async_trait::async_trait;
use futures::future::try_join_all;
use pm_core::entities::UserProjection;
use pm_core::ports::{IdentityDirectory, PortError};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;

/// Most ids the user listing accepts per request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Largest page the user listing serves.
pub const MAX_LIST_LIMIT: u32 = 500;

/// The subset of Clerk's user object the projection needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ClerkUser {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<ClerkEmailAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClerkEmailAddress {
    pub id: String,
    pub email_address: String,
}

impl ClerkUser {
    /// Reduce to display fields. `name` is first and last name joined, or
    /// the username when both are empty.
    #[must_use]
    pub fn into_projection(self) -> UserProjection {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let name = if full_name.is_empty() {
            self.username.clone().unwrap_or_default()
        } else {
            full_name
        };

        let email = self.primary_email_address_id.as_deref().and_then(|primary| {
            self.email_addresses
                .iter()
                .find(|address| address.id == primary)
                .map(|address| address.email_address.clone())
        });

        UserProjection {
            id: self.id,
            name,
            email,
            avatar: self.image_url.filter(|url| !url.is_empty()),
        }
    }
}

/// [`IdentityDirectory`] backed by the Clerk Backend API.
#[derive(Clone)]
pub struct ClerkDirectory {
    client: reqwest::Client,
    api_url: String,
    secret_key: String,
}

impl ClerkDirectory {
    #[must_use]
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    fn users_url(&self, ids: &[String], limit: usize) -> Result<Url, AuthError> {
        let mut url = Url::parse(&format!("{}/users", self.api_url))
            .map_err(|e| AuthError::Other(format!("invalid Clerk API url: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("user_id", id);
            }
            query.append_pair("limit", &limit.to_string());
        }
        Ok(url)
    }

    async fn fetch_users(&self, url: Url) -> Result<Vec<ClerkUser>, AuthError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("list users: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ClerkApiError(format!(
                "list users: HTTP {status}: {body}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("parse users: {e}")))
    }
}

/// Sorted, de-duplicated copy of `ids`.
fn unique_ids(ids: &[String]) -> Vec<String> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

#[async_trait]
impl IdentityDirectory for ClerkDirectory {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<UserProjection>, PortError> {
        let unique = unique_ids(ids);
        if unique.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = unique.len(), "fetching users from directory");

        let requests = unique
            .chunks(MAX_IDS_PER_REQUEST)
            .map(|chunk| {
                let url = self.users_url(chunk, chunk.len())?;
                Ok::<_, AuthError>(self.fetch_users(url))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pages = try_join_all(requests).await?;
        Ok(pages
            .into_iter()
            .flatten()
            .map(ClerkUser::into_projection)
            .collect())
    }

    async fn list(&self, limit: u32) -> Result<Vec<UserProjection>, PortError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let url = self.users_url(&[], limit as usize)?;
        let users = self.fetch_users(url).await?;
        Ok(users.into_iter().map(ClerkUser::into_projection).collect())
    }
}
