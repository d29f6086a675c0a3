// SPDX-License-Identifier: MIT

//! Google OAuth client and first-login user provisioning.
//!
//! Handles the authorization-code exchange and userinfo fetch, then creates
//! or refreshes the local account. Role assignment happens exactly once, on
//! first sign-in: the admin allowlist and member domain come from `Config`,
//! passed in explicitly at startup.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::Config;
use crate::db::Db;
use crate::error::AppError;
use crate::models::{Role, User};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleAuthService {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Identity claims returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleAuthService {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthProvider(format!(
                "Token exchange returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Invalid token response: {}", e)))?;
        Ok(token.access_token)
    }

    /// Fetch the signed-in user's identity claims.
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::AuthProvider(format!(
                "Userinfo returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Invalid userinfo response: {}", e)))
    }
}

/// Create the local account on first sign-in, or refresh identity fields on
/// a returning login. Role and membership are decided only at creation.
pub async fn provision_user(
    db: &Db,
    config: &Config,
    info: &GoogleUserInfo,
) -> Result<User, AppError> {
    if let Some(existing) = db.get_user_by_email(&info.email).await? {
        let now = Utc::now();
        db.update_user_login(
            &existing.id,
            info.name.as_deref().or(existing.name.as_deref()),
            info.picture.as_deref().or(existing.image.as_deref()),
            now,
        )
        .await?;
        return db
            .get_user(&existing.id)
            .await?
            .ok_or_else(|| AppError::Database("User vanished during login".to_string()));
    }

    let role = if config.admin_emails.iter().any(|e| e == &info.email) {
        Role::Admin
    } else {
        Role::Participant
    };
    let is_member = info
        .email
        .ends_with(&format!("@{}", config.member_email_domain));

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: info.email.clone(),
        name: info.name.clone(),
        image: info.picture.clone(),
        role,
        is_member,
        created_at: now,
        updated_at: now,
    };
    db.insert_user(&user).await?;

    tracing::info!(
        user_id = %user.id,
        role = ?user.role,
        is_member = user.is_member,
        "Provisioned new user"
    );

    Ok(user)
}
