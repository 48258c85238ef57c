//! Login against the Leakify backend.

use crate::error::{ClientError, Result};
use crate::types::{LoginRequest, LoginResponse};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

/// Authentication client.
///
/// A successful login sets the session cookie on the shared `reqwest`
/// client; nothing else needs to be carried around.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url) -> Self {
        Self { http, base_url }
    }

    /// Login with username and password.
    pub async fn login(&self, user: &str, pass: &str) -> Result<()> {
        let url = self
            .base_url
            .join("api/login")
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        debug!(url = %url, user = %user, "Attempting login");

        let request = LoginRequest {
            user: user.to_string(),
            pass: pass.to_string(),
        };

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let login: LoginResponse = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse login response: {}", e))
            })?;

            if login.ok {
                info!(user = %user, "Login successful");
                Ok(())
            } else {
                warn!(user = %user, "Login rejected");
                Err(ClientError::AuthFailed(
                    login
                        .error
                        .unwrap_or_else(|| "Invalid username or password".to_string()),
                ))
            }
        } else if status.as_u16() == 401 {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Login failed: invalid credentials");
            Err(ClientError::AuthFailed(
                "Invalid username or password".to_string(),
            ))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
