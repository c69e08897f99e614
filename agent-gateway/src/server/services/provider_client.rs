use chrono::Utc;
use oauth2::{
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
    AuthType, AuthorizationCode, Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
    ExtraTokenFields, HttpRequest, HttpResponse, RedirectUrl, StandardRevocableToken,
    StandardTokenResponse, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::server::config::{AppConfiguration, ProviderConfiguration};
use crate::server::error::ServerError;
use crate::server::models::{TokenSet, UserInfo};

const SCOPES: &str = "openid profile email";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("User info request failed: {0}")]
    UserInfo(String),

    #[error("User info response has neither `sub` nor `username`")]
    MissingSubject,
}

/// OpenID-Connect adds an `id_token` next to the standard OAuth2 fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdTokenFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

type ProviderTokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;

type TokenClient = Client<
    BasicErrorResponse,
    ProviderTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

// Async HTTP adapter for the oauth2 token request
async fn send_oauth_request(
    client: reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let mut builder = client
        .request(request.method().clone(), request.uri().to_string())
        .body(request.body().clone());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    let mut http_response = HttpResponse::new(body);
    *http_response.status_mut() = status;

    Ok(http_response)
}

/// Client for the identity provider's hosted UI, token and user-info endpoints
pub struct ProviderClient {
    token_client: TokenClient,
    http_client: reqwest::Client,
    client_id: String,
    redirect_uri: String,
    login_endpoint: String,
    logout_endpoint: String,
    user_info_endpoint: String,
    logout_target: String,
}

impl ProviderClient {
    pub fn new(
        config: &ProviderConfiguration,
        app: &AppConfiguration,
        timeout: Duration,
    ) -> Result<Self, ServerError> {
        let token_url = TokenUrl::new(config.token_endpoint())
            .map_err(|e| ServerError::Configuration(format!("Invalid token URL: {}", e)))?;

        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| ServerError::Configuration(format!("Invalid redirect URI: {}", e)))?;

        // Client id and secret travel as form fields, not as a Basic auth header
        let token_client: TokenClient = Client::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_type(AuthType::RequestBody)
            .set_redirect_uri(redirect_url)
            .set_token_uri(token_url);

        // Provider endpoints must not be followed to other hosts
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Configuration(format!("Invalid HTTP client: {}", e)))?;

        let client = Self {
            token_client,
            http_client,
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            login_endpoint: config.login_endpoint(),
            logout_endpoint: config.logout_endpoint(),
            user_info_endpoint: config.user_info_endpoint(),
            logout_target: app.origin.clone(),
        };

        // Fail at startup rather than on the first login
        client.login_url()?;
        client.logout_url()?;

        Ok(client)
    }

    /// Hosted login page URL that starts the authorization code flow
    pub fn login_url(&self) -> Result<String, ServerError> {
        let url = Url::parse_with_params(
            &self.login_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPES),
            ],
        )
        .map_err(|e| ServerError::Configuration(format!("Invalid login URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Hosted logout URL, returning the browser to the application afterwards
    pub fn logout_url(&self) -> Result<String, ServerError> {
        let url = Url::parse_with_params(
            &self.logout_endpoint,
            &[
                ("client_id", self.client_id.as_str()),
                ("logout_uri", self.logout_target.as_str()),
            ],
        )
        .map_err(|e| ServerError::Configuration(format!("Invalid logout URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchange an authorization code for the provider's token set
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, ProviderError> {
        let http = |request: HttpRequest| send_oauth_request(self.http_client.clone(), request);

        let token_result = self
            .token_client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&http)
            .await
            .map_err(|e| ProviderError::TokenExchange(e.to_string()))?;

        let expires_at = token_result.expires_in().map(|expires_in| Utc::now() + expires_in);

        tracing::debug!(?expires_at, "Exchanged authorization code for tokens");

        Ok(TokenSet {
            access_token: token_result.access_token().secret().to_string(),
            token_type: token_result.token_type().as_ref().to_string(),
            refresh_token: token_result
                .refresh_token()
                .map(|token| token.secret().to_string()),
            id_token: token_result.extra_fields().id_token.clone(),
            expires_at,
        })
    }

    /// Resolve identity claims for an access token
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, ProviderError> {
        let user = self
            .http_client
            .get(&self.user_info_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ProviderError::UserInfo(e.to_string()))?
            .json::<UserInfo>()
            .await
            .map_err(|e| ProviderError::UserInfo(e.to_string()))?;

        if user.subject().is_none() {
            return Err(ProviderError::MissingSubject);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ProviderClient {
        let provider = ProviderConfiguration {
            domain: "https://auth.example.com".to_string(),
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
        };
        let app = AppConfiguration {
            origin: "http://localhost:5173".to_string(),
        };
        ProviderClient::new(&provider, &app, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_login_url() {
        assert_eq!(
            client().login_url().unwrap(),
            "https://auth.example.com/login?response_type=code&client_id=client-123\
             &redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback\
             &scope=openid+profile+email"
        );
    }

    #[test]
    fn test_logout_url() {
        assert_eq!(
            client().logout_url().unwrap(),
            "https://auth.example.com/logout?client_id=client-123\
             &logout_uri=http%3A%2F%2Flocalhost%3A5173"
        );
    }

    #[test]
    fn test_invalid_domain_is_a_configuration_error() {
        let provider = ProviderConfiguration {
            domain: "not a url".to_string(),
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
        };
        let app = AppConfiguration {
            origin: "http://localhost:5173".to_string(),
        };

        assert!(matches!(
            ProviderClient::new(&provider, &app, Duration::from_secs(5)),
            Err(ServerError::Configuration(_))
        ));
    }
}
