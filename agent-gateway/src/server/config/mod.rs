use axum_extra::extract::cookie::SameSite;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,
    pub provider: ProviderConfiguration,
    pub backend: BackendConfiguration,
    pub app: AppConfiguration,
    #[serde(default)]
    pub cookie: CookieConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,

    /// Applies to every upstream call (identity provider and job backend)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_seconds: default_session_ttl(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// OpenID-Connect provider (hosted UI plus token and user-info endpoints)
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfiguration {
    /// Base URL, e.g. `https://my-pool.auth.eu-west-1.amazoncognito.com`
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl ProviderConfiguration {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.domain.trim_end_matches('/'), path)
    }

    pub fn login_endpoint(&self) -> String {
        self.endpoint("/login")
    }

    pub fn logout_endpoint(&self) -> String {
        self.endpoint("/logout")
    }

    pub fn token_endpoint(&self) -> String {
        self.endpoint("/oauth2/token")
    }

    pub fn user_info_endpoint(&self) -> String {
        self.endpoint("/oauth2/userInfo")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfiguration {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfiguration {
    /// Public origin of the single-page application
    pub origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfiguration {
    #[serde(default = "default_cookie_name")]
    pub name: String,

    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub same_site: SameSitePolicy,
}

impl Default for CookieConfiguration {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: false,
            same_site: SameSitePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    #[default]
    Lax,
    Strict,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl() -> u64 {
    86_400
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cookie_name() -> String {
    "agent_gateway_sid".to_string()
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(config::File::with_name("config"));
        }

        builder =
            builder.add_source(config::Environment::with_prefix("AGENT_GATEWAY").separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        let urls = [
            ("provider.domain", &self.provider.domain),
            ("provider.redirect_uri", &self.provider.redirect_uri),
            ("backend.base_url", &self.backend.base_url),
            ("app.origin", &self.app.origin),
        ];
        for (name, value) in urls {
            if !value.starts_with("http") {
                return Err(format!("{} must be a valid HTTP(S) URL", name));
            }
        }

        if self.provider.client_id.is_empty() {
            return Err("provider.client_id is required".to_string());
        }
        if self.provider.client_secret.is_empty() {
            return Err("provider.client_secret is required".to_string());
        }
        if self.server.session_ttl_seconds == 0 {
            return Err("server.session_ttl_seconds must be greater than 0".to_string());
        }
        if self.server.request_timeout_seconds == 0 {
            return Err("server.request_timeout_seconds must be greater than 0".to_string());
        }
        if self.cookie.same_site == SameSitePolicy::None && !self.cookie.secure {
            return Err("cookie.same_site = \"none\" requires cookie.secure = true".to_string());
        }

        Ok(())
    }
}
