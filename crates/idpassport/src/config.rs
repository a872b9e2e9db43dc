//! Client configuration
//!
//! Holds what the identity SDK needs to start a flow: the client id issued by
//! the provider console, the redirect URI the app handles, and the
//! environment whose issuer host signs the tokens.

use crate::error::{Error, Result};
use crate::limits::{MAX_CLIENT_ID_LENGTH, MAX_URL_LENGTH};
use crate::sdk::Scope;
use std::fmt;
use std::str::FromStr;

/// Issuer host of the sandbox environment
pub const SANDBOX_HOST: &str = "signin.bindid-sandbox.io";

/// Issuer host of the production environment
pub const PRODUCTION_HOST: &str = "signin.bindid.io";

/// Provider environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Issuer host that ID tokens of this environment are validated against
    pub fn host_name(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_HOST,
            Environment::Production => PRODUCTION_HOST,
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(Error::ConfigurationInvalid(format!(
                "unknown environment '{other}' (expected sandbox or production)"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => f.write_str("sandbox"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Client configuration
///
/// Built with chained setters, checked with [`ClientConfig::validate`]:
///
/// ```ignore
/// let mut config = ClientConfig::new("client.id", "myapp://signed-in");
/// config.environment(Environment::Production);
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    client_id: String,
    redirect_uri: String,
    environment: Environment,
    environment_url: Option<String>,
    scopes: Vec<Scope>,
}

impl ClientConfig {
    /// Create a sandbox configuration requesting `openid` and `email`
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            environment: Environment::default(),
            environment_url: None,
            scopes: vec![Scope::OpenId, Scope::Email],
        }
    }

    /// Select the provider environment
    pub fn environment(&mut self, environment: Environment) -> &mut Self {
        self.environment = environment;
        self
    }

    /// Point the SDK at a custom environment URL
    pub fn environment_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.environment_url = Some(url.into());
        self
    }

    /// Replace the requested claim scopes
    pub fn scopes(&mut self, scopes: impl IntoIterator<Item = Scope>) -> &mut Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn selected_environment(&self) -> Environment {
        self.environment
    }

    pub fn custom_environment_url(&self) -> Option<&str> {
        self.environment_url.as_deref()
    }

    pub fn requested_scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Issuer host for token validation
    pub fn issuer_host(&self) -> &'static str {
        self.environment.host_name()
    }

    /// Check the configuration before handing it to the SDK
    pub fn validate(&self) -> Result<()> {
        let client_id = self.client_id.trim();
        if client_id.is_empty() {
            return Err(Error::ConfigurationInvalid(
                "client id cannot be empty".into(),
            ));
        }
        if client_id.len() > MAX_CLIENT_ID_LENGTH {
            return Err(Error::ConfigurationInvalid(format!(
                "client id too long: {} bytes (maximum: {MAX_CLIENT_ID_LENGTH} bytes)",
                client_id.len()
            )));
        }

        validate_redirect_uri(&self.redirect_uri)?;

        if let Some(url) = &self.environment_url {
            validate_environment_url(url)?;
        }

        if !self.scopes.contains(&Scope::OpenId) {
            return Err(Error::ConfigurationInvalid(
                "scopes must include openid".into(),
            ));
        }

        Ok(())
    }
}

/// Common URL validation logic
fn parse_url(url: &str, name: &str) -> Result<url::Url> {
    if url.trim().is_empty() {
        return Err(Error::ConfigurationInvalid(format!("{name} cannot be empty")));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(Error::ConfigurationInvalid(format!(
            "{name} too long: {} characters (maximum: {MAX_URL_LENGTH} characters)",
            url.len()
        )));
    }

    url.parse::<url::Url>()
        .map_err(|e| Error::ConfigurationInvalid(format!("invalid {name}: {e}")))
}

/// Redirect URIs may use an app scheme (`myapp://callback`) but not a fragment
pub(crate) fn validate_redirect_uri(uri: &str) -> Result<()> {
    let parsed = parse_url(uri, "redirect URI")?;

    if parsed.fragment().is_some() {
        return Err(Error::ConfigurationInvalid(
            "redirect URI must not contain a fragment".into(),
        ));
    }

    Ok(())
}

pub(crate) fn validate_environment_url(url: &str) -> Result<()> {
    let parsed = parse_url(url, "environment URL")?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::ConfigurationInvalid(
            "environment URL must use http or https scheme".into(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(Error::ConfigurationInvalid(
            "environment URL must have a valid host".into(),
        ));
    }

    Ok(())
}
