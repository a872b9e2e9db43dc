//! Sign-in flow
//!
//! [`PassportFlow`] drives the SDK capabilities in the order the demo app
//! needs them:
//!
//! ```text
//! initialize ─► authenticate / sign_transaction ─► AuthResponse
//!                                                      │ load_passport
//!                                                      ▼
//!        exchange_token ─► id_token? ─► validate(host) ─► parse ─► flatten
//! ```
//!
//! Every step either completes or fails the whole flow with one error. There
//! is no retry: the user starts over by triggering the flow again.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::flatten::{DisplayRow, flatten};
use crate::sdk::{
    AuthResponse, AuthenticationRequest, Authenticator, TokenExchanger, TokenParser,
    TokenValidator, TransactionDisplayData, TransactionSigningData, TransactionSigningRequest,
};
use crate::value::ClaimsObject;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Claims of an authenticated user, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct Passport {
    pub claims: ClaimsObject,
    pub rows: Vec<DisplayRow>,
}

/// What a claims screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Loading,
    Failed(String),
    Loaded(Vec<DisplayRow>),
}

impl ScreenState {
    pub fn from_result(result: Result<Passport>) -> Self {
        match result {
            Ok(passport) => ScreenState::Loaded(passport.rows),
            Err(e) => ScreenState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }
}

/// Drives the SDK capabilities for one app
///
/// Configured once with chained setters and shared freely: all methods take
/// `&self`. Authentication and transaction signing are mutually exclusive;
/// triggering one while another is running fails with
/// [`Error::FlowInProgress`].
#[derive(Clone)]
pub struct PassportFlow {
    config: ClientConfig,
    authenticator: Arc<dyn Authenticator>,
    exchanger: Arc<dyn TokenExchanger>,
    validator: Arc<dyn TokenValidator>,
    parser: Arc<dyn TokenParser>,
    in_progress: Arc<AtomicBool>,
}

impl PassportFlow {
    /// Create a flow where one SDK binding provides every capability
    pub fn new<S>(config: ClientConfig, sdk: Arc<S>) -> Self
    where
        S: Authenticator + TokenExchanger + TokenValidator + TokenParser + 'static,
    {
        Self {
            config,
            authenticator: sdk.clone(),
            exchanger: sdk.clone(),
            validator: sdk.clone(),
            parser: sdk,
            in_progress: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the authenticator
    pub fn authenticator(&mut self, authenticator: Arc<dyn Authenticator>) -> &mut Self {
        self.authenticator = authenticator;
        self
    }

    /// Replace the token exchanger
    pub fn exchanger(&mut self, exchanger: Arc<dyn TokenExchanger>) -> &mut Self {
        self.exchanger = exchanger;
        self
    }

    /// Replace the token validator
    pub fn validator(&mut self, validator: Arc<dyn TokenValidator>) -> &mut Self {
        self.validator = validator;
        self
    }

    /// Replace the token parser, e.g. with [`JwtPayloadParser`](crate::JwtPayloadParser)
    pub fn parser(&mut self, parser: Arc<dyn TokenParser>) -> &mut Self {
        self.parser = parser;
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether an authentication or signing challenge is running
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

impl PassportFlow {
    /// Validate the configuration and initialize the SDK
    pub async fn initialize(&self) -> Result<()> {
        self.config.validate()?;

        let ready = self
            .authenticator
            .initialize(&self.config)
            .await
            .inspect_err(|e| tracing::warn!("SDK initialization failed: {e}"))?;

        if !ready {
            tracing::warn!("SDK declined initialization");
            return Err(Error::InitializationFailed);
        }

        tracing::info!(
            environment = %self.config.selected_environment(),
            "SDK initialized"
        );
        Ok(())
    }

    /// Run the authentication challenge with the configured scopes
    pub async fn authenticate(&self) -> Result<AuthResponse> {
        let _guard = FlowGuard::acquire(&self.in_progress)?;

        let request = AuthenticationRequest {
            redirect_uri: self.config.redirect_uri().to_string(),
            scopes: self.config.requested_scopes().to_vec(),
            use_pkce: true,
        };

        tracing::debug!(scopes = ?request.scopes, "starting authentication");
        let response = self
            .authenticator
            .authenticate(request)
            .await
            .inspect_err(|e| tracing::warn!("authentication failed: {e}"))?;

        tracing::info!("authentication completed");
        Ok(response)
    }

    /// Run a transaction signing challenge showing `display`
    pub async fn sign_transaction(&self, display: TransactionDisplayData) -> Result<AuthResponse> {
        let _guard = FlowGuard::acquire(&self.in_progress)?;

        let request = TransactionSigningRequest {
            redirect_uri: self.config.redirect_uri().to_string(),
            transaction_signing_data: TransactionSigningData {
                display_data: display,
            },
            encrypted: true,
            use_pkce: true,
        };

        tracing::debug!("starting transaction signing");
        let response = self
            .authenticator
            .sign_transaction(request)
            .await
            .inspect_err(|e| tracing::warn!("transaction signing failed: {e}"))?;

        tracing::info!("transaction signing completed");
        Ok(response)
    }

    /// Exchange, validate and parse the ID token, then flatten its claims
    pub async fn load_passport(&self, response: &AuthResponse) -> Result<Passport> {
        let tokens = self
            .exchanger
            .exchange_token(response)
            .await
            .inspect_err(|e| tracing::warn!("token exchange failed: {e}"))?;

        let Some(id_token) = tokens.id_token() else {
            tracing::warn!("token exchange returned no ID token");
            return Err(Error::IdTokenMissing);
        };

        let issuer_host = self.config.issuer_host();
        let valid = self
            .validator
            .validate(id_token, issuer_host)
            .await
            .inspect_err(|e| tracing::warn!("ID token validation failed: {e}"))?;
        if !valid {
            tracing::warn!(issuer_host, "ID token rejected by validator");
            return Err(Error::IdTokenInvalid);
        }

        let claims = self
            .parser
            .parse(id_token)
            .await
            .inspect_err(|e| tracing::warn!("ID token parsing failed: {e}"))?;

        let rows = flatten(&claims);
        tracing::info!(claims = claims.len(), rows = rows.len(), "passport loaded");

        Ok(Passport { claims, rows })
    }

    /// [`load_passport`](Self::load_passport) mapped to a screen state
    pub async fn load_screen(&self, response: &AuthResponse) -> ScreenState {
        ScreenState::from_result(self.load_passport(response).await)
    }
}

/// Holds the in-progress flag, released on drop
struct FlowGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlowGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::FlowInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
