//! Capability interfaces of the identity SDK
//!
//! The vendor SDK owns the sign-in protocol, token exchange, token validation
//! and transport. This module describes what the library needs from it as
//! four object-safe traits, plus the request and response types that cross
//! the boundary. Bindings to a real SDK and test doubles implement them.
//!
//! All calls return a boxed `Send` future so implementations can be shared as
//! `Arc<dyn Trait>` and driven from any executor.
//!
//! # Errors
//!
//! Implementations report vendor failures as [`Error::Sdk`](crate::Error::Sdk)
//! with the vendor's error code and description.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::value::ClaimsObject;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Future returned by every capability call
pub type CapabilityFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// User-facing sign-in and transaction signing
pub trait Authenticator: Send + Sync {
    /// Prepare the SDK for the configured client and environment
    ///
    /// Resolves to `false` when the SDK declined the configuration.
    fn initialize<'a>(&'a self, config: &'a ClientConfig) -> CapabilityFuture<'a, bool>;

    /// Run a biometric/passwordless authentication challenge
    fn authenticate(&self, request: AuthenticationRequest) -> CapabilityFuture<'_, AuthResponse>;

    /// Run a challenge that binds the displayed transaction details
    fn sign_transaction(
        &self,
        request: TransactionSigningRequest,
    ) -> CapabilityFuture<'_, AuthResponse>;
}

/// Exchange of an authentication result for tokens
pub trait TokenExchanger: Send + Sync {
    fn exchange_token<'a>(
        &'a self,
        response: &'a AuthResponse,
    ) -> CapabilityFuture<'a, ExchangeTokenResponse>;
}

/// Integrity and signature check of an ID token against an issuer host
pub trait TokenValidator: Send + Sync {
    fn validate<'a>(
        &'a self,
        id_token: &'a str,
        issuer_host: &'a str,
    ) -> CapabilityFuture<'a, bool>;
}

/// Decoding of an ID token into its claims
///
/// Implementations must keep the claims in the order the token declares them.
pub trait TokenParser: Send + Sync {
    fn parse<'a>(&'a self, id_token: &'a str) -> CapabilityFuture<'a, ClaimsObject>;
}

// ============================================================================
// Requests
// ============================================================================

/// Claim scopes that can be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    OpenId,
    Email,
    NetworkInfo,
    Phone,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::OpenId => "openid",
            Scope::Email => "email",
            Scope::NetworkInfo => "bindid_network_info",
            Scope::Phone => "phone",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationRequest {
    /// Address the SDK returns to when the challenge completes
    pub redirect_uri: String,
    pub scopes: Vec<Scope>,
    /// Use the proof-key (PKCE) authorization code exchange
    pub use_pkce: bool,
}

/// Transaction details shown to the user during signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDisplayData {
    pub payee: String,
    pub payment_amount: String,
    pub payment_method: String,
}

impl TransactionDisplayData {
    pub fn new(
        payee: impl Into<String>,
        payment_amount: impl Into<String>,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            payee: payee.into(),
            payment_amount: payment_amount.into(),
            payment_method: payment_method.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSigningData {
    pub display_data: TransactionDisplayData,
}

/// Transaction signing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSigningRequest {
    pub redirect_uri: String,
    pub transaction_signing_data: TransactionSigningData,
    /// Ask the SDK to encrypt the signing data in transit
    pub encrypted: bool,
    pub use_pkce: bool,
}

// ============================================================================
// Responses
// ============================================================================

/// Result of a completed challenge
///
/// Opaque to this library: it is only handed back to the token exchanger.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthResponse {
    code: String,
    code_verifier: Option<String>,
}

impl AuthResponse {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            code_verifier: None,
        }
    }

    /// Attach the PKCE verifier generated for this challenge
    pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(verifier.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn code_verifier(&self) -> Option<&str> {
        self.code_verifier.as_deref()
    }
}

// Authorization codes are credentials
impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("code", &"<redacted>")
            .field("code_verifier", &self.code_verifier.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Tokens returned by the exchange
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExchangeTokenResponse {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

impl ExchangeTokenResponse {
    /// The ID token, if present and non-empty
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref().filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for ExchangeTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeTokenResponse")
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
