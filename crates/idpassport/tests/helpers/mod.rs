//! Test doubles for the SDK capabilities
//!
//! `MockSdk` answers every capability call from its configuration and records
//! what it was asked. Its validator checks real HS256 signatures and the
//! `iss` claim, so tampered or foreign tokens are rejected like a vendor SDK
//! would.

#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use idpassport::{
    AuthResponse, AuthenticationRequest, Authenticator, CapabilityFuture, ClaimsObject,
    ClientConfig, Error, ExchangeTokenResponse, TokenExchanger, TokenParser, TokenValidator,
    TransactionSigningRequest, token,
};
use serde_json::{Value, json};
use sha2::Sha256;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const SECRET: &[u8] = b"test-signing-secret";
pub const CLIENT_ID: &str = "XXXXXXX.XXXXXXXX.dev_6fa9320b.bindid.io";
pub const REDIRECT_URI: &str = "bindid://mobile-app-example";

/// Mint an HS256 token over `claims`, keys serialized in declaration order
pub fn mint_token(claims: &Value) -> String {
    let header = json!({"alg": "HS256", "typ": "JWT"});
    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let payload_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signing_input = format!("{header_b64}.{payload_b64}");

    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET).unwrap();
    mac.update(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{signing_input}.{signature_b64}")
}

/// Claims in the shape the sandbox issuer produces
pub fn sandbox_claims() -> Value {
    json!({
        "iss": "https://signin.bindid-sandbox.io",
        "sub": "abc123",
        "aud": CLIENT_ID,
        "exp": 1_900_000_000u64,
        "iat": 1_700_000_000u64,
        "email": "jane@x.com",
        "name": {"first": "Jane", "last": "Doe"},
        "bindid_network_info": {
            "user_registration_time": "2021-05-01T10:00:00Z",
            "device_count": 2
        },
        "amr": ["ts.bind_id.mfca", "ts.bind_id.biometric"]
    })
}

pub fn config() -> ClientConfig {
    ClientConfig::new(CLIENT_ID, REDIRECT_URI)
}

pub struct MockSdk {
    pub initialize_result: bool,
    pub authenticate_error: Option<Error>,
    pub exchange_response: ExchangeTokenResponse,
    /// When set, authentication waits for a notification before completing
    pub gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub authentication_requests: Mutex<Vec<AuthenticationRequest>>,
    pub signing_requests: Mutex<Vec<TransactionSigningRequest>>,
    pub validated_hosts: Mutex<Vec<String>>,
}

impl MockSdk {
    pub fn issuing(id_token: Option<String>) -> Self {
        Self {
            initialize_result: true,
            authenticate_error: None,
            exchange_response: ExchangeTokenResponse {
                id_token,
                access_token: Some("access".into()),
            },
            gate: None,
            calls: Mutex::new(Vec::new()),
            authentication_requests: Mutex::new(Vec::new()),
            signing_requests: Mutex::new(Vec::new()),
            validated_hosts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_claims(claims: &Value) -> Self {
        Self::issuing(Some(mint_token(claims)))
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Authenticator for MockSdk {
    fn initialize<'a>(&'a self, config: &'a ClientConfig) -> CapabilityFuture<'a, bool> {
        Box::pin(async move {
            self.record("initialize");
            assert_eq!(config.client_id(), CLIENT_ID);
            Ok(self.initialize_result)
        })
    }

    fn authenticate(&self, request: AuthenticationRequest) -> CapabilityFuture<'_, AuthResponse> {
        Box::pin(async move {
            self.record("authenticate");
            self.authentication_requests.lock().unwrap().push(request);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.authenticate_error {
                Some(e) => Err(e.clone()),
                None => Ok(AuthResponse::new("auth-code").with_code_verifier("verifier")),
            }
        })
    }

    fn sign_transaction(
        &self,
        request: TransactionSigningRequest,
    ) -> CapabilityFuture<'_, AuthResponse> {
        Box::pin(async move {
            self.record("sign_transaction");
            self.signing_requests.lock().unwrap().push(request);
            match &self.authenticate_error {
                Some(e) => Err(e.clone()),
                None => Ok(AuthResponse::new("signing-code")),
            }
        })
    }
}

impl TokenExchanger for MockSdk {
    fn exchange_token<'a>(
        &'a self,
        response: &'a AuthResponse,
    ) -> CapabilityFuture<'a, ExchangeTokenResponse> {
        Box::pin(async move {
            self.record("exchange_token");
            if response.code().is_empty() {
                return Err(Error::sdk("invalid_grant", "missing authorization code"));
            }
            Ok(self.exchange_response.clone())
        })
    }
}

impl TokenValidator for MockSdk {
    fn validate<'a>(
        &'a self,
        id_token: &'a str,
        issuer_host: &'a str,
    ) -> CapabilityFuture<'a, bool> {
        Box::pin(async move {
            self.record("validate");
            self.validated_hosts
                .lock()
                .unwrap()
                .push(issuer_host.to_string());
            Ok(verify_hs256(id_token, issuer_host))
        })
    }
}

impl TokenParser for MockSdk {
    fn parse<'a>(&'a self, id_token: &'a str) -> CapabilityFuture<'a, ClaimsObject> {
        Box::pin(async move {
            self.record("parse");
            Ok(token::decode(id_token)?.claims)
        })
    }
}

fn verify_hs256(id_token: &str, issuer_host: &str) -> bool {
    let Some((signing_input, signature_b64)) = id_token.rsplit_once('.') else {
        return false;
    };
    let Ok(signature) = URL_SAFE_NO_PAD.decode(signature_b64) else {
        return false;
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET).unwrap();
    mac.update(signing_input.as_bytes());
    if mac.verify_slice(&signature).is_err() {
        return false;
    }

    let Ok(decoded) = token::decode(id_token) else {
        return false;
    };
    decoded
        .claims
        .get("iss")
        .and_then(|iss| iss.as_str())
        .is_some_and(|iss| iss == format!("https://{issuer_host}"))
}
