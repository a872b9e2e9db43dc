//! Run with
//!
//! ```not_rust
//! RUST_LOG=idpassport=debug cargo run --example demo
//! ```
//!
//! Walks the sign-in flow against an in-memory SDK and prints the claims
//! screen. Swap `DemoSdk` for a binding to the vendor SDK in a real app.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use idpassport::{
    AuthResponse, AuthenticationRequest, Authenticator, CapabilityFuture, ClaimsObject,
    ClientConfig, Environment, Error, ExchangeTokenResponse, PassportFlow, ScreenState,
    TokenExchanger, TokenParser, TokenValidator, TransactionDisplayData,
    TransactionSigningRequest, token,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PAYLOAD: &str = r#"{"iss":"https://signin.bindid-sandbox.io","sub":"abc123","email":"jane@x.com","name":{"first":"Jane","last":"Doe"},"amr":["ts.bind_id.mfca","ts.bind_id.biometric"]}"#;

struct DemoSdk;

impl Authenticator for DemoSdk {
    fn initialize<'a>(&'a self, _config: &'a ClientConfig) -> CapabilityFuture<'a, bool> {
        Box::pin(async { Ok(true) })
    }

    fn authenticate(&self, request: AuthenticationRequest) -> CapabilityFuture<'_, AuthResponse> {
        Box::pin(async move {
            tracing::debug!("demo challenge for {}", request.redirect_uri);
            Ok(AuthResponse::new("demo-code"))
        })
    }

    fn sign_transaction(
        &self,
        request: TransactionSigningRequest,
    ) -> CapabilityFuture<'_, AuthResponse> {
        Box::pin(async move {
            let display_data = &request.transaction_signing_data.display_data;
            tracing::debug!(
                "demo signing: {} to {} via {}",
                display_data.payment_amount,
                display_data.payee,
                display_data.payment_method
            );
            Ok(AuthResponse::new("demo-signing-code"))
        })
    }
}

impl TokenExchanger for DemoSdk {
    fn exchange_token<'a>(
        &'a self,
        _response: &'a AuthResponse,
    ) -> CapabilityFuture<'a, ExchangeTokenResponse> {
        Box::pin(async {
            let id_token = format!(
                "{}.{}.{}",
                URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","kid":"demo"}"#),
                URL_SAFE_NO_PAD.encode(PAYLOAD),
                URL_SAFE_NO_PAD.encode("demo-signature")
            );
            Ok(ExchangeTokenResponse {
                id_token: Some(id_token),
                access_token: None,
            })
        })
    }
}

impl TokenValidator for DemoSdk {
    // Issuer check only; the demo tokens carry no real signature
    fn validate<'a>(
        &'a self,
        id_token: &'a str,
        issuer_host: &'a str,
    ) -> CapabilityFuture<'a, bool> {
        Box::pin(async move {
            let decoded = token::decode(id_token)?;
            Ok(decoded.claims.get("iss").and_then(|iss| iss.as_str())
                == Some(format!("https://{issuer_host}").as_str()))
        })
    }
}

impl TokenParser for DemoSdk {
    fn parse<'a>(&'a self, id_token: &'a str) -> CapabilityFuture<'a, ClaimsObject> {
        Box::pin(async move { Ok(token::decode(id_token)?.claims) })
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,idpassport=info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::new(
        "XXXXXXX.XXXXXXXX.dev_6fa9320b.bindid.io",
        "bindid://mobile-app-example",
    )
    .environment(Environment::Sandbox)
    .build();

    let flow = PassportFlow::new(config, Arc::new(DemoSdk));
    flow.initialize().await?;

    let response = flow.authenticate().await?;
    print_screen(&flow.load_screen(&response).await);

    let response = flow
        .sign_transaction(TransactionDisplayData::new("John Doe", "100$", "PayPal"))
        .await?;
    print_screen(&flow.load_screen(&response).await);

    Ok(())
}

fn print_screen(state: &ScreenState) {
    match state {
        ScreenState::Loading => println!("loading..."),
        ScreenState::Failed(message) => println!("error: {message}"),
        ScreenState::Loaded(rows) => {
            let width = rows.iter().map(|row| row.title.len()).max().unwrap_or(0);
            for row in rows {
                println!("{:width$}  {}", row.title, row.value);
            }
            println!();
        }
    }
}
