//! # idpassport - Identity Token Claims for Display
//!
//! Turns the claims of an identity token into a flat, ordered list of
//! `(title, value)` rows, and drives the passwordless sign-in flow that
//! produces the token.
//!
//! The identity provider's SDK stays opaque: authentication, token exchange,
//! validation and parsing are reached through the capability traits in
//! [`sdk`]. This crate owns what happens around them: configuration, the
//! order of the calls, and flattening the resulting claims.
//!
//! ## Quick Start
//!
//! ```ignore
//! use idpassport::*;
//!
//! let config = ClientConfig::new("client.id", "myapp://signed-in");
//! let flow = PassportFlow::new(config, Arc::new(vendor_sdk));
//!
//! flow.initialize().await?;
//! let response = flow.authenticate().await?;
//! let passport = flow.load_passport(&response).await?;
//!
//! for row in &passport.rows {
//!     println!("{}: {}", row.title, row.value);
//! }
//! ```
//!
//! ## Flattening
//!
//! Nested objects are expanded in place and arrays are joined:
//!
//! ```text
//! {"sub":"abc123","name":{"first":"Jane"},"roles":["admin","user"]}
//!
//! sub    abc123
//! first  Jane
//! roles  admin,user
//! ```
//!
//! Titles are local key names and may repeat; every row also carries a
//! unique JSON Pointer `path` for use as a list key.

mod error;
mod limits;

// Internal modules
pub(crate) mod utils;

// Claims
pub mod flatten;
pub mod token;
pub mod value;

// SDK integration
pub mod config;
pub mod flow;
pub mod sdk;

// Public Interface
pub use config::{ClientConfig, Environment};
pub use error::{Error, Result};
pub use flatten::{DisplayRow, flatten};
pub use flow::{Passport, PassportFlow, ScreenState};
pub use sdk::{
    AuthResponse, AuthenticationRequest, Authenticator, CapabilityFuture, ExchangeTokenResponse,
    Scope, TokenExchanger, TokenParser, TokenValidator, TransactionDisplayData,
    TransactionSigningData, TransactionSigningRequest,
};
pub use token::{DecodedToken, JwtPayloadParser, TokenHeader};
pub use value::{ClaimsObject, ClaimsValue, Number};
