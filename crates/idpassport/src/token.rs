//! Local ID token decoding
//!
//! [`JwtPayloadParser`] reads the claims out of a compact JWT
//! (`header.payload.signature`). It checks structure and size only: the
//! signature is the business of the [`TokenValidator`](crate::TokenValidator)
//! capability, which must have accepted the token first.

use crate::error::{Error, Result};
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_KID_LENGTH,
    MAX_TOKEN_LENGTH,
};
use crate::sdk::{CapabilityFuture, TokenParser};
use crate::utils::base64url;
use crate::value::ClaimsObject;
use miniserde::Deserialize;

/// JWT header structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Key ID of the signing key
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
}

/// Header and claims of a decoded token
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub claims: ClaimsObject,
}

/// Decode a compact JWT without verifying it
///
/// Claims keep the order in which the payload declares them.
pub fn decode(token: &str) -> Result<DecodedToken> {
    // 1. Validate token string length
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Error::TokenTooLarge {
            size: token.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    // 2. Check token format (header, payload, signature)
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::FormatInvalid)?;
    let payload_b64 = parts.next().ok_or(Error::FormatInvalid)?;
    let _signature_b64 = parts.next().ok_or(Error::FormatInvalid)?;
    if parts.next().is_some() || header_b64.is_empty() || payload_b64.is_empty() {
        return Err(Error::FormatInvalid);
    }

    // 3. Decode header with size limit
    let header_json = base64url::decode_string(header_b64, MAX_DECODED_HEADER_SIZE)?;
    let header: TokenHeader = miniserde::json::from_str(&header_json)
        .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse header: {e}")))?;

    validate_field_size("alg", &header.algorithm, MAX_ALG_LENGTH)?;
    if let Some(kid) = &header.key_id {
        validate_field_size("kid", kid, MAX_KID_LENGTH)?;
    }

    // 4. Decode payload with size limit
    let payload_json = base64url::decode_string(payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
    let claims = ClaimsObject::from_json(&payload_json)?;

    Ok(DecodedToken { header, claims })
}

fn validate_field_size(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::HeaderFieldTooLong {
            field: field.into(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}

/// [`TokenParser`] backed by [`decode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtPayloadParser;

impl JwtPayloadParser {
    pub fn new() -> Self {
        Self
    }
}

impl TokenParser for JwtPayloadParser {
    fn parse<'a>(&'a self, id_token: &'a str) -> CapabilityFuture<'a, ClaimsObject> {
        Box::pin(async move {
            let decoded = decode(id_token)?;
            tracing::debug!(
                alg = %decoded.header.algorithm,
                claims = decoded.claims.len(),
                "decoded ID token payload"
            );
            Ok(decoded.claims)
        })
    }
}
