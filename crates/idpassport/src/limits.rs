//! Size limit constants for input validation

/// Maximum length for an identity token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded JWT header JSON (8KB)
/// Headers are typically small (< 1KB), but we allow reasonable margin
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT payload JSON (64KB)
/// Identity tokens can carry many custom claims, but must be bounded
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

// ============================================================================
// Header field size limits
// ============================================================================

/// Maximum length for algorithm (alg) field in JWT header (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for key ID (kid) field in JWT header (256 bytes)
pub(crate) const MAX_KID_LENGTH: usize = 256;

// ============================================================================
// Configuration bounds
// ============================================================================

/// Maximum length for redirect and environment URLs (2048 characters)
pub(crate) const MAX_URL_LENGTH: usize = 2048;

/// Maximum length for the client identifier (256 bytes)
pub(crate) const MAX_CLIENT_ID_LENGTH: usize = 256;
