/// Client credential material and token endpoint calls.
pub mod credentials;
/// Token caching with per-family on-disk persistence.
pub mod token;
