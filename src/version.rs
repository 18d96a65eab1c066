// Crate identity, used for GET /version and the HTTP client user agent

/// Crate version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");
