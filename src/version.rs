// Version information for the Spotter amenity detection service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-amenity-detection-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Spotter {} ({})", VERSION_NUMBER, BUILD_DATE)
}
