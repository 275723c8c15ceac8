// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the liveness web service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-liveness-2025-11-03";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-03";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Liveness Web {} ({})", VERSION_NUMBER, BUILD_DATE)
}
