//! Coil number extraction from SDD export filenames.

use crate::console::ProcessLog;
use crate::constants::COIL_NO_PATTERN;
use regex::Regex;
use std::sync::LazyLock;

static COIL_NO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(COIL_NO_PATTERN).expect("coil number pattern is valid")
});

/// Coil identifier captured from `file_name`, if it follows the naming contract
pub fn match_coil_no(file_name: &str) -> Option<&str> {
    COIL_NO_REGEX
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Coil identifier for a file, or an empty string with a warning
pub fn extract_coil_no(file_name: &str, log: &dyn ProcessLog) -> String {
    match match_coil_no(file_name) {
        Some(coil_no) => coil_no.to_string(),
        None => {
            log.warning(&format!(
                "    Warning: Coil No is not found in file name '{}' or does not match the expected pattern. Using an empty string.",
                file_name
            ));
            String::new()
        }
    }
}
