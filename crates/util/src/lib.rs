//! Small helpers shared across the methodcheck crates.

use once_cell::sync::Lazy;
use regex::Regex;

mod path_processing;

pub use path_processing::expand_tilde;

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*)((?:token|bearer)\s+)?([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in SENSITIVE_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_authorization_headers() {
        assert_eq!(redact_sensitive("Authorization: token abc123"), "Authorization: <redacted>");
        assert_eq!(redact_sensitive("authorization: Bearer x.y.z"), "authorization: <redacted>");
    }

    #[test]
    fn redacts_env_style_secrets() {
        assert_eq!(
            redact_sensitive("KB_AUTH_TOKEN=s3cr3t url=https://example.org"),
            "KB_AUTH_TOKEN=<redacted> url=https://example.org"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive("workspace lookup for reads"), "workspace lookup for reads");
    }
}
