//! Pattern matching shared by type and value constraints.
//!
//! Declared patterns match from the start of the candidate text, the way the
//! method store's type patterns are written (`KBaseGenomes.Genome` accepts
//! `KBaseGenomes.Genome-8.2`).

use regex::Regex;

/// Compiles `pattern` so that it only matches at the start of the input.
pub fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_from_start(pattern: &str, text: &str) -> Result<bool, regex::Error> {
        compile_anchored(pattern).map(|regex| regex.is_match(text))
    }

    #[test]
    fn matches_prefixes_only() {
        assert_eq!(matches_from_start("KBaseAssembly.PairedEndLibrary", "KBaseAssembly.PairedEndLibrary-2.0"), Ok(true));
        assert_eq!(matches_from_start("PairedEndLibrary", "KBaseAssembly.PairedEndLibrary-2.0"), Ok(false));
    }

    #[test]
    fn alternation_is_grouped_before_anchoring() {
        assert_eq!(matches_from_start("a|b", "xb"), Ok(false));
        assert_eq!(matches_from_start("a|b", "bx"), Ok(true));
    }

    #[test]
    fn invalid_patterns_are_reported() {
        assert!(compile_anchored("(unclosed").is_err());
    }
}
