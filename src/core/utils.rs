//! String transformation utilities for code generation

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

/// Words that cannot be used as plain Rust identifiers in generated code.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "try", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield",
];

/// Converts a string to snake_case format for Rust identifiers.
///
/// Handles camelCase, PascalCase, kebab-case and space separated input.
///
/// # Examples
/// ```
/// use servicegen::core::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("ChargeCard"), "charge_card");
/// assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
/// assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
        } else if ch == '-' || ch == '_' || ch == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Returns true for a plain ASCII identifier such as `Billing` or `charge_2`.
pub fn is_identifier(name: &str) -> bool {
    name != "_" && IDENTIFIER_RE.is_match(name)
}

/// Checks whether a name is a strict or reserved Rust keyword.
///
/// # Arguments
/// * `name` - The candidate identifier, already snake_cased
///
/// # Examples
/// ```
/// use servicegen::core::utils::is_rust_keyword;
///
/// assert!(is_rust_keyword("type"));
/// assert!(is_rust_keyword("gen"));
/// assert!(!is_rust_keyword("charge"));
/// ```
pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// snake_case function name for an operation, with a trailing `_` when the
/// result collides with a keyword.
///
/// # Examples
/// ```
/// use servicegen::core::utils::to_fn_name;
///
/// assert_eq!(to_fn_name("Charge"), "charge");
/// assert_eq!(to_fn_name("Type"), "type_");
/// ```
pub fn to_fn_name(operation: &str) -> String {
    let name = to_snake_case(operation);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("op_{name}")
    } else if is_rust_keyword(&name) {
        format!("{name}_")
    } else {
        name
    }
}

/// First segment of a host module name, e.g. `acme_app` for `acme_app.dll`
/// or `acme_app::services`.
pub fn primary_module_segment(module_name: &str) -> &str {
    module_name
        .split(['.', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(module_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("FindPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
        assert_eq!(to_snake_case("find_pets_by_status"), "find_pets_by_status");
        assert_eq!(to_snake_case("HTTPResponse"), "httpresponse");
        assert_eq!(to_snake_case("getHTTPResponse"), "get_httpresponse");
        assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
        assert_eq!(to_snake_case("Charge"), "charge");
        assert_eq!(to_snake_case("Sha256Digest"), "sha256_digest");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Billing"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("charge2"));

        assert!(!is_identifier(""));
        assert!(!is_identifier("_"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier("a/b"));
        assert!(!is_identifier("Ünïcode"));
    }

    #[test]
    fn test_to_fn_name() {
        assert_eq!(to_fn_name("ChargeCard"), "charge_card");
        assert_eq!(to_fn_name("Type"), "type_");
        assert_eq!(to_fn_name("match"), "match_");
        assert_eq!(to_fn_name("Gen"), "gen_");
        assert_eq!(to_fn_name("_1"), "op_1");
    }

    #[test]
    fn test_primary_module_segment() {
        assert_eq!(primary_module_segment("Acme.Services.dll"), "Acme");
        assert_eq!(primary_module_segment("acme_app::services"), "acme_app");
        assert_eq!(primary_module_segment("acme-app"), "acme-app");
        assert_eq!(primary_module_segment("plain"), "plain");
    }
}
