//! Sanitizers for text that ends up inside generated Rust source.
//!
//! Generated units are compiled by the host, so anything taken from user
//! input must not be able to close a comment, break a literal or start a new
//! line of code.

/// Opening line of the embedded service model block
pub const MODEL_BLOCK_BEGIN: &str = "===JSON BEGIN===";
/// Closing line of the embedded service model block
pub const MODEL_BLOCK_END: &str = "===JSON END===";

/// Neutralises everything that could end or nest a Rust block comment.
///
/// Double quotes become single quotes, and a space is inserted between any
/// adjacent `*` and `/` so neither `*/` nor `/*` survives. Rust block
/// comments nest, so an unmatched `/*` is as harmful as a stray `*/`.
pub fn escape_block_comment(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    let mut previous = None;

    for ch in input.chars() {
        let ch = if ch == '"' { '\'' } else { ch };
        if matches!((previous, ch), (Some('*'), '/') | (Some('/'), '*')) {
            escaped.push(' ');
        }
        escaped.push(ch);
        previous = Some(ch);
    }

    escaped
}

/// Wraps serialized text in a delimited, non-executable comment block.
///
/// # Examples
/// ```
/// use servicegen::generation::sanitizers::embed_in_comment;
///
/// let block = embed_in_comment(r#"[{"Name":"Billing"}]"#);
/// assert!(block.starts_with("/* Auto Generated"));
/// assert!(block.contains("[{'Name':'Billing'}]"));
/// assert!(block.ends_with("*/"));
/// ```
pub fn embed_in_comment(source: &str) -> String {
    format!(
        "/* Auto Generated\n{MODEL_BLOCK_BEGIN}\n{}\n{MODEL_BLOCK_END}\n*/",
        escape_block_comment(source)
    )
}

/// Collapses text onto one line so it is safe inside `//` and `///` comments.
///
/// Line breaks and other control characters become spaces; a bare carriage
/// return is rejected by rustc inside doc comments.
pub fn single_line(input: &str) -> String {
    input
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text for inline code spans in doc comments
pub fn doc_code(input: &str) -> String {
    single_line(input).replace('`', "'")
}

/// Renders a Rust string literal with every special character escaped.
pub fn rust_string_literal(value: &str) -> String {
    format!("{value:?}")
}
