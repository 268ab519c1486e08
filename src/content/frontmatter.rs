//! Front-matter parsing
//!
//! Documents open with a YAML block delimited by `---` lines. Unlike lenient
//! generators that fall back to treating a broken block as body text, a
//! malformed block here is an error: silently shipping a post whose metadata
//! was never read is worse than failing the build.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from splitting or decoding a front-matter block
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front-matter block is missing its closing `---`")]
    Unterminated,
    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a document into its YAML front-matter block and markdown body
///
/// Returns `(yaml, body)`; `yaml` is `None` when the document carries no
/// front-matter block at all.
pub fn split(content: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}');

    if !content.starts_with("---") {
        return Ok((None, content));
    }

    let rest = &content[3..];
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = match rest.strip_prefix('\n') {
        Some(r) => r,
        // `---` not followed by a newline is body text, not a delimiter
        None => return Ok((None, content)),
    };

    match rest.find("\n---") {
        Some(end) => {
            let yaml = &rest[..end];
            let body = &rest[end + 4..];
            let body = body.strip_prefix('\r').unwrap_or(body);
            let body = body.strip_prefix('\n').unwrap_or(body);
            Ok((Some(yaml), body))
        }
        None => Err(FrontMatterError::Unterminated),
    }
}

/// Parse a document into typed front-matter and the markdown body
///
/// A document without a front-matter block gets the type's default matter,
/// so missing required fields surface as schema violations.
pub fn parse<T>(content: &str) -> Result<(T, &str), FrontMatterError>
where
    T: DeserializeOwned + Default,
{
    let (yaml, body) = split(content)?;
    let matter = match yaml {
        Some(y) if !y.trim().is_empty() => serde_yaml::from_str(y)?,
        _ => T::default(),
    };
    Ok((matter, body))
}
