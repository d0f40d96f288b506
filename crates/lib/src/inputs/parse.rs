//! Parsing of `name:value` dependency arguments.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("invalid dependency '{0}': expected name:value")]
  MissingSeparator(String),

  #[error("invalid dependency '{0}': name is empty")]
  EmptyName(String),
}

/// Split a single `name:value` argument on its first colon.
///
/// The value may itself contain colons (`url:https://example.com`).
pub fn parse_dep(arg: &str) -> Result<(String, String), ParseError> {
  let (name, value) = arg
    .split_once(':')
    .ok_or_else(|| ParseError::MissingSeparator(arg.to_string()))?;
  if name.is_empty() {
    return Err(ParseError::EmptyName(arg.to_string()));
  }
  Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_first_colon() {
    assert_eq!(parse_dep("src:main.c").unwrap(), ("src".to_string(), "main.c".to_string()));
    assert_eq!(
      parse_dep("url:https://example.com:8080").unwrap(),
      ("url".to_string(), "https://example.com:8080".to_string())
    );
    assert_eq!(parse_dep("empty:").unwrap(), ("empty".to_string(), String::new()));
  }

  #[test]
  fn rejects_malformed() {
    assert_eq!(
      parse_dep("nocolon"),
      Err(ParseError::MissingSeparator("nocolon".to_string()))
    );
    assert_eq!(parse_dep(":value"), Err(ParseError::EmptyName(":value".to_string())));
  }
}
