pub mod health_handlers;
pub mod user_handlers;

use crate::error::{AppError, Result};

/// Parses the `{id}` path segment; ids are PostgreSQL `SERIAL` values.
pub fn parse_user_id(raw: &str) -> Result<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert!(matches!(parse_user_id("abc"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_user_id("1.5"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_user_id("99999999999"), Err(AppError::InvalidId(_))));
    }
}
