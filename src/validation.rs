//! Input rules applied at the edge, before a request reaches the orchestrator.
//!
//! Ids must be in `1..=MAX_ID` (they are stored as signed 64-bit keys); an added
//! count must be in `1..=MAX_ITEM_COUNT`.
//! The `parse_*` functions double as clap value parsers.

use thiserror::Error;

pub const MAX_ITEM_COUNT: u64 = 60_000;

/// Largest id a `BIGINT` key can hold.
pub const MAX_ID: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field}: {value:?}")]
    Malformed { field: &'static str, value: String },

    #[error("Invalid {0}: must be greater than 0")]
    ZeroId(&'static str),

    #[error("Invalid {field} {id}: must not exceed {max}", max = MAX_ID)]
    IdOutOfRange { field: &'static str, id: u64 },

    #[error("Invalid count {0}: must be between 1 and {max}", max = MAX_ITEM_COUNT)]
    CountOutOfRange(u64),
}

pub fn validate_id(field: &'static str, id: u64) -> Result<u64, ValidationError> {
    if id == 0 {
        return Err(ValidationError::ZeroId(field));
    }
    if id > MAX_ID {
        return Err(ValidationError::IdOutOfRange { field, id });
    }
    Ok(id)
}

pub fn validate_count(count: u64) -> Result<u64, ValidationError> {
    if count == 0 || count > MAX_ITEM_COUNT {
        return Err(ValidationError::CountOutOfRange(count));
    }
    Ok(count)
}

fn parse_u64(field: &'static str, raw: &str) -> Result<u64, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::Malformed {
        field,
        value: raw.to_string(),
    })
}

pub fn parse_user_id(raw: &str) -> Result<u64, ValidationError> {
    validate_id("user_id", parse_u64("user_id", raw)?)
}

pub fn parse_sku_id(raw: &str) -> Result<u64, ValidationError> {
    validate_id("sku_id", parse_u64("sku_id", raw)?)
}

pub fn parse_count(raw: &str) -> Result<u64, ValidationError> {
    validate_count(parse_u64("count", raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids() {
        assert_eq!(parse_user_id("42"), Ok(42));
        assert_eq!(parse_sku_id("0"), Err(ValidationError::ZeroId("sku_id")));
        assert!(matches!(parse_user_id("-3"), Err(ValidationError::Malformed { .. })));
        assert!(matches!(parse_user_id("abc"), Err(ValidationError::Malformed { .. })));
    }

    #[test]
    fn test_ids_above_bigint_range_are_refused() {
        assert_eq!(parse_user_id("9223372036854775807"), Ok(MAX_ID));
        assert_eq!(
            parse_user_id("9223372036854775808"),
            Err(ValidationError::IdOutOfRange {
                field: "user_id",
                id: 1 << 63,
            })
        );
        assert!(matches!(
            parse_sku_id(&u64::MAX.to_string()),
            Err(ValidationError::IdOutOfRange { field: "sku_id", .. })
        ));
    }

    #[test]
    fn test_count_bounds() {
        assert_eq!(parse_count("1"), Ok(1));
        assert_eq!(parse_count("60000"), Ok(60_000));
        assert_eq!(parse_count("60001"), Err(ValidationError::CountOutOfRange(60_001)));
        assert_eq!(validate_count(0), Err(ValidationError::CountOutOfRange(0)));
    }
}
