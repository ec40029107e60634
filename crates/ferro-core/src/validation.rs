//! # Validation Module
//!
//! Input validation for operator-entered data.
//!
//! Validation runs in the commands layer before business logic; the
//! database constraints (NOT NULL, UNIQUE) are the last line of defense.
//! Failures surface as messages at the prompt, never as panics.

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an article number (the business key on the shelf label).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use ferro_core::validation::validate_article_number;
///
/// assert!(validate_article_number("TOOL-001").is_ok());
/// assert!(validate_article_number("").is_err());
/// assert!(validate_article_number("has space").is_err());
/// ```
pub fn validate_article_number(article: &str) -> ValidationResult<()> {
    let article = article.trim();

    if article.is_empty() {
        return Err(ValidationError::Required {
            field: "article number".to_string(),
        });
    }

    if article.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "article number".to_string(),
            max: 50,
        });
    }

    if !article
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "article number".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product or customer name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns the full active listing)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (zero allowed for giveaway items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock count.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a percentage discount value in basis points.
///
/// ## Rules
/// - Must be between 1 and 10000 (0.01% to 100%)
pub fn validate_percentage_bps(bps: i64) -> ValidationResult<()> {
    if bps <= 0 || bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 1,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_article_number() {
        assert!(validate_article_number("TOOL-001").is_ok());
        assert!(validate_article_number("FAST_045").is_ok());

        assert!(validate_article_number("").is_err());
        assert!(validate_article_number("   ").is_err());
        assert!(validate_article_number("has space").is_err());
        assert!(validate_article_number(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Claw Hammer").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1250).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_percentage_bps() {
        assert!(validate_percentage_bps(1000).is_ok());
        assert!(validate_percentage_bps(10000).is_ok());
        assert!(validate_percentage_bps(0).is_err());
        assert!(validate_percentage_bps(10001).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  hammer  ").unwrap(), "hammer");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }
}
