//! Screening of user-provided SQL fragments.
//!
//! Column expressions are embedded into queries run against the scoped slice.
//! They must be plain boolean predicates: no statements, comments or
//! subqueries.

use crate::error::{Result, TermError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum accepted length of a SQL expression, in bytes.
pub const MAX_EXPRESSION_LENGTH: usize = 5000;

/// Security checks for SQL fragments.
pub struct SqlSecurity;

impl SqlSecurity {
    /// Validates a boolean SQL expression such as `price > 0 AND qty <= 10`.
    ///
    /// # Examples
    /// ```rust
    /// use term_assay::security::SqlSecurity;
    ///
    /// assert!(SqlSecurity::validate_sql_expression("price > 100").is_ok());
    /// assert!(SqlSecurity::validate_sql_expression("last_updated IS NOT NULL").is_ok());
    /// assert!(SqlSecurity::validate_sql_expression("1 = 1; DROP TABLE t").is_err());
    /// ```
    pub fn validate_sql_expression(expression: &str) -> Result<()> {
        if expression.trim().is_empty() {
            return Err(TermError::SecurityError(
                "SQL expression cannot be empty".to_string(),
            ));
        }

        if expression.len() > MAX_EXPRESSION_LENGTH {
            return Err(TermError::SecurityError(format!(
                "SQL expression too long (max {MAX_EXPRESSION_LENGTH} characters)"
            )));
        }

        if expression.contains('\0') {
            return Err(TermError::SecurityError(
                "SQL expression cannot contain null bytes".to_string(),
            ));
        }

        Self::check_dangerous_sql_patterns(expression)
    }

    fn check_dangerous_sql_patterns(expression: &str) -> Result<()> {
        let expression_lower = expression.to_lowercase();

        for token in [";", "--", "/*", "*/"] {
            if expression_lower.contains(token) {
                return Err(TermError::SecurityError(format!(
                    "SQL expression contains forbidden token: '{token}'"
                )));
            }
        }

        // Compile-time constant patterns.
        #[allow(clippy::expect_used)]
        static DANGEROUS_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"\b(drop|create|alter|truncate|insert|update|delete|merge|grant|revoke|exec|execute|declare|cursor|fetch|begin|commit|rollback|transaction|copy|attach|detach|information_schema|pg_catalog|openrowset|opendatasource|load_file|outfile|dumpfile)\b",
            )
            .expect("Hard-coded regex pattern should be valid")
        });
        if let Some(found) = DANGEROUS_KEYWORDS.find(&expression_lower) {
            return Err(TermError::SecurityError(format!(
                "SQL expression contains dangerous keyword: '{}'",
                found.as_str()
            )));
        }

        #[allow(clippy::expect_used)]
        static SUSPICIOUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
            [
                r"\bunion\b",         // Union-based injection
                r"\bselect\b",        // Subqueries
                r"'\s*or\s+'",        // OR-based injection
                r"'\s*and\s+'",       // AND-based injection
            ]
            .into_iter()
            .map(|pattern| Regex::new(pattern).expect("Hard-coded regex pattern should be valid"))
            .collect()
        });
        for regex in SUSPICIOUS_PATTERNS.iter() {
            if regex.is_match(&expression_lower) {
                return Err(TermError::SecurityError(format!(
                    "SQL expression contains suspicious pattern matching: {}",
                    regex.as_str()
                )));
            }
        }

        Ok(())
    }
}
