//! Identifier to statement type resolution.

use super::{StatementConfig, StatementType};
use crate::core::statement::check_scope;
use crate::core::Location;
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// What happens when an identifier is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The last registration wins
    #[default]
    Override,
    /// Registering a taken identifier fails with
    /// [`TermError::DuplicateStatementType`]
    Reject,
}

/// Maps statement identifiers to statement types.
///
/// The registry is an explicit value handed to the orchestrator. It is
/// populated before any validation runs; registration needs `&mut self`, so
/// a registry shared behind an `Arc` is read-only.
///
/// ```
/// use std::sync::Arc;
/// use term_assay::core::StatementRegistry;
///
/// let registry = StatementRegistry::with_builtins();
/// assert!(registry.contains("not_null"));
/// assert!(registry.resolve("no_such_statement").is_err());
/// ```
#[derive(Clone, Default)]
pub struct StatementRegistry {
    types: HashMap<String, Arc<dyn StatementType>>,
    policy: CollisionPolicy,
}

impl StatementRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in statement types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::statements::register_builtins(&mut registry);
        registry
    }

    /// Sets the collision policy for subsequent registrations.
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the collision policy.
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Registers a statement type under `identifier`.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        statement_type: Arc<dyn StatementType>,
    ) -> Result<()> {
        let identifier = identifier.into();
        if self.types.contains_key(&identifier) {
            match self.policy {
                CollisionPolicy::Reject => {
                    return Err(TermError::DuplicateStatementType { identifier });
                }
                CollisionPolicy::Override => {
                    debug!(statement.type = %identifier, "Overriding registered statement type");
                }
            }
        }
        self.types.insert(identifier, statement_type);
        Ok(())
    }

    /// Registers a statement type under its own name.
    pub fn register_type<T: StatementType + 'static>(&mut self, statement_type: T) -> Result<()> {
        let identifier = statement_type.name().to_string();
        self.register(identifier, Arc::new(statement_type))
    }

    /// Looks up a statement type.
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn StatementType>> {
        self.types
            .get(identifier)
            .cloned()
            .ok_or_else(|| TermError::UnknownStatementType {
                identifier: identifier.to_string(),
            })
    }

    /// Whether `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = self.types.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        identifiers
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Synthesizes a statement configuration from a sample.
    ///
    /// Table-only types profile the whole sample. Column-scoped types profile
    /// every column of the sample; pass a projected sample to restrict them.
    ///
    /// # Errors
    ///
    /// [`TermError::NotSupported`] if the type has no profiler.
    #[instrument(skip(self, sample), fields(statement.type = %identifier, sample.rows = sample.num_rows()))]
    pub fn profile(&self, identifier: &str, sample: &RecordBatch) -> Result<StatementConfig> {
        let statement_type = self.resolve(identifier)?;
        let location = if statement_type.table_only() {
            Location::Table
        } else {
            Location::Columns(
                sample
                    .schema()
                    .fields()
                    .iter()
                    .map(|f| f.name().clone())
                    .collect(),
            )
        };
        check_scope(statement_type.as_ref(), &location)?;

        let options = statement_type.profile(sample)?;
        let config = StatementConfig::from_profile(identifier, location, options);
        // The profiled configuration must be accepted by its own type.
        statement_type.construct(&config.statement_options())?;
        Ok(config)
    }
}

impl std::fmt::Debug for StatementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementRegistry")
            .field("identifiers", &self.identifiers())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Statement, StatementOptions};
    use crate::statements::{NotNull, RowCount};
    use crate::test_fixtures::raw_table;

    #[derive(Debug)]
    struct Custom(&'static str);

    impl StatementType for Custom {
        fn name(&self) -> &str {
            self.0
        }

        fn expected_parameters(&self) -> &[&'static str] {
            &[]
        }

        fn build(&self, _options: &StatementOptions) -> Result<Box<dyn Statement>> {
            Err(TermError::NotSupported("never built".to_string()))
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = StatementRegistry::with_builtins();
        assert_eq!(
            registry.identifiers(),
            vec!["column_expression", "contain", "not_null", "row_count", "unique"]
        );
    }

    #[test]
    fn test_unknown_identifier() {
        let err = StatementRegistry::new().resolve("nope").unwrap_err();
        assert!(matches!(err, TermError::UnknownStatementType { identifier } if identifier == "nope"));
    }

    #[test]
    fn test_override_is_default_and_last_wins() {
        let mut registry = StatementRegistry::with_builtins();
        registry
            .register("not_null", Arc::new(Custom("replacement")))
            .unwrap();
        assert_eq!(registry.resolve("not_null").unwrap().name(), "replacement");
    }

    #[test]
    fn test_reject_policy() {
        let mut registry = StatementRegistry::new().with_collision_policy(CollisionPolicy::Reject);
        registry.register_type(Custom("mine")).unwrap();
        let err = registry.register_type(Custom("mine")).unwrap_err();
        assert!(matches!(err, TermError::DuplicateStatementType { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_profile_table_only_type() {
        let mut registry = StatementRegistry::new();
        registry.register_type(RowCount).unwrap();
        let sample = raw_table(vec![("a", vec![Some("1"), Some("2"), Some("2")])]);

        let config = registry.profile("row_count", &sample).unwrap();
        assert_eq!(config.location, Location::Table);
        assert_eq!(config.options["min"], 3);
        assert_eq!(config.options["max"], 3);
    }

    #[test]
    fn test_profile_column_type_scopes_to_sample_columns() {
        let mut registry = StatementRegistry::new();
        registry.register_type(NotNull).unwrap();
        let sample = raw_table(vec![("a", vec![Some("1"), None])]);

        let config = registry.profile("not_null", &sample).unwrap();
        assert_eq!(config.location, Location::column("a"));
        assert_eq!(config.options["at_least_%"], 50.0);
    }

    #[test]
    fn test_profile_not_supported() {
        let mut registry = StatementRegistry::new();
        registry.register_type(Custom("plain")).unwrap();
        let sample = raw_table(vec![("a", vec![Some("1")])]);
        let err = registry.profile("plain", &sample).unwrap_err();
        assert!(matches!(err, TermError::NotSupported(_)));
    }
}
