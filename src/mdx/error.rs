//! Error types for MDX construction.

use thiserror::Error;

/// Result type for MDX building operations.
pub type MdxResult<T> = Result<T, MdxError>;

/// Errors raised while assembling or serializing an MDX query.
///
/// All of these are detected before any text is emitted, so a failed
/// `to_mdx()` never hands back a partial query.
#[derive(Error, Debug)]
pub enum MdxError {
    /// A member, tuple or set is missing a name it needs to be rendered.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// A set operation name that the set model does not know.
    #[error("unknown set operator: '{0}'")]
    UnknownSetOperator(String),

    /// A comparison operator other than `=`, `<>`, `<`, `>`, `<=`, `>=`.
    #[error("unknown comparison operator: '{0}'")]
    UnknownComparison(String),

    /// A query definition document is structurally wrong.
    #[error("invalid query definition: {0}")]
    InvalidDefinition(String),

    /// A query definition document is not valid TOML.
    #[error("failed to parse query definition: {0}")]
    DefinitionParse(#[from] toml::de::Error),
}

impl MdxError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidExpression(message.into())
    }

    pub fn definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition(message.into())
    }
}
