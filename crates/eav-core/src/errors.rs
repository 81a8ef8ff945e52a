use std::fmt;

use thiserror::Error;

/// Result type alias using EavError
pub type Result<T> = std::result::Result<T, EavError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidConfiguration,
    ReservedCode,
    AlreadyExists,
    UnknownReference,
    InvalidIdentifier,
    CycleDetected,
    ContextMismatch,

    // Lookup
    NotFound,
    MissingContext,

    // State
    NotInstantiable,
    Singleton,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfiguration => "ERR_INVALID_CONFIGURATION",
            ExErrorKind::ReservedCode => "ERR_RESERVED_CODE",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::UnknownReference => "ERR_UNKNOWN_REFERENCE",
            ExErrorKind::InvalidIdentifier => "ERR_INVALID_IDENTIFIER",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::ContextMismatch => "ERR_CONTEXT_MISMATCH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MissingContext => "ERR_MISSING_CONTEXT",
            ExErrorKind::NotInstantiable => "ERR_NOT_INSTANTIABLE",
            ExErrorKind::Singleton => "ERR_SINGLETON",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Flattened view of an [`EavError`] with classification fields for callers
/// that report errors (CLI, logs) rather than match on variants.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    family: Option<String>,
    attribute: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            family: None,
            attribute: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add family code context
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Add attribute code context
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(family) = &self.family {
            write!(f, " (family: {})", family)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute: {})", attribute)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Coarse classification of model errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fatal, load-time only: the model cannot be built
    Configuration,
    /// Caller asked for something that does not exist
    Lookup,
    /// Caller asked for an operation the family forbids
    State,
    /// Reading configuration from disk failed
    Io,
}

/// Which identifier constraint an attribute failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierViolation {
    NotUnique,
    NotRequired,
    Collection,
    Contextual,
}

impl fmt::Display for IdentifierViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IdentifierViolation::NotUnique => "should be unique",
            IdentifierViolation::NotRequired => "should be required",
            IdentifierViolation::Collection => "should NOT be a collection",
            IdentifierViolation::Contextual => "should NOT be contextualized",
        };
        f.write_str(text)
    }
}

/// Error taxonomy for model construction and runtime reads
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EavError {
    // ===== Configuration Errors =====
    /// Attribute code collides with a built-in entity field
    #[error("Attribute code '{code}' is a reserved code")]
    ReservedAttributeCode { code: String },

    /// Same attribute code registered twice in the global registry
    #[error("Attribute '{code}' is already registered")]
    DuplicateAttribute { code: String },

    /// Attribute references a type missing from the type catalog
    #[error("Unknown attribute type '{attribute_type}' for attribute '{code}'")]
    UnknownAttributeType {
        code: String,
        attribute_type: String,
    },

    /// Attribute declared unique on a type that cannot be unique
    #[error("Attribute '{code}' of type '{attribute_type}' does not support uniqueness")]
    UniqueNotSupported {
        code: String,
        attribute_type: String,
    },

    #[error(
        "Bad configuration for family {family}: attribute as label '{attribute}' doesn't exists for this family"
    )]
    UnknownLabelAttribute { family: String, attribute: String },

    #[error(
        "Bad configuration for family {family}: attribute as identifier '{attribute}' doesn't exists for this family"
    )]
    UnknownIdentifierAttribute { family: String, attribute: String },

    #[error("Bad configuration for family {family}: attribute as identifier '{attribute}' {violation}")]
    InvalidIdentifierAttribute {
        family: String,
        attribute: String,
        violation: IdentifierViolation,
    },

    #[error("Bad configuration for family {family}: parent family '{parent}' doesn't exists")]
    UnknownParentFamily { family: String, parent: String },

    /// Family inherits from itself, directly or transitively
    #[error("Inheritance cycle detected: {}", chain.join(" -> "))]
    InheritanceCycle { chain: Vec<String> },

    #[error("Family '{family}' is already registered")]
    DuplicateFamily { family: String },

    #[error("Unknown data class '{class_ref}' for family {family}")]
    UnknownDataClass { family: String, class_ref: String },

    #[error("Unknown value class '{class_ref}' for family {family}")]
    UnknownValueClass { family: String, class_ref: String },

    /// Default context lacks a key the bound value class requires
    #[error(
        "Default context is missing key '{key}' required by value class '{class_ref}' of family {family}"
    )]
    DefaultContextMismatch {
        family: String,
        class_ref: String,
        key: String,
    },

    /// Malformed configuration document (syntax, unknown key, wrong type)
    #[error("Invalid model configuration: {message}")]
    InvalidConfiguration { message: String },

    // ===== Lookup Errors =====
    #[error("No attribute with code : {code}")]
    AttributeNotFound { code: String },

    #[error("Unknown attribute {code} in family {family}")]
    MissingAttribute { family: String, code: String },

    #[error("Family not found: {family}")]
    FamilyNotFound { family: String },

    /// Masked context key absent from the effective context
    #[error("Missing context key '{key}' for attribute {attribute} in family {family}")]
    MissingContextKey {
        family: String,
        attribute: String,
        key: String,
    },

    // ===== State Errors =====
    #[error("Family {family} is not instantiable")]
    NotInstantiable { family: String },

    #[error("Family {family} is a singleton, use the repository to retrieve the instance")]
    SingletonFamily { family: String },

    // ===== Generic Errors =====
    #[error("IO error: {message}")]
    Io { message: String },
}

impl EavError {
    /// Classify this error as configuration, lookup, state or IO
    pub fn category(&self) -> ErrorCategory {
        match self {
            EavError::ReservedAttributeCode { .. }
            | EavError::DuplicateAttribute { .. }
            | EavError::UnknownAttributeType { .. }
            | EavError::UniqueNotSupported { .. }
            | EavError::UnknownLabelAttribute { .. }
            | EavError::UnknownIdentifierAttribute { .. }
            | EavError::InvalidIdentifierAttribute { .. }
            | EavError::UnknownParentFamily { .. }
            | EavError::InheritanceCycle { .. }
            | EavError::DuplicateFamily { .. }
            | EavError::UnknownDataClass { .. }
            | EavError::UnknownValueClass { .. }
            | EavError::DefaultContextMismatch { .. }
            | EavError::InvalidConfiguration { .. } => ErrorCategory::Configuration,

            EavError::AttributeNotFound { .. }
            | EavError::MissingAttribute { .. }
            | EavError::FamilyNotFound { .. }
            | EavError::MissingContextKey { .. } => ErrorCategory::Lookup,

            EavError::NotInstantiable { .. } | EavError::SingletonFamily { .. } => {
                ErrorCategory::State
            }

            EavError::Io { .. } => ErrorCategory::Io,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_lookup_error(&self) -> bool {
        self.category() == ErrorCategory::Lookup
    }

    pub fn is_state_error(&self) -> bool {
        self.category() == ErrorCategory::State
    }
}

/// Conversion from EavError to ExError
impl From<EavError> for ExError {
    fn from(err: EavError) -> Self {
        let message = err.to_string();
        let base = match err {
            EavError::ReservedAttributeCode { code } => ExError::new(ExErrorKind::ReservedCode)
                .with_op("register_attribute")
                .with_attribute(code),

            EavError::DuplicateAttribute { code } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("register_attribute")
                .with_attribute(code),

            EavError::UnknownAttributeType { code, .. } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_op("create_attribute")
                    .with_attribute(code)
            }

            EavError::UniqueNotSupported { code, .. } => {
                ExError::new(ExErrorKind::InvalidConfiguration)
                    .with_op("create_attribute")
                    .with_attribute(code)
            }

            EavError::UnknownLabelAttribute { family, attribute }
            | EavError::UnknownIdentifierAttribute { family, attribute } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_op("build_family")
                    .with_family(family)
                    .with_attribute(attribute)
            }

            EavError::InvalidIdentifierAttribute {
                family, attribute, ..
            } => ExError::new(ExErrorKind::InvalidIdentifier)
                .with_op("build_family")
                .with_family(family)
                .with_attribute(attribute),

            EavError::UnknownParentFamily { family, .. } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_op("build_family")
                    .with_family(family)
            }

            EavError::InheritanceCycle { chain } => {
                let head = chain.first().cloned().unwrap_or_default();
                ExError::new(ExErrorKind::CycleDetected)
                    .with_op("load_model")
                    .with_family(head)
            }

            EavError::DuplicateFamily { family } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("register_family")
                .with_family(family),

            EavError::UnknownDataClass { family, .. }
            | EavError::UnknownValueClass { family, .. } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_op("build_family")
                    .with_family(family)
            }

            EavError::DefaultContextMismatch { family, .. } => {
                ExError::new(ExErrorKind::ContextMismatch)
                    .with_op("check_context")
                    .with_family(family)
            }

            EavError::InvalidConfiguration { .. } => {
                ExError::new(ExErrorKind::InvalidConfiguration).with_op("parse_config")
            }

            EavError::AttributeNotFound { code } => ExError::new(ExErrorKind::NotFound)
                .with_op("get_attribute")
                .with_attribute(code),

            EavError::MissingAttribute { family, code } => ExError::new(ExErrorKind::NotFound)
                .with_op("get_attribute")
                .with_family(family)
                .with_attribute(code),

            EavError::FamilyNotFound { family } => ExError::new(ExErrorKind::NotFound)
                .with_op("get_family")
                .with_family(family),

            EavError::MissingContextKey {
                family, attribute, ..
            } => ExError::new(ExErrorKind::MissingContext)
                .with_op("create_value")
                .with_family(family)
                .with_attribute(attribute),

            EavError::NotInstantiable { family } => ExError::new(ExErrorKind::NotInstantiable)
                .with_op("create_data")
                .with_family(family),

            EavError::SingletonFamily { family } => ExError::new(ExErrorKind::Singleton)
                .with_op("create_data")
                .with_family(family),

            EavError::Io { .. } => ExError::new(ExErrorKind::Io).with_op("read_config"),
        };
        base.with_message(message)
    }
}
