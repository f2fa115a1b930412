use thiserror::Error;

/// Result type alias using AssertxError
pub type Result<T> = std::result::Result<T, AssertxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically. A failed match is not an error inside the engine;
/// `AssertionMismatch` only appears once a caller escalates a failed
/// verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller errors
    InvalidArgument,
    InvalidName,
    InvalidSubject,

    // Resolution
    NotFound,

    // Evaluation
    AssertionMismatch,

    // Configuration
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::InvalidSubject => "ERR_INVALID_SUBJECT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AssertionMismatch => "ERR_ASSERTION_MISMATCH",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is a caller error (bad name, bad subject, bad option)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidArgument | ExErrorKind::InvalidName | ExErrorKind::InvalidSubject
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification (`kind`) plus optional context describing
/// where the error arose.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    subject: Option<String>,
    attribute: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            subject: None,
            attribute: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add subject context (class name or value description)
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add attribute name context
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the subject context, if any
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Get the attribute context, if any
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(subject) = &self.subject {
            write!(f, " (subject: {})", subject)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute: {})", attribute)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for assertx operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssertxError {
    // ===== Caller Errors =====
    /// Attribute name does not match the identifier pattern
    #[error("Invalid attribute name: {name:?}")]
    InvalidAttributeName { name: String },

    /// Static lookup requested on something that is not a type reference
    #[error("Invalid subject for static attribute lookup: {reason}")]
    InvalidSubject { reason: String },

    /// Static lookup by class name, but no such class is registered
    #[error("Class not found: {class}")]
    UnknownClass { class: String },

    /// Tolerance must be a non-negative number
    #[error("Invalid tolerance {tolerance}: must be a non-negative number")]
    InvalidTolerance { tolerance: f64 },

    // ===== Resolution Errors =====
    /// Attribute absent from the subject and every ancestor
    #[error("Attribute {name} not found on {class} or any ancestor")]
    AttributeNotFound { class: String, name: String },

    /// Attribute is declared but holds no value
    #[error("Attribute {class}::{name} is declared but not initialized")]
    AttributeUninitialized { class: String, name: String },

    // ===== Evaluation =====
    /// A constraint did not match and the caller escalated the verdict
    #[error("Failed asserting that {actual} {description}")]
    AssertionFailed { actual: String, description: String },

    /// The caller signalled a failure explicitly
    #[error("{message}")]
    FailureSignaled { message: String },

    // ===== Configuration =====
    /// Configuration could not be parsed or validated
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<AssertxError> for ExError {
    fn from(err: AssertxError) -> Self {
        match err {
            AssertxError::InvalidAttributeName { name } => ExError::new(ExErrorKind::InvalidName)
                .with_attribute(name)
                .with_message("Attribute name must be a valid identifier"),

            AssertxError::InvalidSubject { reason } => {
                ExError::new(ExErrorKind::InvalidSubject).with_message(reason)
            }

            AssertxError::UnknownClass { class } => ExError::new(ExErrorKind::InvalidSubject)
                .with_subject(class)
                .with_message("Class not found"),

            AssertxError::InvalidTolerance { tolerance } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_message(format!("Tolerance {} must be non-negative", tolerance))
            }

            AssertxError::AttributeNotFound { class, name } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_subject(class)
                    .with_attribute(name)
                    .with_message("Attribute not found")
            }

            AssertxError::AttributeUninitialized { class, name } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_subject(class)
                    .with_attribute(name)
                    .with_message("Attribute is declared but not initialized")
            }

            AssertxError::AssertionFailed {
                actual,
                description,
            } => ExError::new(ExErrorKind::AssertionMismatch)
                .with_subject(actual)
                .with_message(description),

            AssertxError::FailureSignaled { message } => {
                ExError::new(ExErrorKind::AssertionMismatch).with_message(message)
            }

            AssertxError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }
        }
    }
}
