use thiserror::Error;

/// Error type for invalid parameter declarations and accesses.
///
/// None of these are recoverable at run time: they all describe a table,
/// values file or feature configuration that is inconsistent.
#[derive(Error, Debug)]
pub enum GudError {
    #[error("{0}")]
    Error(String),
    #[error("Parameter '{name}' is declared more than once (group {group})")]
    DuplicateName { name: String, group: String },
    #[error("Parameter group '{0}' is declared more than once")]
    DuplicateGroup(String),
    #[error("Parameter '{0}' is not available in this configuration")]
    NotFound(String),
    #[error("Parameter group '{0}' is not declared")]
    UnknownGroup(String),
    #[error("Parameter '{name}' belongs to group '{actual}', not '{group}'")]
    WrongGroup {
        name: String,
        group: String,
        actual: String,
    },
    #[error("Dimension mismatch for '{name}': expected {expected} elements, got {found}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Dimension '{extent}' of '{name}' cannot be resolved from the sizing constants")]
    UnresolvedDimension { name: String, extent: String },
    #[error("Type mismatch for '{name}': expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("Parameter '{0}' has already been assigned")]
    AlreadyAssigned(String),
    #[error("Parameter '{0}' has no value and no default")]
    Unassigned(String),
    #[error("Parameter '{0}' is derived after loading and cannot be assigned directly")]
    DerivedParameter(String),
    #[error("Parameter '{0}' is not a derived parameter")]
    NotDerived(String),
    #[error("Table mentions {found} feature flags, at most {limit} are supported")]
    TooManyFeatureFlags { found: usize, limit: usize },
    #[error("Text value for '{name}' is {found} bytes long, the limit is {limit}")]
    TextTooLong {
        name: String,
        limit: usize,
        found: usize,
    },
    #[error("Generated block was modified: recorded checksum {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialise TOML: {0}")]
    Serialise(#[from] toml::ser::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, GudError>`.
pub type GudResult<T> = Result<T, GudError>;
