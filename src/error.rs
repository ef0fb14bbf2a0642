use thiserror::Error;

/// Errors returned when looking a value up in a container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("service not found in container: {0}")]
    NotFound(String),

    #[error("service '{name}' is not a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
}

impl RegistryError {
    /// Name of the entry the failed lookup was for.
    pub fn name(&self) -> &str {
        match self {
            RegistryError::NotFound(name) => name,
            RegistryError::TypeMismatch { name, .. } => name,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
