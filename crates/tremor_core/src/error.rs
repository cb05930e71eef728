use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid range: {message}")]
    InvalidRange { message: String },
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("unsupported: {message}")]
    Unsupported { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
    #[error("validation error: {message}")]
    Validation { message: String },
}

impl ModelError {
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::ModelError;

    #[test]
    fn helper_constructors_set_variants() {
        let err = ModelError::invalid_range("start >= end");
        assert!(matches!(err, ModelError::InvalidRange { .. }));
        let err = ModelError::type_mismatch("expected float");
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
        let err = ModelError::not_found("no hazard stage");
        assert!(matches!(err, ModelError::NotFound { .. }));
        let err = ModelError::unsupported("result copy");
        assert!(matches!(err, ModelError::Unsupported { .. }));
        let err = ModelError::storage("disk");
        assert!(matches!(err, ModelError::Storage { .. }));
        let err = ModelError::validation("bad input");
        assert!(matches!(err, ModelError::Validation { .. }));
    }
}
