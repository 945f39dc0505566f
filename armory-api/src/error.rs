use thiserror::Error;

use armory_core::ValidationError;

/// Request outcome an HTTP transport can map 1:1 onto a response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("player not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status the transport should answer with.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Invalid(_) => 400,
            ApiError::NotFound => 404,
            ApiError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use armory_core::ValidationError;

    use super::ApiError;

    #[test]
    fn statuses_match_the_error_kind() {
        assert_eq!(
            ApiError::Invalid(ValidationError::InvalidField("name")).status(),
            400
        );
        assert_eq!(
            ApiError::Invalid(ValidationError::OutOfRange("birthday")).status(),
            400
        );
        assert_eq!(ApiError::NotFound.status(), 404);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("pool exhausted")).status(),
            500
        );
    }

    #[test]
    fn invalid_field_message_names_the_field() {
        let err = ApiError::from(ValidationError::InvalidField("pageSize"));
        assert_eq!(err.to_string(), "pageSize is invalid");
    }
}
