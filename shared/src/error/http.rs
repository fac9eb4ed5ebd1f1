//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::LabNotFound
            | Self::PartyNotFound
            | Self::QualityNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::OrderSequenceConflict | Self::QualityNameExists => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::InvalidOrderStatus
            | Self::InvalidOrderType
            | Self::OrderEmpty
            | Self::InvalidQuantity
            | Self::NoOrdersToDelete
            | Self::OrdersExist
            | Self::InvalidLabStatus
            | Self::InvalidPartyId => StatusCode::BAD_REQUEST,

            // 504 Gateway Timeout: storage budget exceeded, safe to retry
            Self::QueryTimeout => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_codes() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PartyNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_order_guards_are_bad_request() {
        assert_eq!(ErrorCode::NoOrdersToDelete.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::OrdersExist.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidOrderStatus.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_and_timeout() {
        assert_eq!(ErrorCode::OrderSequenceConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::QueryTimeout.http_status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_auth_codes() {
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
    }
}
