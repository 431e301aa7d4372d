#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("live feed setup failed: {0}")]
    Feed(#[from] FeedError),
}

#[derive(Debug)]
struct HttpApiError {
    status: StatusCode,
    error: ApiError,
}

impl HttpApiError {
    fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    fn invalid_scenario(message: impl Into<String>, details: Option<String>) -> Self {
        Self::bad_request(ApiError::new(ErrorCode::InvalidScenario, message, details))
    }

    fn invalid_reading(message: impl Into<String>, details: Option<String>) -> Self {
        Self::bad_request(ApiError::new(ErrorCode::InvalidReading, message, details))
    }

    fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new(ErrorCode::InternalError, message, details),
        }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
