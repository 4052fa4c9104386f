use axum::{
    http,
    response::{IntoResponse, Response},
};
pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Internal Server Error: {0:#}")]
    Internal(#[from] anyhow::Error),
    #[error("Authentication error: {0}")]
    Auth(&'static str),
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Internal(ref err) => {
                tracing::error!("{err:#}");
                (http::StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
            // Auth failures are always explained
            WebError::Auth(_) => (http::StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
            WebError::NotFound => (http::StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
}
