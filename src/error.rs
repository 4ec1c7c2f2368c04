use std::io::Cursor;

use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Boundary-level failures. The playlist core itself never fails; its error
/// paths are notifications, so everything here is about the HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedAudio(String),

    #[error("Audio file too large")]
    PayloadTooLarge,

    #[error("Internal server error")]
    Internal,
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        let status = match self {
            AppError::UnsupportedAudio(_) => Status::UnsupportedMediaType,
            AppError::PayloadTooLarge => Status::PayloadTooLarge,
            AppError::Io(_) | AppError::Internal => Status::InternalServerError,
        };

        let body = serde_json::json!({ "error": self.to_string() }).to_string();
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
