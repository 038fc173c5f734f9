use rocket::Request;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use serde_json::json;
use thiserror::Error;

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("MONGODB_URI (or DATABASE_URL / MONGODB_URL) must be set")]
    MissingUri,
    #[error("Unknown output format `{0}` (expected `json` or `table`)")]
    UnknownFormat(String),
    #[error("No benchmark found for `{0}`")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Malformed benchmark document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
    #[error("Could not encode documents: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid CORS configuration: {0}")]
    Cors(#[from] rocket_cors::Error),
    #[error("Server error: {0}")]
    Server(#[from] Box<rocket::Error>),
}

impl ViewerError {
    pub fn status(&self) -> Status {
        match self {
            ViewerError::NotFound(_) => Status::NotFound,
            ViewerError::Database(_) => Status::ServiceUnavailable,
            _ => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ViewerError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let message = match &self {
            ViewerError::NotFound(_) => self.to_string(),
            ViewerError::Database(_) => "Database unavailable".to_string(),
            _ => "Internal server error".to_string(),
        };

        if status.code >= 500 {
            log::error!("request failed: {}", self);
        }

        let body = json!({
            "error": message,
            "status": status.code
        })
        .to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}
