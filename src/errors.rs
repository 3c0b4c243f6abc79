use log::error;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::Responder;

/// Internal failures that can surface from a handler. Everything here maps
/// to an opaque 500 for the client; the detail only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("bad mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("mail build error: {0}")]
    Mail(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("server misconfigured")]
    Misconfigured,
}

pub type Result<T> = std::result::Result<T, Error>;

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        error!("{} {} failed: {self}", req.method(), req.uri());
        Status::InternalServerError.respond_to(req)
    }
}
