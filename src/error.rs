use mongodb::bson::de::Error as BsonError;
use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Bson(#[from] BsonError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// A 404 for the described resource.
    pub fn not_found(what: String) -> Self {
        Self::Status(Status::NotFound, format!("{what} not found"))
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match self {
            Self::Db(_) | Self::Bson(_) => Status::InternalServerError,
            Self::Status(status, _) => status,
        };
        if status.class() == rocket::http::StatusClass::ServerError {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        Err(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_404() {
        let err = Error::not_found("Question 3".to_string());
        assert_eq!(err.to_string(), "Question 3 not found");
        assert!(matches!(err, Error::Status(status, _) if status == Status::NotFound));
    }
}
