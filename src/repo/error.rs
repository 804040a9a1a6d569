#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("backend error :: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("invalid configuration :: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` if the statement was rejected because it referenced a
    /// row that does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Backend(sqlx::Error::Database(err)) => err.is_foreign_key_violation(),
            _ => false,
        }
    }

    /// Returns `true` if the server cancelled the statement because it ran
    /// past the transaction's `statement_timeout`.
    pub fn is_statement_timeout(&self) -> bool {
        match self {
            Self::Backend(sqlx::Error::Database(err)) => err.code().as_deref() == Some("57014"),
            _ => false,
        }
    }
}
