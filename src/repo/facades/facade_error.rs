use crate::repo;

#[derive(thiserror::Error, Debug)]
pub enum FacadeError {
    #[error("unable to find {0}")]
    NotFound(String),
    #[error("unable to {context} :: {source}")]
    RepositoryError {
        context: String,
        #[source]
        source: repo::Error,
    },
}

impl FacadeError {
    pub fn blog_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("blog `{id}`"))
    }

    /// Returns a mapper wrapping a repository error with the given operation context.
    pub fn repository(context: impl Into<String>) -> impl FnOnce(repo::Error) -> Self {
        let context = context.into();
        move |source| Self::RepositoryError { context, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if the operation ran out of its time budget on the server.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RepositoryError { source, .. } if source.is_statement_timeout())
    }
}
