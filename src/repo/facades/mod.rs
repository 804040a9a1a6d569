//! # Facade Module
//!
//! Facades sit between the request handling layer and the repository. They own the
//! multi-statement logic of each operation, translate database rows into domain
//! [`types`](crate::types), and attach operation context to every failure so that
//! callers receive a [`FacadeError`] describing what was being attempted on which
//! entity.

mod facade_blog;
pub use facade_blog::*;

mod facade_error;
pub use facade_error::*;
