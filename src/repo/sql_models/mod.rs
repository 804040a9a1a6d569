mod blog_record;
pub use blog_record::*;

mod comment_record;
pub use comment_record::*;

pub mod pg_queries;
pub use pg_queries::*;
