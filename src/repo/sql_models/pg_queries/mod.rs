mod blog;
pub use blog::*;

mod comment;
pub use comment::*;
