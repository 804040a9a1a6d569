mod id;
pub use id::*;

mod blog;
pub use blog::*;

mod page;
pub use page::*;

/// Server-assigned instant, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
