//! Conversions between the wire representations (protobuf messages and JSON
//! bodies) and the request/response shapes handled by the server endpoints.

mod requests;
pub use requests::*;

mod responses;
pub use responses::*;

mod proto;
pub use proto::*;
