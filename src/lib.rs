#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::unnecessary_semicolon)]
#![deny(clippy::explicit_iter_loop)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::unwrap_or_default)]

/// Code generated from `proto/blog/v1/blog.proto`.
pub mod blogpb {
    #![allow(clippy::all)]
    tonic::include_proto!("blog.v1");
}

pub mod marshal;
pub mod params;
pub mod repo;
pub mod server;
pub mod traits;
pub mod types;
