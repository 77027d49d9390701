#![doc = include_str!("../README.md")]

// Public modules
mod common;

mod config;
mod dht;
mod error;
pub mod validator;

pub use crate::common::{
    make_put_record, split_key, ClosestPeers, Distance, Id, PeerId, Record, RoutingTable,
    SharedRoutingTable, ID_SIZE, MAX_BUCKET_SIZE_K, MAX_DISTANCE, TIME_FORMAT,
};
pub use bytes::Bytes;
pub use config::Config;
pub use dht::Dht;
pub use error::Error;
pub use validator::{NamespacedValidator, PublicKeyValidator, Validator};

/// Alias `Result<T, Error>` to `Result<T, kadcore::Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
