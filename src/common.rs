//! Identifiers, records and the routing table shared by the rest of the library.

mod id;
mod key;
mod peer_id;
mod record;
mod routing_table;

pub use id::*;
pub use key::*;
pub use peer_id::*;
pub use record::*;
pub use routing_table::*;
