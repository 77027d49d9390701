//! Dht node.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::{
    common::{Id, Record, RoutingTable, SharedRoutingTable},
    config::Config,
    validator::{NamespacedValidator, PublicKeyValidator, Validator, PUBLIC_KEY_NAMESPACE},
    Result,
};

#[derive(Debug, Clone)]
/// The routing and record validation state of one local node.
///
/// Cloning is cheap, and clones share the same state, so a lookup task and
/// a connection handler can each hold one.
pub struct Dht {
    routing_table: SharedRoutingTable,
    validator: Arc<NamespacedValidator>,
}

impl Dht {
    pub fn new(id: Id, config: Config) -> Self {
        let validator = NamespacedValidator::empty();
        validator.add_validator(
            PUBLIC_KEY_NAMESPACE,
            PublicKeyValidator::new().with_linkage(config.verify_public_key_linkage),
        );

        debug!(?id, bucket_size = config.bucket_size, "New Dht");

        Dht {
            routing_table: SharedRoutingTable::new(RoutingTable::with_bucket_size(
                id,
                config.bucket_size,
            )),
            validator: Arc::new(validator),
        }
    }

    // === Getters ===

    /// Returns the [Id] of this node.
    pub fn id(&self) -> Id {
        self.routing_table.id()
    }

    pub fn routing_table(&self) -> &SharedRoutingTable {
        &self.routing_table
    }

    pub fn validator(&self) -> &NamespacedValidator {
        &self.validator
    }

    // === Public Methods ===

    /// Add a newly connected peer to the routing table.
    pub fn on_peer_connected(&self, peer: Id) -> bool {
        self.routing_table.add(peer)
    }

    /// Remove a disconnected peer from the routing table.
    pub fn on_peer_disconnected(&self, peer: &Id) {
        self.routing_table.remove(peer)
    }

    /// Peers to query for `target`, closest first.
    pub fn closest_peers(&self, target: &Id, count: Option<usize>) -> Vec<Id> {
        self.routing_table.closest_peers(target, count)
    }

    /// Register a validator for records under `/namespace/..`.
    pub fn add_validator(&self, namespace: impl Into<String>, validator: impl Validator + 'static) {
        self.validator.add_validator(namespace, validator)
    }

    pub fn validate(&self, key: &str, value: &[u8]) -> Result<()> {
        self.validator.validate(key, value)
    }

    pub fn select(&self, key: &str, values: &[Bytes]) -> Result<usize> {
        self.validator.select(key, values)
    }

    /// Choose the record to return for a get-value lookup of `key`.
    pub fn resolve(&self, key: &str, candidates: &[Record]) -> Result<Record> {
        self.validator.resolve(key, candidates)
    }
}
