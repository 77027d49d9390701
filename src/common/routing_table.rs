//! Simplified Kademlia routing table

use std::collections::BinaryHeap;
use std::slice::Iter;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::common::{Distance, Id};

/// K = the default maximum size of a k-bucket.
pub const MAX_BUCKET_SIZE_K: usize = 20;

#[derive(Debug, Clone)]
/// Simplified Kademlia routing table
///
/// A single flat k-bucket: a duplicate free set of at most `k` peers,
/// never containing the local [Id]. Once full, new peers are rejected until
/// a member is removed.
pub struct RoutingTable {
    id: Id,
    k: usize,
    /// Peers in insertion order.
    peers: Vec<Id>,
}

impl RoutingTable {
    /// Create a new [RoutingTable] with a given id and a capacity of [MAX_BUCKET_SIZE_K].
    pub fn new(id: Id) -> Self {
        Self::with_bucket_size(id, MAX_BUCKET_SIZE_K)
    }

    /// Create a new [RoutingTable] holding at most `k` peers.
    pub fn with_bucket_size(id: Id, k: usize) -> Self {
        RoutingTable {
            id,
            k,
            peers: Vec::with_capacity(k.min(MAX_BUCKET_SIZE_K)),
        }
    }

    /// Returns the [Id] of this node, where the distance is measured from.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Returns the maximum number of peers this table holds.
    pub fn bucket_size(&self) -> usize {
        self.k
    }

    // === Public Methods ===

    /// Attempts to add a peer to this routing table, and return `true` if it did.
    ///
    /// Adding self, a peer that already exists, or any peer while the table
    /// is full, is a no-op.
    pub fn add(&mut self, peer: Id) -> bool {
        if peer == self.id {
            // Do not add self to the routing_table
            return false;
        }

        if self.contains(&peer) {
            return false;
        }

        if self.peers.len() >= self.k {
            debug!(?peer, size = self.peers.len(), "Routing table full, rejecting peer");
            return false;
        }

        trace!(?peer, "Added peer to routing table");
        self.peers.push(peer);

        true
    }

    /// Remove a peer from this routing table, if it exists.
    pub fn remove(&mut self, peer: &Id) {
        self.peers.retain(|p| p != peer);
    }

    /// Returns the stored [Id] if `peer` is a member of this table.
    pub fn find(&self, peer: &Id) -> Option<Id> {
        self.peers.iter().find(|p| *p == peer).copied()
    }

    pub fn contains(&self, peer: &Id) -> bool {
        self.peers.contains(peer)
    }

    /// Return up to `count` peers closest to the `target`, sorted by ascending XOR distance.
    ///
    /// Defaults to [Self::bucket_size] peers if `count` is `None`.
    pub fn closest_peers(&self, target: &Id, count: Option<usize>) -> Vec<Id> {
        let mut closest = ClosestPeers::new(*target, count.unwrap_or(self.k));

        for peer in &self.peers {
            closest.add(*peer);
        }

        closest.into_sorted_vec()
    }

    /// Returns `true` if this routing table is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Return the number of peers in this routing table.
    pub fn size(&self) -> usize {
        self.peers.len()
    }

    /// Returns an iterator over the peers in this routing table.
    pub fn iter(&self) -> Iter<'_, Id> {
        self.peers.iter()
    }

    /// Export an owned snapshot of the peers in this routing table.
    pub fn all_peers(&self) -> Vec<Id> {
        self.peers.clone()
    }
}

/// Bounded selection of the `count` peers closest to a target.
///
/// Keeps a max-heap of at most `count` entries, so selecting from `n` peers
/// costs `O(n log count)`. Equal distances are ordered by [Id].
#[derive(Debug, Clone)]
pub struct ClosestPeers {
    target: Id,
    count: usize,
    heap: BinaryHeap<(Distance, Id)>,
}

impl ClosestPeers {
    pub fn new(target: Id, count: usize) -> Self {
        Self {
            target,
            count,
            heap: BinaryHeap::with_capacity(count.min(MAX_BUCKET_SIZE_K) + 1),
        }
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn add(&mut self, peer: Id) {
        if self.count == 0 {
            return;
        }

        let entry = (peer.xor(&self.target), peer);

        if self.heap.len() < self.count {
            self.heap.push(entry);
        } else if let Some(furthest) = self.heap.peek() {
            if entry < *furthest {
                self.heap.pop();
                self.heap.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consume the selection, returning peers sorted by ascending distance.
    pub fn into_sorted_vec(self) -> Vec<Id> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|(_, peer)| peer)
            .collect()
    }
}

#[derive(Debug, Clone)]
/// A [RoutingTable] shared between tasks.
///
/// Mutations take an exclusive write lock, reads share a read lock and
/// return owned snapshots.
pub struct SharedRoutingTable(Arc<RwLock<RoutingTable>>);

impl SharedRoutingTable {
    pub fn new(table: RoutingTable) -> Self {
        Self(Arc::new(RwLock::new(table)))
    }

    pub fn id(&self) -> Id {
        *self.0.read().id()
    }

    pub fn add(&self, peer: Id) -> bool {
        self.0.write().add(peer)
    }

    pub fn remove(&self, peer: &Id) {
        self.0.write().remove(peer)
    }

    pub fn find(&self, peer: &Id) -> Option<Id> {
        self.0.read().find(peer)
    }

    pub fn closest_peers(&self, target: &Id, count: Option<usize>) -> Vec<Id> {
        self.0.read().closest_peers(target, count)
    }

    pub fn size(&self) -> usize {
        self.0.read().size()
    }

    pub fn all_peers(&self) -> Vec<Id> {
        self.0.read().all_peers()
    }
}
