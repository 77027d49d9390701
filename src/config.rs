use crate::common::MAX_BUCKET_SIZE_K;

#[derive(Debug, Clone)]
/// Dht Configurations
pub struct Config {
    /// Maximum number of peers in the routing table, and the default number
    /// of peers returned by [crate::Dht::closest_peers].
    ///
    /// Defaults to [MAX_BUCKET_SIZE_K]
    pub bucket_size: usize,
    /// Whether `/pk/<peer id>` records must hold the very public key the
    /// peer id was derived from, see [crate::PublicKeyValidator::with_linkage].
    ///
    /// Defaults to false, where only the structure of the key and value is checked.
    pub verify_public_key_linkage: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_size: MAX_BUCKET_SIZE_K,
            verify_public_key_linkage: false,
        }
    }
}
