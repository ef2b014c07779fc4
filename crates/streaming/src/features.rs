use std::collections::HashMap;

/// Which feature ids were seen on which tile (`tile id -> feature ids`).
///
/// Bookkeeping only: the synchroniser records into it but never reads it back.
#[derive(Debug, Clone, Default)]
pub struct FeaturesMap {
    features: HashMap<String, Vec<String>>,
}

impl FeaturesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `feature_id` was already recorded for `tile_id`.
    pub fn add(&mut self, tile_id: &str, feature_id: &str) -> bool {
        let ids = self.features.entry(tile_id.to_string()).or_default();
        if ids.iter().any(|id| id == feature_id) {
            return false;
        }
        ids.push(feature_id.to_string());
        true
    }

    pub fn get(&self, tile_id: &str) -> Option<&[String]> {
        self.features.get(tile_id).map(Vec::as_slice)
    }

    pub fn remove(&mut self, tile_id: &str) -> Option<Vec<String>> {
        self.features.remove(tile_id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
