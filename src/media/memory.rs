use std::collections::HashMap;

use uuid::Uuid;

use super::{MediaStore, ResourceHandle};
use crate::error::Result;

/// In-memory store that keeps counters of what was created and released
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    live: HashMap<Uuid, Vec<u8>>,
    materialized: usize,
    released: usize,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn materialized_count(&self) -> usize {
        self.materialized
    }

    pub fn released_count(&self) -> usize {
        self.released
    }

    pub fn bytes(&self, handle: &ResourceHandle) -> Option<&[u8]> {
        self.live.get(&handle.id()).map(Vec::as_slice)
    }
}

impl MediaStore for MemoryMediaStore {
    fn materialize(&mut self, name: &str, bytes: &[u8]) -> Result<ResourceHandle> {
        let id = Uuid::new_v4();
        self.live.insert(id, bytes.to_vec());
        self.materialized += 1;
        Ok(ResourceHandle::new(id, name, format!("memory:{}", id)))
    }

    fn release(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle.id()).is_some() {
            self.released += 1;
        }
    }
}
