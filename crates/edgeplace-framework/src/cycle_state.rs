//! Per-cycle key/value store.
//!
//! Created empty at the start of a cycle and dropped at its end. Writing
//! takes `&mut self`, reading only `&self`: once the runner freezes the state
//! behind an `Arc` after PreFilter, nothing downstream can mutate it.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::status::{Code, Status};

type StateData = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct CycleState {
    entries: HashMap<&'static str, StateData>,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn write<T: Send + Sync + 'static>(&mut self, key: &'static str, value: T) {
        self.entries.insert(key, Arc::new(value));
    }

    /// Read the entry under `key` as a `T`.
    ///
    /// Fails if PreFilter never wrote the key or wrote a different type.
    pub fn read<T: Send + Sync + 'static>(&self, key: &'static str) -> Result<Arc<T>, Status> {
        let data = self.entries.get(key).cloned().ok_or_else(|| {
            Status::new(Code::Error, format!("error reading {key:?} from cycle state: not found"))
        })?;
        data.downcast::<T>().map_err(|_| {
            Status::new(
                Code::Error,
                format!(
                    "cycle state entry {key:?} is not a {}",
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleState")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
