use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier, scoped to one run of the plugin.
///
/// Serialized as a plain integer. Ids are drawn from a monotonic counter,
/// so they never collide within a run and sort by creation order.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    /// Draws the next unused id.
    pub fn next() -> Self {
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Rebuilds an id from its serialized integer value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
