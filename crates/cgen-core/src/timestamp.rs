use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Logical modification time.
///
/// Every call to [`TimeStamp::now`] returns a value strictly greater than all
/// previously issued stamps, so two objects never share a stamp unless one
/// was cloned from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct TimeStamp(u64);

impl TimeStamp {
    /// Stamp that is older than anything issued by [`TimeStamp::now`].
    pub const NEVER: TimeStamp = TimeStamp(0);

    pub fn now() -> Self {
        Self(NEXT_STAMP.fetch_add(1, Ordering::Relaxed))
    }

    /// Replace this stamp with a fresh one.
    pub fn modified(&mut self) {
        *self = Self::now();
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamps_increase() {
        let a = TimeStamp::now();
        let b = TimeStamp::now();
        assert!(b > a);
        assert!(a > TimeStamp::NEVER);
    }

    #[test]
    fn test_modified_refreshes() {
        let mut stamp = TimeStamp::now();
        let before = stamp;
        stamp.modified();
        assert!(stamp > before);
    }
}
