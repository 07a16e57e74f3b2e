//! The decoded dependency manifest submitted by a client.

/// Named descriptor texts for one install request.
///
/// Both wire encodings (multipart form and JSON body) normalize into this
/// value, so everything downstream of decoding is content-type-agnostic.
/// A manifest is immutable once built and never outlives its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    primary: String,
    lock: Option<String>,
}

impl Manifest {
    /// Build a manifest from raw descriptor texts.
    ///
    /// Returns `None` when the primary descriptor is empty. An empty lock
    /// descriptor is normalized to absent, so it cannot silently flip the
    /// install into reproducible mode.
    #[must_use]
    pub fn new(primary: String, lock: Option<String>) -> Option<Self> {
        if primary.is_empty() {
            return None;
        }
        let lock = lock.filter(|l| !l.is_empty());
        Some(Self { primary, lock })
    }

    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    #[must_use]
    pub fn lock(&self) -> Option<&str> {
        self.lock.as_deref()
    }

    /// Whether a lock descriptor is present, selecting the reproducible
    /// install mode over the resolving one.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }
}
