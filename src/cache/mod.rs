use std::time::{Duration, Instant};

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Single-slot cache whose entry expires a fixed time after it was stored.
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<Entry<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn get(&mut self, now: Instant) -> Option<T> {
        if self.entry.as_ref()?.is_expired(now) {
            self.entry = None;
            return None;
        }
        self.entry.as_ref().map(|e| e.value.clone())
    }

    pub fn set(&mut self, value: T, now: Instant) {
        self.entry = Some(Entry {
            value,
            expires_at: now + self.ttl,
        });
    }

    pub fn clear(&mut self) -> bool {
        self.entry.take().is_some()
    }
}

/// Single-slot cache keyed by a snapshot generation number.
pub struct GenerationCache<T> {
    entry: Option<(u64, T)>,
}

impl<T: Clone> GenerationCache<T> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    pub fn get(&self, generation: u64) -> Option<T> {
        match &self.entry {
            Some((stored, value)) if *stored == generation => Some(value.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, generation: u64, value: T) {
        self.entry = Some((generation, value));
    }

    pub fn clear(&mut self) -> bool {
        self.entry.take().is_some()
    }
}

impl<T: Clone> Default for GenerationCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
