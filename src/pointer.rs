use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Both coordinates set to NaN with all mantissa bits on; never produced by `pack`
/// because `store` rejects non-finite input.
const UNSET: u64 = u64::MAX;

/// Last known pointer position, shared between the input handler and the frame loop.
///
/// Both coordinates live in a single `AtomicU64` so a reader never sees an x from one
/// event paired with a y from another.
#[derive(Debug, Clone)]
pub struct SharedPointer {
    bits: Arc<AtomicU64>,
}

impl Default for SharedPointer {
    fn default() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(UNSET)),
        }
    }
}

impl SharedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new position. Non-finite coordinates clear the pointer instead.
    pub fn store(&self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.bits.store(pack(x, y), Ordering::Release);
        } else {
            self.clear();
        }
    }

    /// Forget the position (pointer left the window)
    pub fn clear(&self) {
        self.bits.store(UNSET, Ordering::Release);
    }

    pub fn load(&self) -> Option<(f32, f32)> {
        match self.bits.load(Ordering::Acquire) {
            UNSET => None,
            bits => Some(unpack(bits)),
        }
    }
}

fn pack(x: f32, y: f32) -> u64 {
    ((x.to_bits() as u64) << 32) | y.to_bits() as u64
}

fn unpack(bits: u64) -> (f32, f32) {
    (f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}
