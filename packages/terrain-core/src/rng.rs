// Deterministic random stream. Integer-only mixing with 32-bit wraparound so
// the same seed produces the same sequence on every platform.

const GOLDEN_GAMMA: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Independent pseudo-random stream keyed by an explicit seed.
///
/// There is no global state: every consumer owns its own stream.
#[derive(Clone, Debug)]
pub struct SeededRandomStream {
    state: u32,
}

impl SeededRandomStream {
    pub fn new(seed: u32) -> Self {
        SeededRandomStream { state: seed }
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Uniform in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Uniform integer in `[min, max]`, both inclusive. Bounds are swapped if reversed.
    pub fn int_range(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi as i64 - lo as i64 + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i64;
        (lo as i64 + offset) as i32
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a slice; `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.int_range(0, items.len() as i32 - 1) as usize;
        items.get(idx)
    }
}

/// Default seed for callers that do not supply one: wall-clock milliseconds
/// mixed with per-process entropy.
pub fn entropy_seed() -> u32 {
    let (millis, ambient) = entropy_sources();
    let folded = (millis as u32) ^ ((millis >> 32) as u32) ^ ambient.rotate_left(16);
    SeededRandomStream::new(folded).next_u32()
}

#[cfg(target_arch = "wasm32")]
fn entropy_sources() -> (u64, u32) {
    let millis = js_sys::Date::now() as u64;
    let ambient = (js_sys::Math::random() * TWO_POW_32) as u32;
    (millis, ambient)
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_sources() -> (u64, u32) {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{SystemTime, UNIX_EPOCH};

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(millis);
    let ambient = hasher.finish();
    (millis, (ambient ^ (ambient >> 32)) as u32)
}
