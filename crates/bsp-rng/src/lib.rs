//! Multiply-with-carry random number generator
//!
//! A small two-lane MWC generator (Marsaglia) driven by a 32-bit seed. The
//! arithmetic is carried out on signed 32-bit lanes with arithmetic shifts;
//! output words are signed and offset by one half to land in [0, 1).
//!
//! Every randomized decision of the generator flows through [`Mwc::next`];
//! layouts are reproducible from the seed alone, provided callers consume
//! draws in the same order.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Initial value of the `z` lane.
const Z_INIT: i32 = 987_654_321;

/// Multiplier of the `z` lane.
const Z_MUL: i64 = 36969;

/// Multiplier of the `w` lane.
const W_MUL: i64 = 18000;

/// 2^32, the divisor mapping an output word onto [-0.5, 0.5).
const WORD_RANGE: f64 = 4_294_967_296.0;

/// Largest stream position a serialized generator may be restored to.
///
/// Restoring replays every draw, so the cost is linear in the position.
pub const MAX_REPLAY_CALLS: u64 = 1 << 28;

/// One recorded draw, for diagnosing call-order divergences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Sequence number (0-indexed)
    pub seq: u64,
    /// Raw output word
    pub raw: i32,
    /// Float handed to the caller
    pub value: f64,
}

/// Serialized form: the seed plus how far the stream has advanced.
#[derive(Serialize, Deserialize)]
struct MwcState {
    seed: u32,
    calls: u64,
}

/// Seeded multiply-with-carry generator
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "MwcState", into = "MwcState")]
pub struct Mwc {
    w: i32,
    z: i32,
    seed: u32,
    call_count: u64,
    tracing: bool,
    trace: Vec<TraceEntry>,
}

impl core::fmt::Debug for Mwc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mwc")
            .field("seed", &self.seed)
            .field("w", &self.w)
            .field("z", &self.z)
            .field("call_count", &self.call_count)
            .finish()
    }
}

impl Mwc {
    /// Create a generator from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self {
            // Bit-for-bit reinterpretation; seeds above i32::MAX wrap.
            w: seed as i32,
            z: Z_INIT,
            seed,
            call_count: 0,
            tracing: false,
            trace: Vec::new(),
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of words drawn so far
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Advance both lanes and return the next output word.
    fn step(&mut self) -> i32 {
        self.z = (Z_MUL * i64::from(self.z & 0xFFFF) + i64::from(self.z >> 16)) as i32;
        self.w = (W_MUL * i64::from(self.w & 0xFFFF) + i64::from(self.w >> 16)) as i32;
        self.call_count += 1;
        (i64::from(self.z.wrapping_shl(16)) + i64::from(self.w)) as i32
    }

    /// Uniform float in [0, 1).
    pub fn next(&mut self) -> f64 {
        let raw = self.step();
        let value = f64::from(raw) / WORD_RANGE + 0.5;
        if self.tracing {
            self.trace.push(TraceEntry {
                seq: self.call_count - 1,
                raw,
                value,
            });
        }
        value
    }

    /// Integer in `[min, max]`, computed as `floor(next() * (max - min + 1)) + min`.
    ///
    /// Consumes exactly one draw. When `max < min` the result falls at or
    /// below `min`; callers are expected to pass an ordered range.
    pub fn int_between(&mut self, min: i32, max: i32) -> i32 {
        let span = f64::from(max) - f64::from(min) + 1.0;
        (self.next() * span).floor() as i32 + min
    }

    /// `next() * n` truncated toward zero.
    ///
    /// For `n > 0` this lies in `[0, n)`; for `n <= 0` it lies in `(n, 0]`.
    pub fn scaled(&mut self, n: i32) -> i32 {
        (self.next() * f64::from(n)) as i32
    }

    /// Bernoulli trial: true when the draw falls below `p`.
    ///
    /// Always consumes one draw, whatever `p` is.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Start recording every draw
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
        self.trace.clear();
    }

    /// Stop recording draws; the recorded trace is kept
    pub fn disable_tracing(&mut self) {
        self.tracing = false;
    }

    /// Draws recorded since tracing was enabled
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }
}

impl TryFrom<MwcState> for Mwc {
    type Error = String;

    /// Replays `calls` draws from `seed`; refuses positions past
    /// [`MAX_REPLAY_CALLS`].
    fn try_from(state: MwcState) -> Result<Self, Self::Error> {
        if state.calls > MAX_REPLAY_CALLS {
            return Err(format!(
                "stream position {} exceeds the replay limit of {MAX_REPLAY_CALLS} draws",
                state.calls
            ));
        }
        let mut rng = Mwc::new(state.seed);
        for _ in 0..state.calls {
            rng.step();
        }
        Ok(rng)
    }
}

impl From<Mwc> for MwcState {
    fn from(rng: Mwc) -> Self {
        MwcState {
            seed: rng.seed,
            calls: rng.call_count,
        }
    }
}

impl Default for Mwc {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngCore for Mwc {
    fn next_u32(&mut self) -> u32 {
        self.step() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mwc {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
