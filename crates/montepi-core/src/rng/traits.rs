//! Trait for counter-based random number generators.

/// Counter-based generator addressed by `(seed, offset)`.
///
/// The offset counts 32-bit outputs from the start of the seed's stream, so two
/// generators built with offsets `a < b` produce non-overlapping sequences as
/// long as the first consumes at most `b - a` words.
///
/// # Design
///
/// Counter-based RNGs keep no large state arrays:
/// - State is just a counter and key
/// - Jumping ahead is O(1) arithmetic on the counter
/// - Same counter value always produces same output (reproducible)
pub trait CounterRng: Sized {
    /// Create a generator for `seed`, positioned `offset` words into the stream.
    fn with_offset(seed: u64, offset: u64) -> Self;

    /// Next raw 32-bit output.
    fn next_u32(&mut self) -> u32;

    /// Advance by `n` outputs without generating them.
    fn skip(&mut self, n: u64);

    /// Next uniform `f32` in [0, 1).
    fn next_f32(&mut self) -> f32 {
        // Upper 24 bits fill the f32 mantissa exactly, so 1.0 is unreachable.
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Next uniform 2D vector in [0, 1) x [0, 1), consuming two outputs.
    fn next_uniform2(&mut self) -> [f32; 2] {
        let x = self.next_f32();
        let y = self.next_f32();
        [x, y]
    }
}
