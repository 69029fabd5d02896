//! Environment abstraction for deterministic testing (`§9`).
//!
//! Decouples handler logic from system time, randomness, and client-id
//! generation so repository and handler tests can run against a seeded,
//! reproducible environment instead of the real clock and OS RNG. Unlike
//! connection-oriented protocols, the dispatcher here is a synchronous,
//! single-threaded reactor (`§4.4`), so this trait carries no `sleep`.

/// Abstract environment providing time, randomness, and client-id
/// generation.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards within a single process.
/// - `random_bytes()` uses cryptographically secure entropy in production.
/// - Every method is infallible except in exceptional circumstances (OS
///   entropy exhaustion, a clock before the Unix epoch).
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`; a test environment may use a
    /// cell-backed fake clock instead.
    type Instant: Copy + Ord + Send + Sync;

    /// Current monotonic time, used to measure elapsed durations.
    fn now(&self) -> Self::Instant;

    /// Seconds since the Unix epoch, used for `last_seen` timestamps (`§3`).
    fn unix_timestamp(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same RNG seed, this produces the same sequence of bytes.
    /// - Uses cryptographically secure RNG in production.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a fresh 16-byte client identifier.
    ///
    /// The wire format treats a client id as sixteen opaque bytes (`§3`,
    /// `§6.1`); this just needs enough entropy that two clients never
    /// collide, so the default draws straight from [`Environment::random_bytes`].
    fn random_client_id(&self) -> [u8; 16] {
        let mut id = [0u8; 16];
        self.random_bytes(&mut id);
        id
    }
}
