//! Production [`Environment`] using system time and the OS CSPRNG.

use vaultwire_core::Environment;

/// Production environment backed by `std::time::Instant`, the wall clock,
/// and `getrandom` (`§9`).
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Build a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    /// # Panics
    ///
    /// Panics if the system clock reads before the Unix epoch.
    #[allow(clippy::disallowed_methods, clippy::expect_used)]
    fn unix_timestamp(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("invariant: system clock is after the Unix epoch (1970-01-01)")
            .as_secs()
    }

    /// # Panics
    ///
    /// Panics if the OS RNG fails. A server that cannot mint client ids and
    /// session keys with cryptographic randomness should not keep running.
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - server cannot operate securely");
    }
}
