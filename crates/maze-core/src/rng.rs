use rand::{Error, Rng, RngCore};
use std::sync::atomic::{AtomicU64, Ordering};

/// Random source shared by every carving and solving task.
///
/// The generator state is a single atomic word advanced with a CAS loop, so
/// concurrent draws never block each other. With one task the sequence is
/// fully determined by the seed; with several tasks the interleaving decides
/// who gets which draw.
pub struct SharedRng {
    state: AtomicU64,
}

impl SharedRng {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed.wrapping_add(1)),
        }
    }

    pub fn reseed(&self, seed: u64) {
        self.state.store(seed.wrapping_add(1), Ordering::Relaxed);
    }

    /// Uniform index in `0..bound`.
    pub fn below(&self, bound: usize) -> usize {
        let mut rng = self;
        rng.gen_range(0..bound)
    }

    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407)
    }

    fn draw(&self) -> u32 {
        // PCG-like output permutation over an LCG state
        let prev = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| Some(Self::step(s)))
            .unwrap_or_else(|s| s);
        let state = Self::step(prev);
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngCore for &SharedRng {
    fn next_u32(&mut self) -> u32 {
        self.draw()
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.draw()) << 32) | u64::from(self.draw())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.draw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Seed drawn from the operating system.
pub fn entropy_seed() -> u64 {
    let mut seed_bytes = [0u8; 8];
    getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
        // Fallback: use a static counter if getrandom fails
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
        seed_bytes = counter.to_le_bytes();
    });
    u64::from_le_bytes(seed_bytes)
}
