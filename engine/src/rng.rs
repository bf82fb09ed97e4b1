use rand::RngCore;

/// 32-bit FNV-1a hash of a string's bytes.
pub fn fnv1a(text: &str) -> u32 {
    text.bytes().fold(0x811c_9dc5_u32, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(16_777_619)
    })
}

/// Mulberry32: a small deterministic 32-bit generator.
///
/// The same seed always yields the same sequence on every platform, which
/// is what keeps daily puzzles shareable.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seeded from the FNV-1a hash of `salt`.
    pub fn from_salt(salt: &str) -> Self {
        Self::new(fnv1a(salt))
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
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

/// Uniform float in `[0, 1)` from the next 32 random bits.
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / 4_294_967_296.0
}

/// Uniform index in `0..len`; `len` must be non-zero.
pub fn index_below<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> usize {
    ((unit(rng) * len as f64) as usize).min(len.saturating_sub(1))
}
