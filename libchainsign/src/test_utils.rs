use rand_core::{CryptoRng, RngCore};

/// A RNG that fills every requested byte with the same value.
///
/// Lets tests predict the identity a device will be given.
pub struct ConstRng(pub u8);

// :)
impl CryptoRng for ConstRng {}

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_ne_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_ne_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
