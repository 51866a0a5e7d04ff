use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Constant fourth byte of every plotted pixel.
pub const ALPHA: u8 = 0xBF;

/// Color used for every pixel plotted during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorSample {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Draw each channel uniformly from `[0, 0xFF)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            red: rng.random_range(0..0xFF),
            green: rng.random_range(0..0xFF),
            blue: rng.random_range(0..0xFF),
        }
    }

    /// Reproducible sample for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::random(&mut StdRng::seed_from_u64(seed))
    }

    /// Pixel bytes in output order: blue, green, red, alpha.
    pub fn to_bgra(self) -> [u8; 4] {
        [self.blue, self.green, self.red, ALPHA]
    }

    /// The BGRA bytes packed little-endian into one word.
    pub fn packed(self) -> u32 {
        u32::from_le_bytes(self.to_bgra())
    }
}
