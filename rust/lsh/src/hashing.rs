//! Seeded hash family for MinHash and band bucketing.
//!
//! MinHash functions are universal hashes \(h(x) = ((a x + b) \bmod P) \wedge (2^{32}-1)\)
//! over the Mersenne prime \(P = 2^{61} - 1\). The product is formed in 128-bit
//! arithmetic so it never wraps.
//!
//! Band hashing maps an `r`-row signature slice to a bucket in `[0, K)` via a
//! dot product with a per-band coefficient vector.
//!
//! Every coefficient is drawn once, at construction, from a ChaCha8 stream
//! seeded with the caller's seed: the same seed always yields the same family.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{validate_hashing, LshParams};
use crate::error::{Error, Result};

/// Mersenne prime 2^61 - 1
pub const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// Largest value a MinHash entry can take; also the "no shingle seen" value.
pub const MAX_HASH: u32 = u32::MAX;

/// MinHash functions plus band-hashing coefficients derived from one seed.
#[derive(Debug, Clone)]
pub struct HashFamily {
    /// Multipliers, one per hash function, in [1, P)
    a: Vec<u64>,
    /// Offsets, one per hash function, in [0, P)
    b: Vec<u64>,
    /// Band coefficients, `n_bands × rows_per_band`, row-major, in [1, K)
    band_coeffs: Vec<u64>,
    n_bands: usize,
    rows_per_band: usize,
    buckets: u64,
    seed: u64,
}

impl HashFamily {
    /// Build a family of `n_hash` functions split into `n_bands` bands of
    /// `K = buckets` buckets each.
    ///
    /// Fails with [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    /// `n_hash` is not a multiple of `n_bands` or any size is zero.
    pub fn new(n_hash: usize, n_bands: usize, buckets: u64, seed: u64) -> Result<Self> {
        validate_hashing(n_hash, n_bands, buckets)?;
        let rows_per_band = n_hash / n_bands;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let a: Vec<u64> = (0..n_hash).map(|_| rng.gen_range(1..MERSENNE_PRIME)).collect();
        let b: Vec<u64> = (0..n_hash).map(|_| rng.gen_range(0..MERSENNE_PRIME)).collect();
        // With K == 1 every bucket is 0 regardless; keep the range non-empty.
        let coeff_upper = buckets.max(2);
        let band_coeffs: Vec<u64> = (0..n_hash).map(|_| rng.gen_range(1..coeff_upper)).collect();

        Ok(Self {
            a,
            b,
            band_coeffs,
            n_bands,
            rows_per_band,
            buckets,
            seed,
        })
    }

    pub fn from_params(params: &LshParams) -> Result<Self> {
        Self::new(params.n_hash, params.n_bands, params.buckets, params.seed)
    }

    /// Number of MinHash functions.
    pub fn n_hash(&self) -> usize {
        self.a.len()
    }

    pub fn n_bands(&self) -> usize {
        self.n_bands
    }

    pub fn rows_per_band(&self) -> usize {
        self.rows_per_band
    }

    /// Bucket count `K`.
    pub fn buckets(&self) -> u64 {
        self.buckets
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Apply hash function `h` to a shingle index.
    #[inline]
    pub fn hash_one(&self, h: usize, index: u64) -> u32 {
        let v = (self.a[h] as u128 * index as u128 + self.b[h] as u128) % MERSENNE_PRIME as u128;
        (v as u64 & MAX_HASH as u64) as u32
    }

    /// Apply every hash function to a shingle index.
    pub fn hash_shingle_index(&self, index: u64) -> Vec<u32> {
        (0..self.n_hash()).map(|h| self.hash_one(h, index)).collect()
    }

    /// Bucket of an `r`-length signature slice in band `band`.
    ///
    /// Fails if `band >= n_bands` or the slice does not have `rows_per_band`
    /// entries.
    pub fn hash_band_signature(&self, band: usize, signature_slice: &[u32]) -> Result<u64> {
        if band >= self.n_bands {
            return Err(Error::BandOutOfRange {
                band,
                n_bands: self.n_bands,
            });
        }
        if signature_slice.len() != self.rows_per_band {
            return Err(Error::BandSliceLength {
                expected: self.rows_per_band,
                actual: signature_slice.len(),
            });
        }
        Ok(self.band_bucket(band, signature_slice))
    }

    /// Unchecked bucket computation for callers that slice the signature
    /// matrix themselves.
    pub(crate) fn band_bucket(&self, band: usize, signature_slice: &[u32]) -> u64 {
        let start = band * self.rows_per_band;
        let coeffs = &self.band_coeffs[start..start + self.rows_per_band];
        let k = self.buckets as u128;
        let dot = coeffs
            .iter()
            .zip(signature_slice)
            .fold(0u128, |acc, (&c, &s)| (acc + c as u128 * s as u128) % k);
        dot as u64
    }
}
