//! Bloom filter over the fixed hash family, sized from a target false-positive rate.
use crate::consts::{MAX_NUM_BITS, MAX_NUM_HASHES, MIN_NUM_BITS, MIN_NUM_HASHES};
use crate::errors::{Result, SpellError};
use crate::hashes::{hash_functions, HashFunction};
use std::f64::consts::LN_2;
use std::sync::{Arc, RwLock};

/// Shared handle for callers that query from several threads.
/// `add` needs the write lock; `check` only the read lock.
pub type FilterHandle = Arc<RwLock<BloomFilter>>;

/// Bit count and hash count derived from an expected element count and target rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plan {
    pub m: u64,
    pub k: u64,
    pub n: u64,
}

/// Optimal parameters for `n` elements at false-positive rate `p`.
///
/// `m = ceil(-n * ln(p) / ln(2)^2)`, `k = ceil(m / n * ln(2))`. Both steps round
/// up so a rebuilt dictionary gets the same geometry every time.
pub fn plan(n: u64, p: f64) -> Result<Plan> {
    if n == 0 {
        return Err(SpellError::invalid("expected element count must be at least 1"));
    }
    if !(p > 0.0 && p < 1.0) {
        return Err(SpellError::invalid(format!("false positive rate {p} is outside (0, 1)")));
    }
    let nf = n as f64;
    let size = (-nf * (p.ln() / (LN_2 * LN_2))).ceil();
    if !size.is_finite() || size < 1.0 {
        return Err(SpellError::invalid(format!("cannot size a filter for n={n}, p={p}")));
    }
    let k = ((size / nf) * LN_2).ceil();
    if !k.is_finite() || k < 1.0 {
        return Err(SpellError::invalid(format!("cannot derive a hash count for n={n}, p={p}")));
    }
    let out = Plan { m: size as u64, k: k as u64, n };
    tracing::debug!(n, p, m = out.m, k = out.k, "planned filter");
    Ok(out)
}

#[derive(Clone, Debug)]
pub struct BloomFilter {
    bits: Vec<bool>,
    k: u64,
    m: u64,
    n: u64,
    hash_functions: Vec<HashFunction>,
}

impl PartialEq for BloomFilter {
    // `n` is metadata and is not persisted, so it does not take part in equality.
    fn eq(&self, other: &Self) -> bool {
        self.k == other.k && self.m == other.m && self.bits == other.bits
    }
}

impl Eq for BloomFilter {}

impl BloomFilter {
    /// Empty filter with `m` bits and the first `k` functions of the hash family.
    pub fn new(k: u64, m: u64, n: u64) -> Result<Self> {
        check_geometry(k, m).map_err(SpellError::invalid)?;
        Ok(Self::with_bits(k, vec![false; m as usize], n))
    }

    pub fn from_plan(plan: &Plan) -> Result<Self> {
        Self::new(plan.k, plan.m, plan.n)
    }

    /// Plan and construct in one step.
    pub fn with_accuracy(n: u64, p: f64) -> Result<Self> {
        Self::from_plan(&plan(n, p)?)
    }

    /// Geometry must already be validated; `m` is `bits.len()`.
    pub(crate) fn with_bits(k: u64, bits: Vec<bool>, n: u64) -> Self {
        let m = bits.len() as u64;
        tracing::debug!(k, m, n, "new bloom filter");
        Self { bits, k, m, n, hash_functions: hash_functions(k) }
    }

    #[inline]
    fn positions<'a>(&'a self, item: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
        let m = self.m;
        self.hash_functions.iter().map(move |f| (f.hash(item) % m) as usize)
    }

    pub fn add(&mut self, item: impl AsRef<[u8]>) {
        let item = item.as_ref();
        let m = self.m;
        for f in &self.hash_functions {
            self.bits[(f.hash(item) % m) as usize] = true;
        }
    }

    /// `false` means definitely absent; `true` means possibly present.
    pub fn check(&self, item: impl AsRef<[u8]>) -> bool {
        let item = item.as_ref();
        self.positions(item).all(|idx| self.bits[idx])
    }

    pub fn m(&self) -> u64 { self.m }
    pub fn k(&self) -> u64 { self.k }
    /// Expected element count given at construction; 0 after a reload.
    pub fn n(&self) -> u64 { self.n }
    pub fn bits(&self) -> &[bool] { &self.bits }
    pub fn hash_functions(&self) -> &[HashFunction] { &self.hash_functions }

    pub fn bits_set(&self) -> u64 {
        self.bits.iter().filter(|b| **b).count() as u64
    }

    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.m as f64
    }

    /// False-positive probability implied by the current fill: `fill_ratio ^ k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.fill_ratio().powf(self.k as f64)
    }

    pub fn into_handle(self) -> FilterHandle {
        Arc::new(RwLock::new(self))
    }
}

/// Shared by construction and decoding, which map the message to different error kinds.
pub(crate) fn check_geometry(k: u64, m: u64) -> std::result::Result<(), String> {
    if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&k) {
        return Err(format!("k={k} must be in {MIN_NUM_HASHES}..={MAX_NUM_HASHES}"));
    }
    if !(MIN_NUM_BITS..=MAX_NUM_BITS).contains(&m) {
        return Err(format!("m={m} must be in {MIN_NUM_BITS}..={MAX_NUM_BITS}"));
    }
    Ok(())
}
