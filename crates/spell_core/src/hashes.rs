//! The hash family: a fixed, ordered list of `&[u8] -> u64` functions.
//!
//! Index 0..5 are the base functions (FNV-1, FNV-1a, two FNV-1a variants,
//! djb2). Index `5 + i` is MurmurHash3 x64/128 seeded with `i`. Bit positions
//! written at build time must match the ones computed at query time, so the
//! order here is part of the on-disk contract.

use std::io::Cursor;

pub const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
pub const FNV_PRIME: u64 = 1099511628211;
pub const DJB2_SEED: u64 = 5381;

#[inline]
pub fn fnv1(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |h, &b| h.wrapping_mul(FNV_PRIME) ^ b as u64)
}

#[inline]
pub fn fnv1a(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |h, &b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
}

/// FNV-1a xor step followed by a shift-add mix.
#[inline]
pub fn fnv1a_variant_a(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        let h = h ^ b as u64;
        (h << 1)
            .wrapping_add(h << 4)
            .wrapping_add(h << 7)
            .wrapping_add(h << 8)
            .wrapping_add(h << 24)
    })
}

/// FNV-1a xor step followed by a shift-xor mix.
#[inline]
pub fn fnv1a_variant_b(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        let h = h ^ b as u64;
        (h << 1) ^ (h >> 3) ^ h.wrapping_mul(FNV_PRIME)
    })
}

#[inline]
pub fn djb2(data: &[u8]) -> u64 {
    data.iter()
        .fold(DJB2_SEED, |h, &b| (h << 5).wrapping_add(h).wrapping_add(b as u64)) // h * 33 + b
}

/// First 64-bit half (`h1`) of MurmurHash3 x64/128.
#[inline]
pub fn murmur3_64(data: &[u8], seed: u32) -> u64 {
    // reading from an in-memory cursor cannot fail
    murmur3::murmur3_x64_128(&mut Cursor::new(data), seed).unwrap_or(0) as u64
}

/// One member of the hash family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Fnv1,
    Fnv1a,
    Fnv1aVariantA,
    Fnv1aVariantB,
    Djb2,
    Murmur3 { seed: u32 },
}

pub const BASE_FUNCTIONS: [HashFunction; 5] = [
    HashFunction::Fnv1,
    HashFunction::Fnv1a,
    HashFunction::Fnv1aVariantA,
    HashFunction::Fnv1aVariantB,
    HashFunction::Djb2,
];

impl HashFunction {
    #[inline]
    pub fn hash(&self, data: &[u8]) -> u64 {
        match *self {
            HashFunction::Fnv1 => fnv1(data),
            HashFunction::Fnv1a => fnv1a(data),
            HashFunction::Fnv1aVariantA => fnv1a_variant_a(data),
            HashFunction::Fnv1aVariantB => fnv1a_variant_b(data),
            HashFunction::Djb2 => djb2(data),
            HashFunction::Murmur3 { seed } => murmur3_64(data, seed),
        }
    }
}

/// The first `k` functions of the family, in family order.
///
/// Past the five base functions, murmur functions are synthesized with seeds
/// 0, 1, 2, ... so every call with the same `k` yields the same list.
pub fn hash_functions(k: u64) -> Vec<HashFunction> {
    let k = usize::try_from(k).unwrap_or(usize::MAX);
    BASE_FUNCTIONS
        .iter()
        .copied()
        .chain((0..=u32::MAX).map(|seed| HashFunction::Murmur3 { seed }))
        .take(k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_the_seed() {
        assert_eq!(fnv1(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a_variant_a(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a_variant_b(b""), FNV_OFFSET_BASIS);
        assert_eq!(djb2(b""), DJB2_SEED);
    }

    #[test]
    fn fnv_reference_values() {
        // published 64-bit FNV test vectors
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1(b"a"), 0xaf63bd4c8601b7be);
        assert_eq!(fnv1a(b"foobar"), 0x85944171f73967e8);
        assert_eq!(fnv1(b"foobar"), 0x340d8765a4dda9c2);
    }

    #[test]
    fn single_byte_mixes() {
        let x = FNV_OFFSET_BASIS ^ b'a' as u64;
        let a = (x << 1)
            .wrapping_add(x << 4)
            .wrapping_add(x << 7)
            .wrapping_add(x << 8)
            .wrapping_add(x << 24);
        assert_eq!(fnv1a_variant_a(b"a"), a);
        let b = (x << 1) ^ (x >> 3) ^ x.wrapping_mul(FNV_PRIME);
        assert_eq!(fnv1a_variant_b(b"a"), b);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
        assert_eq!(djb2(b"ab"), (5381 * 33 + 97) * 33 + 98);
    }

    #[test]
    fn murmur_reference_value() {
        let key = b"The quick brown fox jumps over the lazy dog";
        assert_eq!(murmur3_64(key, 0), 0xe34bbc7bbc071b6c);
    }

    #[test]
    fn family_order_and_len() {
        assert!(hash_functions(0).is_empty());
        assert_eq!(hash_functions(3), BASE_FUNCTIONS[..3].to_vec());
        let fns = hash_functions(8);
        assert_eq!(fns.len(), 8);
        assert_eq!(&fns[..5], &BASE_FUNCTIONS[..]);
        assert_eq!(fns[5], HashFunction::Murmur3 { seed: 0 });
        assert_eq!(fns[7], HashFunction::Murmur3 { seed: 2 });
    }

    #[test]
    fn family_is_deterministic() {
        let a = hash_functions(12);
        let b = hash_functions(12);
        for word in ["hello", "world", "", "zebra"] {
            let ha: Vec<u64> = a.iter().map(|f| f.hash(word.as_bytes())).collect();
            let hb: Vec<u64> = b.iter().map(|f| f.hash(word.as_bytes())).collect();
            assert_eq!(ha, hb);
        }
    }

    #[test]
    fn synthesized_functions_are_distinct() {
        let fns = hash_functions(10);
        let outs: Vec<u64> = fns[5..].iter().map(|f| f.hash(b"hello")).collect();
        let mut dedup = outs.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), outs.len());
    }
}
