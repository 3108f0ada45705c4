// crates/spell_core/src/consts.rs

use core::mem::size_of;

pub const MAGIC_CCBF: &[u8;4] = b"CCBF";

/// One byte per bit position (0x00 / 0x01).
pub const VERSION_UNPACKED: u16 = 1;
/// Eight bit positions per byte, LSB first.
pub const VERSION_PACKED: u16 = 2;

/// magic[4] + version[2] + k[2] + m[4]
pub const HDR_SIZE: usize = 12;

pub const MIN_NUM_BITS: u64 = 1;
pub const MAX_NUM_BITS: u64 = u32::MAX as u64;
pub const MIN_NUM_HASHES: u64 = 1;
pub const MAX_NUM_HASHES: u64 = u16::MAX as u64;

pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

const _: () = { assert!(size_of::<[u8;4]>() + size_of::<u16>() * 2 + size_of::<u32>() == HDR_SIZE); };
