//! CCBF container IO.
//!
//! Header (BE, 12 bytes):
//!   magic[4]   = "CCBF"
//!   version[2] = 1 (unpacked) | 2 (packed)
//!   k[2]       = number of hash functions
//!   m[4]       = number of bits
//!
//! Bit section:
//!   v1: m bytes, each 0x00 or 0x01
//!   v2: ceil(m/8) bytes, bit i at byte i/8 mask 1 << (i%8), unused tail bits zero
//!
//! The file ends right after the bit section; trailing bytes are rejected.
//! `n` is not stored, so a reloaded filter reports n = 0.

use crate::consts::{HDR_SIZE, MAGIC_CCBF, VERSION_PACKED, VERSION_UNPACKED};
use crate::errors::{Result, SpellError};
use crate::filter::{check_geometry, BloomFilter};
use crate::utils::{read_u16_be, read_u32_be, write_u16_be, write_u32_be};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Layout of the bit section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Version 1: one byte per bit.
    #[default]
    Unpacked,
    /// Version 2: eight bits per byte.
    Packed,
}

impl Encoding {
    pub fn version(self) -> u16 {
        match self {
            Encoding::Unpacked => VERSION_UNPACKED,
            Encoding::Packed => VERSION_PACKED,
        }
    }

    pub fn from_version(version: u16) -> Result<Self> {
        match version {
            VERSION_UNPACKED => Ok(Encoding::Unpacked),
            VERSION_PACKED => Ok(Encoding::Packed),
            v => Err(SpellError::UnsupportedVersion(v)),
        }
    }

    /// Size of the bit section for `m` bits.
    pub fn body_len(self, m: u64) -> u64 {
        match self {
            Encoding::Unpacked => m,
            Encoding::Packed => m.div_ceil(8),
        }
    }
}

/// Parsed CCBF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub encoding: Encoding,
    pub k: u16,
    pub m: u32,
}

impl Header {
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC_CCBF {
            return Err(SpellError::BadMagic(magic));
        }
        let encoding = Encoding::from_version(read_u16_be(r)?)?;
        let k = read_u16_be(r)?;
        let m = read_u32_be(r)?;
        check_geometry(k as u64, m as u64).map_err(SpellError::corrupt)?;
        Ok(Self { encoding, k, m })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(MAGIC_CCBF)?;
        write_u16_be(w, self.encoding.version())?;
        write_u16_be(w, self.k)?;
        write_u32_be(w, self.m)?;
        Ok(())
    }

    /// Expected total length of a well-formed file with this header.
    pub fn file_len(&self) -> u64 {
        HDR_SIZE as u64 + self.encoding.body_len(self.m as u64)
    }
}

/// Reads only the header of a persisted filter.
pub fn read_header(path: impl AsRef<Path>) -> Result<Header> {
    let mut r = BufReader::new(File::open(path)?);
    Header::read_from(&mut r)
}

fn pack(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];
    for (i, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
        out[i / 8] |= 1u8 << (i % 8);
    }
    out
}

fn unpack(bytes: &[u8], m: usize) -> Result<Vec<bool>> {
    let bits: Vec<bool> = (0..m).map(|i| bytes[i / 8] & (1u8 << (i % 8)) != 0).collect();
    let used = m % 8;
    if used != 0 {
        let tail = bytes[bytes.len() - 1] >> used;
        if tail != 0 {
            return Err(SpellError::corrupt("non-zero padding bits in packed section"));
        }
    }
    Ok(bits)
}

fn from_unpacked(bytes: &[u8]) -> Result<Vec<bool>> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, b)| match b {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SpellError::corrupt(format!("bit {i} has byte value {other:#04x}"))),
        })
        .collect()
}

impl BloomFilter {
    pub fn header(&self, encoding: Encoding) -> Header {
        // geometry is bounded to u16/u32 at construction
        Header { encoding, k: self.k() as u16, m: self.m() as u32 }
    }

    pub fn write_to<W: Write>(&self, w: &mut W, encoding: Encoding) -> Result<()> {
        self.header(encoding).write_to(w)?;
        match encoding {
            Encoding::Unpacked => {
                let body: Vec<u8> = self.bits().iter().map(|b| *b as u8).collect();
                w.write_all(&body)?;
            }
            Encoding::Packed => w.write_all(&pack(self.bits()))?,
        }
        Ok(())
    }

    pub fn to_bytes(&self, encoding: Encoding) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header(encoding).file_len() as usize);
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut out, encoding);
        out
    }

    /// Decodes a whole CCBF stream; the reader must end right after the bit section.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let header = Header::read_from(r)?;
        let m = header.m as usize;
        let mut body = vec![0u8; header.encoding.body_len(m as u64) as usize];
        r.read_exact(&mut body)?;
        let mut extra = [0u8; 1];
        if r.read(&mut extra)? != 0 {
            return Err(SpellError::corrupt(format!(
                "trailing data after {} byte filter",
                header.file_len()
            )));
        }
        let bits = match header.encoding {
            Encoding::Unpacked => from_unpacked(&body)?,
            Encoding::Packed => unpack(&body, m)?,
        };
        Ok(BloomFilter::with_bits(header.k as u64, bits, 0))
    }

    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut bytes)
    }

    /// Saves as version 1.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, Encoding::Unpacked)
    }

    /// Writes to a temp file next to `path`, then renames it into place.
    pub fn save_with(&self, path: impl AsRef<Path>, encoding: Encoding) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = tempfile::Builder::new().prefix(".ccbf_").tempfile_in(dir)?;
        {
            let mut w = BufWriter::new(tmp.as_file());
            self.write_to(&mut w, encoding)?;
            w.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        tracing::info!(path = %path.display(), m = self.m(), k = self.k(), version = encoding.version(), "saved filter");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut r = BufReader::new(File::open(path)?);
        let bf = Self::read_from(&mut r)?;
        tracing::info!(path = %path.display(), m = bf.m(), k = bf.k(), bits_set = bf.bits_set(), "loaded filter");
        Ok(bf)
    }
}
