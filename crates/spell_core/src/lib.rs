pub mod consts;
pub mod errors;
pub mod utils;
pub mod hashes;
pub mod filter;
pub mod persist;
pub mod config;
pub mod wordlist;

pub use errors::{ErrorKind, Result, SpellError};
pub use hashes::{hash_functions, HashFunction};
pub use filter::{plan, BloomFilter, FilterHandle, Plan};
pub use persist::{read_header, Encoding, Header};
pub use config::BuildConfig;
