pub mod compare;
pub mod hasher;
pub mod prefix;
pub mod stats;

pub use compare::{
    normalize_rel_path, Candidate, Classification, CompareError, DisplayHashPair, FileEntry,
    TreeComparator,
};
pub use hasher::{hash_bytes, hash_file, try_hash_file, Digest, FileError};
pub use prefix::shortest_unique_prefixes;
pub use stats::LineStats;
