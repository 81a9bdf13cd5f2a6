//! Metadata-driven audio analysis.
//!
//! Nothing in here reads audio samples. Every attribute is simulated from the
//! file name, its size and its extension, with a hash-seeded fallback so the
//! same file always produces the same analysis.

mod descriptor;
mod digest;
mod features;

pub use descriptor::{DescriptorError, FileDescriptor};
pub use digest::{name_digest, JitterLane};
pub use features::{
    extract, Brightness, Complexity, EnergyLevel, FeatureRecord, Mood, MusicalStyle,
};
