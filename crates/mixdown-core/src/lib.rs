//! Mixdown Core - Sample mixing and software volume engine

pub mod error;
pub mod layout;
pub mod memory;
pub mod mix;
pub mod sample;
pub mod scale;
pub mod silence;
pub mod volume;

mod format;
mod g711;

pub use error::ParseError;
pub use memory::{MemBlock, MemChunk, MemPool};
pub use mix::{mix, MixInput, MIX_STREAMS_MAX};
pub use sample::{SampleFormat, SampleSpec, CHANNELS_MAX, RATE_MAX};
pub use scale::apply_volume;
pub use silence::{silence_chunk, silence_memory, SilenceCache, SILENCE_MAX};
pub use volume::{ChannelVolumes, Volume};
