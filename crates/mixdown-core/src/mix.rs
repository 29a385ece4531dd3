//! The mixer: combines N volume-scaled streams into one output buffer
//!
//! One pass over the output, channel index cycling through the frame.
//! For every output sample each stream contributes its next decoded
//! sample scaled by that stream's per-channel gain; the clamped sum is
//! scaled again by the master volume and encoded into the target
//! format.
//!
//! The mix runs only as far as all sources agree: the first stream to
//! run out of bytes ends the whole mix, and the returned length tells
//! the caller how far it got. Callers that want a short stream padded
//! substitute a silence-cache chunk for it before mixing; comparing
//! the returned length against the requested one is how underruns are
//! detected, so exhaustion is deliberately not papered over here.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::format::{FloatOps, IntOps, SampleOps};
use crate::memory::{MemBlock, MemChunk};
use crate::sample::{SampleSpec, CHANNELS_MAX};
use crate::volume::ChannelVolumes;

/// Upper bound on simultaneously mixed streams; the per-call view
/// table is stack-allocated to keep the mix path free of allocation.
pub const MIX_STREAMS_MAX: usize = 32;

/// Per-channel linear gains in the arithmetic family of the target
/// encoding, computed once per mix call.
enum GainCache {
    Unset,
    Fixed([i32; CHANNELS_MAX]),
    Float([f32; CHANNELS_MAX]),
}

/// One input stream of a mix call: a chunk of samples plus the volume
/// to apply to them. The gain cache and read cursor are recomputed at
/// every [`mix`] entry, so an input reused across calls replays its
/// chunk from the start.
pub struct MixInput {
    pub chunk: MemChunk,
    pub volume: ChannelVolumes,
    linear: GainCache,
    cursor: usize,
}

impl MixInput {
    pub fn new(chunk: MemChunk, volume: ChannelVolumes) -> Self {
        Self {
            chunk,
            volume,
            linear: GainCache::Unset,
            cursor: 0,
        }
    }

    fn fixed_gain(&self, channel: usize) -> i32 {
        match &self.linear {
            GainCache::Fixed(gains) => gains[channel],
            _ => 0,
        }
    }

    fn float_gain(&self, channel: usize) -> f32 {
        match &self.linear {
            GainCache::Float(gains) => gains[channel],
            _ => 0.0,
        }
    }
}

/// Mix `streams` into `data`, producing samples of `spec`'s encoding.
///
/// `volume` is the master per-channel volume (`None` for unity) and
/// `muted` silences every stream while still consuming their bytes.
/// Every input block is acquired for reading at entry and released on
/// all exit paths. Returns the number of bytes written: the
/// sample-aligned minimum of the output length and every stream's
/// remaining chunk length.
///
/// Panics if `spec` is invalid or its encoding is not mixable, if
/// `data` is empty, if more than [`MIX_STREAMS_MAX`] streams are
/// given, or if any volume's channel count does not match `spec`.
pub fn mix(
    streams: &mut [MixInput],
    data: &mut [u8],
    spec: &SampleSpec,
    volume: Option<&ChannelVolumes>,
    muted: bool,
) -> usize {
    assert!(spec.is_valid());
    assert!(!data.is_empty());
    assert!(streams.len() <= MIX_STREAMS_MAX);

    let channels = spec.channels as usize;
    let master = match volume {
        Some(v) => *v,
        None => ChannelVolumes::norm(channels),
    };
    assert_eq!(master.channels(), channels);
    for stream in streams.iter() {
        assert_eq!(stream.volume.channels(), channels);
    }

    let ops = match spec.format.mix_ops() {
        Some(ops) => ops,
        None => panic!("unable to mix audio data of format {}", spec.format),
    };

    // Recompute per-call state from scratch: gains from the current
    // volumes, cursors back to the chunk start so a reused input
    // replays its chunk.
    match &ops {
        SampleOps::Int(_) => {
            for stream in streams.iter_mut() {
                stream.linear = GainCache::Fixed(stream.volume.linear_fixed());
                stream.cursor = 0;
            }
        }
        SampleOps::Float(_) => {
            for stream in streams.iter_mut() {
                stream.linear = GainCache::Float(stream.volume.linear_float());
                stream.cursor = 0;
            }
        }
    }

    // Hold every input block's read view for the duration of the call.
    // The blocks are cloned out first so the guards borrow only the
    // local table, leaving `streams` free for cursor updates.
    let blocks: ArrayVec<Arc<MemBlock>, MIX_STREAMS_MAX> = streams
        .iter()
        .map(|stream| Arc::clone(&stream.chunk.block))
        .collect();
    let views: ArrayVec<_, MIX_STREAMS_MAX> =
        blocks.iter().map(|block| block.acquire()).collect();
    let sources: ArrayVec<&[u8], MIX_STREAMS_MAX> = views
        .iter()
        .zip(streams.iter())
        .map(|(view, stream)| {
            &view[stream.chunk.index..stream.chunk.index + stream.chunk.length]
        })
        .collect();

    let width = spec.format.size();
    match ops {
        SampleOps::Int(ops) => {
            let master_gain = master.linear_fixed();
            mix_int(streams, &sources, data, width, channels, &master_gain, muted, ops)
        }
        SampleOps::Float(ops) => {
            let master_gain = master.linear_float();
            mix_float(streams, &sources, data, channels, &master_gain, muted, ops)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn mix_int(
    streams: &mut [MixInput],
    sources: &[&[u8]],
    data: &mut [u8],
    width: usize,
    channels: usize,
    master: &[i32; CHANNELS_MAX],
    muted: bool,
    ops: &IntOps,
) -> usize {
    let mut d = 0;
    let mut channel = 0;

    'output: loop {
        if d + width > data.len() {
            break;
        }

        let mut sum: i64 = 0;
        for (k, stream) in streams.iter_mut().enumerate() {
            if stream.cursor + width > stream.chunk.length {
                break 'output;
            }
            let gain = stream.fixed_gain(channel);
            if !(muted || gain <= 0 || master[channel] <= 0) {
                let src = &sources[k][stream.cursor..stream.cursor + width];
                sum += ((ops.decode)(src) * gain as i64) >> 16;
            }
            stream.cursor += width;
        }

        let mut value = sum.clamp(ops.min, ops.max);
        value = (value * master[channel] as i64) >> 16;
        value = value.clamp(ops.min, ops.max);
        (ops.encode)(value, &mut data[d..d + width]);

        d += width;
        channel += 1;
        if channel >= channels {
            channel = 0;
        }
    }

    d
}

fn mix_float(
    streams: &mut [MixInput],
    sources: &[&[u8]],
    data: &mut [u8],
    channels: usize,
    master: &[f32; CHANNELS_MAX],
    muted: bool,
    ops: &FloatOps,
) -> usize {
    const WIDTH: usize = 4;
    let mut d = 0;
    let mut channel = 0;

    'output: loop {
        if d + WIDTH > data.len() {
            break;
        }

        let mut sum = 0.0f32;
        for (k, stream) in streams.iter_mut().enumerate() {
            if stream.cursor + WIDTH > stream.chunk.length {
                break 'output;
            }
            let gain = stream.float_gain(channel);
            if !(muted || gain <= 0.0 || master[channel] <= 0.0) {
                let src = &sources[k][stream.cursor..stream.cursor + WIDTH];
                sum += (ops.decode)(src) * gain;
            }
            stream.cursor += WIDTH;
        }

        sum *= master[channel];
        (ops.encode)(sum, &mut data[d..d + WIDTH]);

        d += WIDTH;
        channel += 1;
        if channel >= channels {
            channel = 0;
        }
    }

    d
}
