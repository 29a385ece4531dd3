//! In-place volume scaling of a chunk
//!
//! The single-stream counterpart of the mixer: walk a chunk's samples
//! once, multiply each by its channel's linear gain, write the result
//! back. Three fast paths skip the arithmetic entirely: blocks already
//! marked silent, unity volume, and full mute (which becomes a silence
//! fill). An encoding without arithmetic ops is tolerated here rather
//! than fatal: the chunk passes through unscaled with a warning, since
//! playback at the wrong volume beats taking the server down.

use bytemuck::try_cast_slice_mut;
use log::warn;

use crate::format::SampleOps;
use crate::memory::MemChunk;
use crate::sample::{SampleFormat, SampleSpec};
use crate::silence::silence_chunk;
use crate::volume::{ChannelVolumes, Volume};

/// Scale every sample of `chunk` by `volume`, in place.
///
/// Acquires the block's write view for the duration of the pass (fast
/// paths that touch no bytes acquire nothing). Integer encodings clamp
/// to their native range after the gain multiply; float encodings are
/// scaled without clamping.
///
/// Panics if `spec` is invalid, if `volume`'s channel count does not
/// match, or if the chunk is not frame-aligned.
pub fn apply_volume(chunk: &MemChunk, spec: &SampleSpec, volume: &ChannelVolumes) {
    assert!(spec.is_valid());
    assert_eq!(volume.channels(), spec.channels as usize);
    assert!(chunk.is_frame_aligned(spec));

    if chunk.length == 0 || chunk.block.is_silence() {
        return;
    }
    if volume.is_norm() {
        return;
    }
    if volume.is_muted() {
        silence_chunk(chunk, spec);
        return;
    }

    let ops = match spec.format.mix_ops() {
        Some(ops) => ops,
        None => {
            warn!(
                "unable to change volume of format {}, leaving data unscaled",
                spec.format
            );
            return;
        }
    };

    let channels = spec.channels as usize;
    let mut view = chunk.block.acquire_mut();
    let data = &mut view[chunk.index..chunk.index + chunk.length];

    match ops {
        SampleOps::Int(ops) => {
            let gains = volume.linear_fixed();
            let width = spec.format.size();
            let mut channel = 0;
            for sample in data.chunks_exact_mut(width) {
                let gain = gains[channel];
                if gain <= 0 {
                    (ops.encode)(0, sample);
                } else if gain != Volume::NORM.0 as i32 {
                    let v = ((ops.decode)(sample) * gain as i64) >> 16;
                    (ops.encode)(v.clamp(ops.min, ops.max), sample);
                }
                channel += 1;
                if channel >= channels {
                    channel = 0;
                }
            }
        }
        SampleOps::Float(float_ops) => {
            let gains = volume.linear_float();
            if spec.format == SampleFormat::FLOAT32NE {
                if let Ok(samples) = try_cast_slice_mut::<u8, f32>(data) {
                    scale_f32_planes(samples, &gains, channels);
                    return;
                }
            }
            let mut channel = 0;
            for sample in data.chunks_exact_mut(4) {
                let v = (float_ops.decode)(sample) * gains[channel];
                (float_ops.encode)(v, sample);
                channel += 1;
                if channel >= channels {
                    channel = 0;
                }
            }
        }
    }
}

/// Native-endian float fast path: scale each channel's samples through
/// a zero-copy `f32` view, skipping channels already at unity.
///
/// Unity gain is exactly 1.0 here, so the comparison is a true no-op
/// check and not a float tolerance.
fn scale_f32_planes(samples: &mut [f32], gains: &[f32], channels: usize) {
    for channel in 0..channels {
        let gain = gains[channel];
        if gain == 1.0 {
            continue;
        }
        for sample in samples[channel..].iter_mut().step_by(channels) {
            *sample *= gain;
        }
    }
}
