//! Channel layout transforms and alignment helpers
//!
//! Pure byte-level utilities: interleave/deinterleave between planar
//! per-channel buffers and a single interleaved buffer, frame
//! alignment, and in-place clamping of float sample runs. No gain
//! arithmetic happens here.

use crate::sample::{SampleFormat, SampleSpec};

/// Largest multiple of `spec`'s frame size that is `<= length`.
pub fn frame_align(length: usize, spec: &SampleSpec) -> usize {
    let fs = spec.frame_size();
    (length / fs) * fs
}

/// True if `length` is a whole number of frames of `spec`.
pub fn frame_aligned(length: usize, spec: &SampleSpec) -> bool {
    length % spec.frame_size() == 0
}

/// Merge per-channel planar buffers into one interleaved buffer.
///
/// Each source plane must hold at least `frames` samples of
/// `sample_size` bytes; `dst` must hold `frames` full frames.
pub fn interleave(src: &[&[u8]], dst: &mut [u8], sample_size: usize, frames: usize) {
    assert!(!src.is_empty());
    assert!(sample_size > 0);
    let frame_size = sample_size * src.len();
    assert!(dst.len() >= frame_size * frames);

    for (channel, plane) in src.iter().enumerate() {
        assert!(plane.len() >= sample_size * frames);
        for frame in 0..frames {
            let s = frame * sample_size;
            let d = frame * frame_size + channel * sample_size;
            dst[d..d + sample_size].copy_from_slice(&plane[s..s + sample_size]);
        }
    }
}

/// Split one interleaved buffer into per-channel planar buffers.
///
/// The inverse of [`interleave`], with the same size requirements.
pub fn deinterleave(src: &[u8], dst: &mut [&mut [u8]], sample_size: usize, frames: usize) {
    assert!(!dst.is_empty());
    assert!(sample_size > 0);
    let frame_size = sample_size * dst.len();
    assert!(src.len() >= frame_size * frames);

    for (channel, plane) in dst.iter_mut().enumerate() {
        assert!(plane.len() >= sample_size * frames);
        for frame in 0..frames {
            let s = frame * frame_size + channel * sample_size;
            let d = frame * sample_size;
            plane[d..d + sample_size].copy_from_slice(&src[s..s + sample_size]);
        }
    }
}

/// Saturate a strided run of float samples into [-1.0, 1.0].
///
/// `src` and `dst` may be the same region accessed through one mutable
/// slice or disjoint buffers; strides are in bytes. Only the two float
/// encodings are legal here.
pub fn sample_clamp(
    format: SampleFormat,
    dst: &mut [u8],
    dst_stride: usize,
    src: &[u8],
    src_stride: usize,
    n: usize,
) {
    assert!(
        matches!(format, SampleFormat::Float32Le | SampleFormat::Float32Be),
        "sample_clamp only handles float encodings, got {format}"
    );
    if n == 0 {
        return;
    }
    assert!(src_stride >= 4 && dst_stride >= 4);
    assert!(src.len() >= (n - 1) * src_stride + 4);
    assert!(dst.len() >= (n - 1) * dst_stride + 4);

    // contiguous native-endian runs clamp through a zero-copy f32 view
    if format == SampleFormat::FLOAT32NE && src_stride == 4 && dst_stride == 4 {
        if let (Ok(s), Ok(d)) = (
            bytemuck::try_cast_slice::<u8, f32>(&src[..n * 4]),
            bytemuck::try_cast_slice_mut::<u8, f32>(&mut dst[..n * 4]),
        ) {
            for (d, &s) in d.iter_mut().zip(s) {
                *d = s.clamp(-1.0, 1.0);
            }
            return;
        }
    }

    let swapped = format != SampleFormat::FLOAT32NE;
    for i in 0..n {
        let s = &src[i * src_stride..i * src_stride + 4];
        let raw = [s[0], s[1], s[2], s[3]];
        let v = if swapped {
            f32::from_bits(u32::from_ne_bytes(raw).swap_bytes())
        } else {
            f32::from_ne_bytes(raw)
        };
        let v = v.clamp(-1.0, 1.0);
        let out = if swapped {
            v.to_bits().swap_bytes().to_ne_bytes()
        } else {
            v.to_ne_bytes()
        };
        dst[i * dst_stride..i * dst_stride + 4].copy_from_slice(&out);
    }
}
