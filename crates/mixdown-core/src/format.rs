//! Per-encoding codec table
//!
//! One static entry per sample encoding carrying its silence byte and,
//! for the encodings the arithmetic paths understand, decode/encode
//! primitives. Integer encodings decode into `i64`, wide enough that a
//! 16.16 gain multiply followed by a 32-channel sum cannot overflow;
//! the mixer and scaler clamp back to `min..=max` before encoding.
//! Float encodings decode to `f32` and are never clamped.
//!
//! The packed and in-word 24-bit encodings have table entries (width,
//! silence, parsing) but no arithmetic ops yet; [`SampleFormat::mix_ops`]
//! returns `None` for them and callers apply the two-tier error
//! contract: fatal for mixing, warn-and-skip for in-place scaling.

use crate::g711;
use crate::sample::SampleFormat;

/// Arithmetic primitives for an integer-family encoding.
pub(crate) struct IntOps {
    /// Encoding-native clamp bounds in the decoded domain.
    pub min: i64,
    pub max: i64,
    pub decode: fn(&[u8]) -> i64,
    pub encode: fn(i64, &mut [u8]),
}

/// Arithmetic primitives for a float-family encoding.
pub(crate) struct FloatOps {
    pub decode: fn(&[u8]) -> f32,
    pub encode: fn(f32, &mut [u8]),
}

pub(crate) enum SampleOps {
    Int(&'static IntOps),
    Float(&'static FloatOps),
}

fn decode_u8(b: &[u8]) -> i64 {
    b[0] as i64 - 0x80
}

fn encode_u8(v: i64, b: &mut [u8]) {
    b[0] = (v + 0x80) as u8;
}

fn decode_alaw(b: &[u8]) -> i64 {
    g711::alaw_to_linear16(b[0]) as i64
}

fn encode_alaw(v: i64, b: &mut [u8]) {
    b[0] = g711::linear13_to_alaw((v >> 3) as i16);
}

fn decode_ulaw(b: &[u8]) -> i64 {
    g711::ulaw_to_linear16(b[0]) as i64
}

fn encode_ulaw(v: i64, b: &mut [u8]) {
    b[0] = g711::linear14_to_ulaw((v >> 2) as i16);
}

fn decode_s16le(b: &[u8]) -> i64 {
    i16::from_le_bytes([b[0], b[1]]) as i64
}

fn encode_s16le(v: i64, b: &mut [u8]) {
    b[..2].copy_from_slice(&(v as i16).to_le_bytes());
}

fn decode_s16be(b: &[u8]) -> i64 {
    i16::from_be_bytes([b[0], b[1]]) as i64
}

fn encode_s16be(v: i64, b: &mut [u8]) {
    b[..2].copy_from_slice(&(v as i16).to_be_bytes());
}

fn decode_s32le(b: &[u8]) -> i64 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as i64
}

fn encode_s32le(v: i64, b: &mut [u8]) {
    b[..4].copy_from_slice(&(v as i32).to_le_bytes());
}

fn decode_s32be(b: &[u8]) -> i64 {
    i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as i64
}

fn encode_s32be(v: i64, b: &mut [u8]) {
    b[..4].copy_from_slice(&(v as i32).to_be_bytes());
}

fn decode_f32le(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn encode_f32le(v: f32, b: &mut [u8]) {
    b[..4].copy_from_slice(&v.to_le_bytes());
}

fn decode_f32be(b: &[u8]) -> f32 {
    f32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

fn encode_f32be(v: f32, b: &mut [u8]) {
    b[..4].copy_from_slice(&v.to_be_bytes());
}

static U8_OPS: IntOps = IntOps {
    min: -0x80,
    max: 0x7f,
    decode: decode_u8,
    encode: encode_u8,
};

static ALAW_OPS: IntOps = IntOps {
    min: -0x8000,
    max: 0x7fff,
    decode: decode_alaw,
    encode: encode_alaw,
};

static ULAW_OPS: IntOps = IntOps {
    min: -0x8000,
    max: 0x7fff,
    decode: decode_ulaw,
    encode: encode_ulaw,
};

static S16LE_OPS: IntOps = IntOps {
    min: -0x8000,
    max: 0x7fff,
    decode: decode_s16le,
    encode: encode_s16le,
};

static S16BE_OPS: IntOps = IntOps {
    min: -0x8000,
    max: 0x7fff,
    decode: decode_s16be,
    encode: encode_s16be,
};

static S32LE_OPS: IntOps = IntOps {
    min: -0x8000_0000,
    max: 0x7fff_ffff,
    decode: decode_s32le,
    encode: encode_s32le,
};

static S32BE_OPS: IntOps = IntOps {
    min: -0x8000_0000,
    max: 0x7fff_ffff,
    decode: decode_s32be,
    encode: encode_s32be,
};

static F32LE_OPS: FloatOps = FloatOps {
    decode: decode_f32le,
    encode: encode_f32le,
};

static F32BE_OPS: FloatOps = FloatOps {
    decode: decode_f32be,
    encode: encode_f32be,
};

impl SampleFormat {
    /// The byte that represents digital silence for this encoding.
    pub fn silence_byte(self) -> u8 {
        match self {
            SampleFormat::U8 => 0x80,
            SampleFormat::Alaw => 0xd5,
            SampleFormat::Ulaw => 0xff,
            _ => 0x00,
        }
    }

    /// Arithmetic ops for this encoding, or `None` if the mix/scale
    /// paths do not support it.
    pub(crate) fn mix_ops(self) -> Option<SampleOps> {
        match self {
            SampleFormat::U8 => Some(SampleOps::Int(&U8_OPS)),
            SampleFormat::Alaw => Some(SampleOps::Int(&ALAW_OPS)),
            SampleFormat::Ulaw => Some(SampleOps::Int(&ULAW_OPS)),
            SampleFormat::S16Le => Some(SampleOps::Int(&S16LE_OPS)),
            SampleFormat::S16Be => Some(SampleOps::Int(&S16BE_OPS)),
            SampleFormat::S32Le => Some(SampleOps::Int(&S32LE_OPS)),
            SampleFormat::S32Be => Some(SampleOps::Int(&S32BE_OPS)),
            SampleFormat::Float32Le => Some(SampleOps::Float(&F32LE_OPS)),
            SampleFormat::Float32Be => Some(SampleOps::Float(&F32BE_OPS)),
            SampleFormat::S24Le
            | SampleFormat::S24Be
            | SampleFormat::S24In32Le
            | SampleFormat::S24In32Be => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_ops(format: SampleFormat) -> &'static IntOps {
        match format.mix_ops() {
            Some(SampleOps::Int(ops)) => ops,
            _ => panic!("expected integer ops for {format}"),
        }
    }

    fn float_ops(format: SampleFormat) -> &'static FloatOps {
        match format.mix_ops() {
            Some(SampleOps::Float(ops)) => ops,
            _ => panic!("expected float ops for {format}"),
        }
    }

    #[test]
    fn silence_bytes() {
        assert_eq!(SampleFormat::U8.silence_byte(), 0x80);
        assert_eq!(SampleFormat::Alaw.silence_byte(), 0xd5);
        assert_eq!(SampleFormat::Ulaw.silence_byte(), 0xff);
        assert_eq!(SampleFormat::S16Le.silence_byte(), 0x00);
        assert_eq!(SampleFormat::S16Be.silence_byte(), 0x00);
        assert_eq!(SampleFormat::S24Le.silence_byte(), 0x00);
        assert_eq!(SampleFormat::Float32Be.silence_byte(), 0x00);
    }

    #[test]
    fn s16_decode_respects_endianness() {
        let bytes = [0x34, 0x12];
        assert_eq!((int_ops(SampleFormat::S16Le).decode)(&bytes), 0x1234);
        assert_eq!((int_ops(SampleFormat::S16Be).decode)(&bytes), 0x3412);
    }

    #[test]
    fn s16_encode_decode_round_trip() {
        for format in [SampleFormat::S16Le, SampleFormat::S16Be] {
            let ops = int_ops(format);
            for v in [-32768i64, -1, 0, 1, 32767] {
                let mut buf = [0u8; 2];
                (ops.encode)(v, &mut buf);
                assert_eq!((ops.decode)(&buf), v, "{format} {v}");
            }
        }
    }

    #[test]
    fn s32_bounds_round_trip() {
        for format in [SampleFormat::S32Le, SampleFormat::S32Be] {
            let ops = int_ops(format);
            for v in [ops.min, -1, 0, 1, ops.max] {
                let mut buf = [0u8; 4];
                (ops.encode)(v, &mut buf);
                assert_eq!((ops.decode)(&buf), v, "{format} {v}");
            }
        }
    }

    #[test]
    fn u8_is_biased() {
        let ops = int_ops(SampleFormat::U8);
        assert_eq!((ops.decode)(&[0x80]), 0);
        assert_eq!((ops.decode)(&[0x00]), -128);
        assert_eq!((ops.decode)(&[0xff]), 127);
        let mut buf = [0u8];
        (ops.encode)(0, &mut buf);
        assert_eq!(buf[0], 0x80);
    }

    #[test]
    fn float_byte_swap() {
        let le = float_ops(SampleFormat::Float32Le);
        let be = float_ops(SampleFormat::Float32Be);
        let mut le_buf = [0u8; 4];
        let mut be_buf = [0u8; 4];
        (le.encode)(0.5, &mut le_buf);
        (be.encode)(0.5, &mut be_buf);
        assert_eq!(le_buf, [be_buf[3], be_buf[2], be_buf[1], be_buf[0]]);
        assert_eq!((le.decode)(&le_buf), 0.5);
        assert_eq!((be.decode)(&be_buf), 0.5);
    }

    #[test]
    fn companded_silence_codes_decode_near_zero() {
        assert_eq!((int_ops(SampleFormat::Ulaw).decode)(&[0xff]), 0);
        assert_eq!((int_ops(SampleFormat::Alaw).decode)(&[0xd5]), 8);
    }

    #[test]
    fn formats_without_ops() {
        for format in [
            SampleFormat::S24Le,
            SampleFormat::S24Be,
            SampleFormat::S24In32Le,
            SampleFormat::S24In32Be,
        ] {
            assert!(format.mix_ops().is_none(), "{format}");
        }
    }
}
