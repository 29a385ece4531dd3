//! Sample format and stream specification metadata
//!
//! A [`SampleSpec`] describes the raw PCM layout of a stream: its
//! encoding, sample rate and channel count. Everything else in this
//! crate is parameterized by it. The helpers here are pure metadata
//! queries (frame sizes, validity, byte/time conversion); the actual
//! per-encoding arithmetic lives in the codec table.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Maximum number of channels a spec may carry.
pub const CHANNELS_MAX: usize = 32;

/// Maximum supported sample rate in Hz.
pub const RATE_MAX: u32 = 192_000;

/// Raw PCM sample encodings.
///
/// The `*Le`/`*Be` pairs are the little- and big-endian layouts of the
/// same numeric format; the `S24In32*` variants store a 24-bit sample
/// in the low bits of a 32-bit word. `Alaw` and `Ulaw` are the two
/// G.711 companding laws, one byte per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    /// Unsigned 8-bit, biased at 0x80.
    U8,
    /// G.711 A-law.
    Alaw,
    /// G.711 u-law.
    Ulaw,
    /// Signed 16-bit, little endian.
    S16Le,
    /// Signed 16-bit, big endian.
    S16Be,
    /// IEEE 754 single precision, little endian.
    Float32Le,
    /// IEEE 754 single precision, big endian.
    Float32Be,
    /// Signed 32-bit, little endian.
    S32Le,
    /// Signed 32-bit, big endian.
    S32Be,
    /// Signed 24-bit packed in 3 bytes, little endian.
    S24Le,
    /// Signed 24-bit packed in 3 bytes, big endian.
    S24Be,
    /// Signed 24-bit in the low bits of a 32-bit word, little endian.
    S24In32Le,
    /// Signed 24-bit in the low bits of a 32-bit word, big endian.
    S24In32Be,
}

impl SampleFormat {
    /// Number of supported encodings.
    pub const COUNT: usize = 13;

    /// All supported encodings, in table order.
    pub const ALL: [SampleFormat; Self::COUNT] = [
        SampleFormat::U8,
        SampleFormat::Alaw,
        SampleFormat::Ulaw,
        SampleFormat::S16Le,
        SampleFormat::S16Be,
        SampleFormat::Float32Le,
        SampleFormat::Float32Be,
        SampleFormat::S32Le,
        SampleFormat::S32Be,
        SampleFormat::S24Le,
        SampleFormat::S24Be,
        SampleFormat::S24In32Le,
        SampleFormat::S24In32Be,
    ];

    #[cfg(target_endian = "little")]
    pub const S16NE: SampleFormat = SampleFormat::S16Le;
    #[cfg(target_endian = "little")]
    pub const S16RE: SampleFormat = SampleFormat::S16Be;
    #[cfg(target_endian = "little")]
    pub const S32NE: SampleFormat = SampleFormat::S32Le;
    #[cfg(target_endian = "little")]
    pub const S32RE: SampleFormat = SampleFormat::S32Be;
    #[cfg(target_endian = "little")]
    pub const S24NE: SampleFormat = SampleFormat::S24Le;
    #[cfg(target_endian = "little")]
    pub const S24RE: SampleFormat = SampleFormat::S24Be;
    #[cfg(target_endian = "little")]
    pub const S24_32NE: SampleFormat = SampleFormat::S24In32Le;
    #[cfg(target_endian = "little")]
    pub const S24_32RE: SampleFormat = SampleFormat::S24In32Be;
    #[cfg(target_endian = "little")]
    pub const FLOAT32NE: SampleFormat = SampleFormat::Float32Le;
    #[cfg(target_endian = "little")]
    pub const FLOAT32RE: SampleFormat = SampleFormat::Float32Be;

    #[cfg(target_endian = "big")]
    pub const S16NE: SampleFormat = SampleFormat::S16Be;
    #[cfg(target_endian = "big")]
    pub const S16RE: SampleFormat = SampleFormat::S16Le;
    #[cfg(target_endian = "big")]
    pub const S32NE: SampleFormat = SampleFormat::S32Be;
    #[cfg(target_endian = "big")]
    pub const S32RE: SampleFormat = SampleFormat::S32Le;
    #[cfg(target_endian = "big")]
    pub const S24NE: SampleFormat = SampleFormat::S24Be;
    #[cfg(target_endian = "big")]
    pub const S24RE: SampleFormat = SampleFormat::S24Le;
    #[cfg(target_endian = "big")]
    pub const S24_32NE: SampleFormat = SampleFormat::S24In32Be;
    #[cfg(target_endian = "big")]
    pub const S24_32RE: SampleFormat = SampleFormat::S24In32Le;
    #[cfg(target_endian = "big")]
    pub const FLOAT32NE: SampleFormat = SampleFormat::Float32Be;
    #[cfg(target_endian = "big")]
    pub const FLOAT32RE: SampleFormat = SampleFormat::Float32Le;

    /// Size of one sample in bytes.
    pub fn size(self) -> usize {
        match self {
            SampleFormat::U8 | SampleFormat::Alaw | SampleFormat::Ulaw => 1,
            SampleFormat::S16Le | SampleFormat::S16Be => 2,
            SampleFormat::S24Le | SampleFormat::S24Be => 3,
            SampleFormat::Float32Le
            | SampleFormat::Float32Be
            | SampleFormat::S32Le
            | SampleFormat::S32Be
            | SampleFormat::S24In32Le
            | SampleFormat::S24In32Be => 4,
        }
    }

    /// Canonical name of this encoding.
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::U8 => "u8",
            SampleFormat::Alaw => "aLaw",
            SampleFormat::Ulaw => "uLaw",
            SampleFormat::S16Le => "s16le",
            SampleFormat::S16Be => "s16be",
            SampleFormat::Float32Le => "float32le",
            SampleFormat::Float32Be => "float32be",
            SampleFormat::S32Le => "s32le",
            SampleFormat::S32Be => "s32be",
            SampleFormat::S24Le => "s24le",
            SampleFormat::S24Be => "s24be",
            SampleFormat::S24In32Le => "s24-32le",
            SampleFormat::S24In32Be => "s24-32be",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.to_ascii_lowercase().as_str() {
            "u8" | "8" => SampleFormat::U8,
            "alaw" => SampleFormat::Alaw,
            "ulaw" | "mulaw" => SampleFormat::Ulaw,
            "s16le" => SampleFormat::S16Le,
            "s16be" => SampleFormat::S16Be,
            "s16ne" | "s16" | "16" => SampleFormat::S16NE,
            "s16re" => SampleFormat::S16RE,
            "float32le" => SampleFormat::Float32Le,
            "float32be" => SampleFormat::Float32Be,
            "float32ne" | "float32" | "float" => SampleFormat::FLOAT32NE,
            "float32re" => SampleFormat::FLOAT32RE,
            "s32le" => SampleFormat::S32Le,
            "s32be" => SampleFormat::S32Be,
            "s32ne" | "s32" | "32" => SampleFormat::S32NE,
            "s32re" => SampleFormat::S32RE,
            "s24le" => SampleFormat::S24Le,
            "s24be" => SampleFormat::S24Be,
            "s24ne" | "s24" | "24" => SampleFormat::S24NE,
            "s24re" => SampleFormat::S24RE,
            "s24-32le" => SampleFormat::S24In32Le,
            "s24-32be" => SampleFormat::S24In32Be,
            "s24-32ne" | "s24-32" => SampleFormat::S24_32NE,
            "s24-32re" => SampleFormat::S24_32RE,
            _ => return Err(ParseError::UnknownFormat(s.to_string())),
        };
        Ok(format)
    }
}

/// Full description of a stream's raw PCM layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleSpec {
    /// Sample encoding.
    pub format: SampleFormat,
    /// Sample rate in Hz.
    pub rate: u32,
    /// Number of interleaved channels.
    pub channels: u8,
}

impl SampleSpec {
    /// Check rate and channel count against the supported ranges.
    pub fn is_valid(&self) -> bool {
        self.rate > 0
            && self.rate <= RATE_MAX
            && self.channels > 0
            && self.channels as usize <= CHANNELS_MAX
    }

    /// Size of one sample in bytes.
    pub fn sample_size(&self) -> usize {
        self.format.size()
    }

    /// Size of one frame (one sample per channel) in bytes.
    pub fn frame_size(&self) -> usize {
        self.format.size() * self.channels as usize
    }

    /// Raw data rate in bytes per second.
    pub fn bytes_per_second(&self) -> usize {
        self.frame_size() * self.rate as usize
    }

    /// Playback time of `bytes` of audio in this spec.
    ///
    /// Panics if the spec is invalid.
    pub fn bytes_to_duration(&self, bytes: usize) -> Duration {
        assert!(self.is_valid());
        let frames = (bytes / self.frame_size()) as u64;
        Duration::from_micros(frames * 1_000_000 / self.rate as u64)
    }

    /// Number of bytes played in `duration`, rounded down to a whole frame.
    ///
    /// Panics if the spec is invalid.
    pub fn duration_to_bytes(&self, duration: Duration) -> usize {
        assert!(self.is_valid());
        let frames = duration.as_micros() as u64 * self.rate as u64 / 1_000_000;
        frames as usize * self.frame_size()
    }
}

impl fmt::Display for SampleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}ch {}Hz", self.format, self.channels, self.rate)
    }
}

impl FromStr for SampleSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseError::MalformedSpec(s.to_string());

        let mut parts = s.split_whitespace();
        let format = parts.next().ok_or_else(malformed)?.parse()?;
        let channels = parts
            .next()
            .and_then(|p| p.strip_suffix("ch"))
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        let rate = parts
            .next()
            .and_then(|p| p.strip_suffix("Hz"))
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        let spec = SampleSpec { format, rate, channels };
        if !spec.is_valid() {
            return Err(ParseError::InvalidSpec(spec.to_string()));
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sizes() {
        assert_eq!(SampleFormat::U8.size(), 1);
        assert_eq!(SampleFormat::Ulaw.size(), 1);
        assert_eq!(SampleFormat::S16Le.size(), 2);
        assert_eq!(SampleFormat::S24Be.size(), 3);
        assert_eq!(SampleFormat::S24In32Le.size(), 4);
        assert_eq!(SampleFormat::S32Be.size(), 4);
        assert_eq!(SampleFormat::Float32Le.size(), 4);
    }

    #[test]
    fn frame_size_scales_with_channels() {
        let spec = SampleSpec {
            format: SampleFormat::S16Le,
            rate: 44100,
            channels: 2,
        };
        assert_eq!(spec.frame_size(), 4);
        assert_eq!(spec.bytes_per_second(), 176_400);
    }

    #[test]
    fn validity_bounds() {
        let mut spec = SampleSpec {
            format: SampleFormat::Float32Le,
            rate: 48000,
            channels: 2,
        };
        assert!(spec.is_valid());

        spec.channels = 0;
        assert!(!spec.is_valid());
        spec.channels = (CHANNELS_MAX + 1) as u8;
        assert!(!spec.is_valid());
        spec.channels = CHANNELS_MAX as u8;
        assert!(spec.is_valid());

        spec.rate = 0;
        assert!(!spec.is_valid());
        spec.rate = RATE_MAX + 1;
        assert!(!spec.is_valid());
    }

    #[test]
    fn format_name_round_trip() {
        for format in SampleFormat::ALL {
            assert_eq!(format.name().parse::<SampleFormat>(), Ok(format));
        }
    }

    #[test]
    fn native_aliases_resolve_to_real_variants() {
        assert_eq!(SampleFormat::S16NE.size(), 2);
        assert_ne!(SampleFormat::S16NE, SampleFormat::S16RE);
        assert_ne!(SampleFormat::FLOAT32NE, SampleFormat::FLOAT32RE);
    }

    #[test]
    fn unknown_format_is_an_error() {
        assert!(matches!(
            "s17le".parse::<SampleFormat>(),
            Err(ParseError::UnknownFormat(_))
        ));
    }

    #[test]
    fn spec_display_parse_round_trip() {
        let spec = SampleSpec {
            format: SampleFormat::S16Le,
            rate: 44100,
            channels: 2,
        };
        assert_eq!(spec.to_string(), "s16le 2ch 44100Hz");
        assert_eq!(spec.to_string().parse::<SampleSpec>(), Ok(spec));

        assert!(matches!(
            "s16le 2ch".parse::<SampleSpec>(),
            Err(ParseError::MalformedSpec(_))
        ));
        assert!(matches!(
            "s16le 0ch 44100Hz".parse::<SampleSpec>(),
            Err(ParseError::InvalidSpec(_))
        ));
    }

    #[test]
    fn duration_conversion() {
        let spec = SampleSpec {
            format: SampleFormat::S16Le,
            rate: 48000,
            channels: 2,
        };
        assert_eq!(
            spec.bytes_to_duration(spec.bytes_per_second()),
            Duration::from_secs(1)
        );
        assert_eq!(spec.duration_to_bytes(Duration::from_millis(500)), 96_000);
    }

    #[test]
    #[should_panic]
    fn duration_conversion_rejects_invalid_spec() {
        let spec = SampleSpec {
            format: SampleFormat::S16Le,
            rate: 48000,
            channels: 0,
        };
        spec.bytes_to_duration(4);
    }
}
