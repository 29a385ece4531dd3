//! Software volumes and linear gain conversion
//!
//! Volumes live in a normalized integer domain where [`Volume::NORM`]
//! is unity gain and [`Volume::MUTED`] is silence. The mapping to a
//! multiplicative gain goes through a 30 dB user scale: one normalized
//! step above or below `NORM` moves the gain by a fixed fraction of
//! that range. The two sentinels convert exactly: `NORM` is 1.0 and
//! `MUTED` is 0.0, so unity scaling is a true no-op and mute is a true
//! zero, independent of floating-point rounding.
//!
//! Integer sample paths consume volumes as 16.16 fixed-point
//! multipliers; float paths consume them as `f32`. Gains that quantize
//! to zero or below are treated as fully muted by the consumers, never
//! as a near-zero multiply.

use serde::{Deserialize, Serialize};

use crate::sample::CHANNELS_MAX;

/// Width of the user volume scale in dB.
const VOLUME_DB_RANGE: f64 = 30.0;

/// A single-channel software volume in the normalized domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Volume(pub u32);

impl Volume {
    /// Fully muted.
    pub const MUTED: Volume = Volume(0);
    /// Unity gain.
    pub const NORM: Volume = Volume(0x10000);

    /// Convert to decibels relative to unity.
    pub fn to_db(self) -> f64 {
        if self == Self::MUTED {
            return f64::NEG_INFINITY;
        }
        (self.0 as f64 - Self::NORM.0 as f64) / Self::NORM.0 as f64 * VOLUME_DB_RANGE
    }

    /// Convert from decibels relative to unity. Values far enough below
    /// the scale floor collapse to [`Volume::MUTED`].
    pub fn from_db(db: f64) -> Volume {
        if db == f64::NEG_INFINITY {
            return Self::MUTED;
        }
        let norm = Self::NORM.0 as f64;
        let v = (db / VOLUME_DB_RANGE * norm + norm).round();
        if v <= 0.0 {
            Self::MUTED
        } else {
            Volume(v as u32)
        }
    }

    /// Convert to a linear multiplier. Exactly 1.0 at `NORM` and
    /// exactly 0.0 at `MUTED`.
    pub fn to_linear(self) -> f64 {
        if self == Self::MUTED {
            0.0
        } else if self == Self::NORM {
            1.0
        } else {
            10f64.powf(self.to_db() / 20.0)
        }
    }

    /// Convert from a linear multiplier. Non-positive values collapse
    /// to [`Volume::MUTED`].
    pub fn from_linear(linear: f64) -> Volume {
        if linear <= 0.0 {
            Self::MUTED
        } else if linear == 1.0 {
            Self::NORM
        } else {
            Self::from_db(20.0 * linear.log10())
        }
    }

    /// Compose two volumes in the normalized domain (rounded product).
    pub fn multiply(self, other: Volume) -> Volume {
        let norm = Self::NORM.0 as u64;
        Volume(((self.0 as u64 * other.0 as u64 + norm / 2) / norm) as u32)
    }

    /// Linear gain as a 16.16 fixed-point multiplier, truncated.
    pub fn linear_fixed(self) -> i32 {
        (self.to_linear() * Self::NORM.0 as f64) as i32
    }

    /// Linear gain as a single-precision float.
    pub fn linear_float(self) -> f32 {
        self.to_linear() as f32
    }
}

/// Per-channel volumes for one stream, sized to the stream's spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVolumes {
    channels: u8,
    values: [Volume; CHANNELS_MAX],
}

impl ChannelVolumes {
    /// Create with the same volume on every channel.
    ///
    /// Panics if `channels` is zero or above [`CHANNELS_MAX`].
    pub fn new(channels: usize, volume: Volume) -> Self {
        assert!(channels > 0 && channels <= CHANNELS_MAX);
        Self {
            channels: channels as u8,
            values: [volume; CHANNELS_MAX],
        }
    }

    /// Unity gain on every channel.
    pub fn norm(channels: usize) -> Self {
        Self::new(channels, Volume::NORM)
    }

    /// Muted on every channel.
    pub fn muted(channels: usize) -> Self {
        Self::new(channels, Volume::MUTED)
    }

    /// Create from a slice of per-channel volumes.
    pub fn from_values(values: &[Volume]) -> Self {
        let mut v = Self::new(values.len(), Volume::MUTED);
        v.values[..values.len()].copy_from_slice(values);
        v
    }

    /// Number of channels this volume set covers.
    pub fn channels(&self) -> usize {
        self.channels as usize
    }

    /// The per-channel volume values.
    pub fn values(&self) -> &[Volume] {
        &self.values[..self.channels as usize]
    }

    /// Set one channel's volume.
    pub fn set(&mut self, channel: usize, volume: Volume) {
        assert!(channel < self.channels as usize);
        self.values[channel] = volume;
    }

    /// True if every channel is at unity gain.
    pub fn is_norm(&self) -> bool {
        self.values().iter().all(|&v| v == Volume::NORM)
    }

    /// True if every channel is muted.
    pub fn is_muted(&self) -> bool {
        self.values().iter().all(|&v| v == Volume::MUTED)
    }

    /// Per-channel composition with another volume set.
    ///
    /// Panics if the channel counts differ.
    pub fn multiply(&self, other: &ChannelVolumes) -> ChannelVolumes {
        assert_eq!(self.channels, other.channels);
        let mut out = *self;
        for (v, &o) in out.values[..self.channels as usize]
            .iter_mut()
            .zip(other.values())
        {
            *v = v.multiply(o);
        }
        out
    }

    /// Per-channel 16.16 fixed-point multipliers for integer paths.
    /// Channels beyond the spec's count are zero.
    pub fn linear_fixed(&self) -> [i32; CHANNELS_MAX] {
        let mut out = [0i32; CHANNELS_MAX];
        for (g, &v) in out.iter_mut().zip(self.values()) {
            *g = v.linear_fixed();
        }
        out
    }

    /// Per-channel float multipliers for float paths.
    pub fn linear_float(&self) -> [f32; CHANNELS_MAX] {
        let mut out = [0f32; CHANNELS_MAX];
        for (g, &v) in out.iter_mut().zip(self.values()) {
            *g = v.linear_float();
        }
        out
    }
}
