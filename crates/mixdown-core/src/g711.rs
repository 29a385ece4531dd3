//! G.711 companding: u-law and A-law expand/compress
//!
//! Ported from the public-domain CCITT G.711 reference arithmetic.
//! Expansion produces 16-bit linear samples; compression takes 14-bit
//! (u-law) or 13-bit (A-law) linear input, so callers shift a 16-bit
//! value right by 2 or 3 before encoding.

const SIGN_BIT: u8 = 0x80;
const QUANT_MASK: u8 = 0x0f;
const SEG_SHIFT: u32 = 4;
const SEG_MASK: u8 = 0x70;

/// Bias added to u-law linear codes.
const BIAS: i16 = 0x84;
/// Largest 14-bit magnitude representable in u-law.
const ULAW_CLIP: i16 = 8159;

const SEG_UEND: [i16; 8] = [0x3f, 0x7f, 0xff, 0x1ff, 0x3ff, 0x7ff, 0xfff, 0x1fff];
const SEG_AEND: [i16; 8] = [0x1f, 0x3f, 0x7f, 0xff, 0x1ff, 0x3ff, 0x7ff, 0xfff];

fn segment(value: i16, table: &[i16; 8]) -> usize {
    table.iter().position(|&end| value <= end).unwrap_or(8)
}

/// Expand one u-law byte to a 16-bit linear sample.
pub(crate) fn ulaw_to_linear16(code: u8) -> i16 {
    let code = !code;
    let mut t = (((code & QUANT_MASK) as i16) << 3) + BIAS;
    t <<= (code & SEG_MASK) >> SEG_SHIFT;
    if code & SIGN_BIT != 0 {
        BIAS - t
    } else {
        t - BIAS
    }
}

/// Compress a 14-bit linear sample to one u-law byte.
pub(crate) fn linear14_to_ulaw(pcm: i16) -> u8 {
    let (mut pcm, mask) = if pcm < 0 {
        ((-(pcm as i32)) as i16, 0x7fu8)
    } else {
        (pcm, 0xffu8)
    };
    if pcm > ULAW_CLIP {
        pcm = ULAW_CLIP;
    }
    pcm += BIAS >> 2;

    let seg = segment(pcm, &SEG_UEND);
    if seg >= 8 {
        return 0x7f ^ mask;
    }
    let code = ((seg as u8) << SEG_SHIFT) | (((pcm >> (seg + 1)) as u8) & QUANT_MASK);
    code ^ mask
}

/// Expand one A-law byte to a 16-bit linear sample.
pub(crate) fn alaw_to_linear16(code: u8) -> i16 {
    let code = code ^ 0x55;
    let mut t = ((code & QUANT_MASK) as i16) << 4;
    let seg = (code & SEG_MASK) >> SEG_SHIFT;
    match seg {
        0 => t += 8,
        1 => t += 0x108,
        _ => {
            t += 0x108;
            t <<= seg - 1;
        }
    }
    if code & SIGN_BIT != 0 {
        t
    } else {
        -t
    }
}

/// Compress a 13-bit linear sample to one A-law byte.
pub(crate) fn linear13_to_alaw(pcm: i16) -> u8 {
    let (pcm, mask) = if pcm >= 0 {
        (pcm, 0xd5u8)
    } else {
        ((-(pcm as i32) - 1) as i16, 0x55u8)
    };

    let seg = segment(pcm, &SEG_AEND);
    if seg >= 8 {
        return 0x7f ^ mask;
    }
    let low = if seg < 2 { pcm >> 1 } else { pcm >> seg };
    let code = ((seg as u8) << SEG_SHIFT) | ((low as u8) & QUANT_MASK);
    code ^ mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulaw_silence_code_is_zero() {
        assert_eq!(ulaw_to_linear16(0xff), 0);
        assert_eq!(linear14_to_ulaw(0), 0xff);
    }

    #[test]
    fn alaw_silence_code() {
        // A-law has no exact zero; the canonical silence code expands
        // to the smallest positive quantization step.
        assert_eq!(alaw_to_linear16(0xd5), 8);
        assert_eq!(linear13_to_alaw(0), 0xd5);
    }

    #[test]
    fn ulaw_full_scale() {
        assert_eq!(ulaw_to_linear16(0x80), 32124);
        assert_eq!(ulaw_to_linear16(0x00), -32124);
        assert_eq!(linear14_to_ulaw(8159), 0x80);
        assert_eq!(linear14_to_ulaw(-8159), 0x00);
        // magnitudes past the clip point saturate to the peak code
        assert_eq!(linear14_to_ulaw(8191), 0x80);
    }

    #[test]
    fn alaw_full_scale() {
        assert_eq!(alaw_to_linear16(0xaa), 32256);
        assert_eq!(alaw_to_linear16(0x2a), -32256);
        assert_eq!(linear13_to_alaw(4032), 0xaa);
        assert_eq!(linear13_to_alaw(-4032), 0x2a);
    }

    #[test]
    fn ulaw_round_trip_all_codes() {
        for code in 0..=0xffu8 {
            let expanded = ulaw_to_linear16(code);
            let back = linear14_to_ulaw(expanded >> 2);
            // 0x7f is the negative-zero code; it expands to 0 which
            // re-encodes as the positive-zero code 0xff
            let expected = if code == 0x7f { 0xff } else { code };
            assert_eq!(back, expected, "code {code:#04x}");
        }
    }

    #[test]
    fn alaw_round_trip_all_codes() {
        for code in 0..=0xffu8 {
            let expanded = alaw_to_linear16(code);
            let back = linear13_to_alaw(expanded >> 3);
            assert_eq!(back, code, "code {code:#04x}");
        }
    }

    #[test]
    fn expansion_is_monotonic_per_sign() {
        // positive codes: 0xff (smallest) down to 0x80 (largest)
        let mut last = ulaw_to_linear16(0xff);
        for code in (0x80..=0xfe).rev() {
            let v = ulaw_to_linear16(code);
            assert!(v > last, "code {code:#04x}");
            last = v;
        }
    }
}
