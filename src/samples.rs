//! The sample converter matrix: packed PCM/float bytes ↔ normalized f32.
//!
//! Decode maps stored integers onto [-1, 1] with asymmetric divisors (the
//! negative range divides by the magnitude of the minimum value, the
//! positive range by the maximum), so ±full scale both land exactly on
//! ±1.0. Arithmetic runs in f64 and narrows to f32 on store, which keeps
//! the quantization levels bit-identical across widths.
//!
//! Encode clamps to [-1, 1], applies the inverse divisors, and truncates
//! toward zero. The 8-bit encoder is the one deliberate exception: it
//! packs through the biased midpoint mapping `(v*0.5 + 0.5) * 255` rather
//! than inverting the asymmetric decode, for byte-exact interoperability
//! with existing producers of 8-bit files.

use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{WavCodecError, WavCodecResult};

/// The closed set of storable sample formats.
///
/// This enum is the dispatch table: every `(bit depth, float)` pair the
/// container can request either resolves to one of these variants or
/// fails naming the unsupported key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 8-bit unsigned PCM, stored biased by +128
    Pcm8,
    /// 16-bit signed PCM
    Pcm16,
    /// 24-bit signed PCM, packed as 3 little-endian bytes
    Pcm24,
    /// 32-bit signed PCM
    Pcm32,
    /// 32-bit IEEE float
    F32,
    /// 64-bit IEEE float
    F64,
}

impl SampleFormat {
    /// Resolve a (bit depth, floating point) pair to a converter.
    ///
    /// The error names the computed format key (e.g. `pcm12`) exactly as
    /// requested, so callers can report what the file asked for.
    pub fn from_spec(bit_depth: u16, floating_point: bool) -> WavCodecResult<Self> {
        match (bit_depth, floating_point) {
            (8, false) => Ok(SampleFormat::Pcm8),
            (16, false) => Ok(SampleFormat::Pcm16),
            (24, false) => Ok(SampleFormat::Pcm24),
            (32, false) => Ok(SampleFormat::Pcm32),
            (32, true) => Ok(SampleFormat::F32),
            (64, true) => Ok(SampleFormat::F64),
            _ => Err(WavCodecError::unsupported_sample_format(format!(
                "pcm{}{}",
                bit_depth,
                if floating_point { "f" } else { "" }
            ))),
        }
    }

    /// Canonical format key
    pub const fn as_str(self) -> &'static str {
        match self {
            SampleFormat::Pcm8 => "pcm8",
            SampleFormat::Pcm16 => "pcm16",
            SampleFormat::Pcm24 => "pcm24",
            SampleFormat::Pcm32 => "pcm32",
            SampleFormat::F32 => "pcm32f",
            SampleFormat::F64 => "pcm64f",
        }
    }

    pub const fn bits_per_sample(self) -> u16 {
        match self {
            SampleFormat::Pcm8 => 8,
            SampleFormat::Pcm16 => 16,
            SampleFormat::Pcm24 => 24,
            SampleFormat::Pcm32 | SampleFormat::F32 => 32,
            SampleFormat::F64 => 64,
        }
    }

    pub const fn bytes_per_sample(self) -> usize {
        self.bits_per_sample() as usize / 8
    }

    pub const fn is_float(self) -> bool {
        matches!(self, SampleFormat::F32 | SampleFormat::F64)
    }

    /// Unpack `frames` interleaved frames from `input` into per-channel
    /// buffers.
    ///
    /// `input` must hold at least `frames * output.len()` samples of this
    /// format; each `output[ch]` must hold at least `frames` slots. Both
    /// are guaranteed by the decode walker's frame-count computation.
    pub fn decode_into(self, input: &[u8], output: &mut [Vec<f32>], frames: usize) {
        debug_assert!(input.len() >= frames * output.len() * self.bytes_per_sample());
        match self {
            SampleFormat::Pcm8 => decode_pcm8(input, output, frames),
            SampleFormat::Pcm16 => decode_pcm16(input, output, frames),
            SampleFormat::Pcm24 => decode_pcm24(input, output, frames),
            SampleFormat::Pcm32 => decode_pcm32(input, output, frames),
            SampleFormat::F32 => decode_pcm32f(input, output, frames),
            SampleFormat::F64 => decode_pcm64f(input, output, frames),
        }
    }

    /// Pack per-channel buffers into `output` as interleaved frames.
    ///
    /// `output` must hold exactly `frames * input.len()` samples of this
    /// format; the encode walker allocates it at that size.
    pub fn encode_into(self, input: &[&[f32]], output: &mut [u8], frames: usize) {
        debug_assert_eq!(output.len(), frames * input.len() * self.bytes_per_sample());
        match self {
            SampleFormat::Pcm8 => encode_pcm8(input, output, frames),
            SampleFormat::Pcm16 => encode_pcm16(input, output, frames),
            SampleFormat::Pcm24 => encode_pcm24(input, output, frames),
            SampleFormat::Pcm32 => encode_pcm32(input, output, frames),
            SampleFormat::F32 => encode_pcm32f(input, output, frames),
            SampleFormat::F64 => encode_pcm64f(input, output, frames),
        }
    }
}

impl Display for SampleFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

// Decoders. All widths read frame-major (all channels of frame 0, then
// frame 1, ...) and divide negatives and positives by different scales.

fn decode_pcm8(input: &[u8], output: &mut [Vec<f32>], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in output.iter_mut() {
            let raw = input[pos] as i32 - 128;
            pos += 1;
            let scaled = if raw < 0 {
                raw as f64 / 128.0
            } else {
                raw as f64 / 127.0
            };
            channel[i] = scaled as f32;
        }
    }
}

fn decode_pcm16(input: &[u8], output: &mut [Vec<f32>], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in output.iter_mut() {
            let raw = i16::from_le_bytes([input[pos], input[pos + 1]]);
            pos += 2;
            let scaled = if raw < 0 {
                raw as f64 / 32768.0
            } else {
                raw as f64 / 32767.0
            };
            channel[i] = scaled as f32;
        }
    }
}

fn decode_pcm24(input: &[u8], output: &mut [Vec<f32>], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in output.iter_mut() {
            let unsigned = input[pos] as i32
                | (input[pos + 1] as i32) << 8
                | (input[pos + 2] as i32) << 16;
            pos += 3;
            // Sign extension: 0x800000 is the most negative value, so it
            // must wrap along with everything above it.
            let raw = if unsigned >= 0x80_0000 {
                unsigned - 0x100_0000
            } else {
                unsigned
            };
            let scaled = if raw < 0 {
                raw as f64 / 8_388_608.0
            } else {
                raw as f64 / 8_388_607.0
            };
            channel[i] = scaled as f32;
        }
    }
}

fn decode_pcm32(input: &[u8], output: &mut [Vec<f32>], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in output.iter_mut() {
            let raw = i32::from_le_bytes([
                input[pos],
                input[pos + 1],
                input[pos + 2],
                input[pos + 3],
            ]);
            pos += 4;
            let scaled = if raw < 0 {
                raw as f64 / 2_147_483_648.0
            } else {
                raw as f64 / 2_147_483_647.0
            };
            channel[i] = scaled as f32;
        }
    }
}

fn decode_pcm32f(input: &[u8], output: &mut [Vec<f32>], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in output.iter_mut() {
            channel[i] = f32::from_le_bytes([
                input[pos],
                input[pos + 1],
                input[pos + 2],
                input[pos + 3],
            ]);
            pos += 4;
        }
    }
}

fn decode_pcm64f(input: &[u8], output: &mut [Vec<f32>], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in output.iter_mut() {
            let raw = f64::from_le_bytes([
                input[pos],
                input[pos + 1],
                input[pos + 2],
                input[pos + 3],
                input[pos + 4],
                input[pos + 5],
                input[pos + 6],
                input[pos + 7],
            ]);
            pos += 8;
            channel[i] = raw as f32;
        }
    }
}

// Encoders. Input is clamped to [-1, 1] before scaling; integer widths
// truncate toward zero.

#[inline]
fn clamped(sample: f32) -> f64 {
    (sample as f64).clamp(-1.0, 1.0)
}

fn encode_pcm8(input: &[&[f32]], output: &mut [u8], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in input {
            let v = clamped(channel[i]);
            output[pos] = ((v * 0.5 + 0.5) * 255.0) as u8;
            pos += 1;
        }
    }
}

fn encode_pcm16(input: &[&[f32]], output: &mut [u8], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in input {
            let v = clamped(channel[i]);
            let raw = if v < 0.0 { v * 32768.0 } else { v * 32767.0 } as i16;
            output[pos..pos + 2].copy_from_slice(&raw.to_le_bytes());
            pos += 2;
        }
    }
}

fn encode_pcm24(input: &[&[f32]], output: &mut [u8], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in input {
            let v = clamped(channel[i]);
            // Negatives are pre-wrapped into the unsigned 24-bit range;
            // truncation then packs as the low three bytes, discarding
            // bit 24 when v rounds up to -0 territory.
            let raw = if v < 0.0 {
                16_777_216.0 + v * 8_388_608.0
            } else {
                v * 8_388_607.0
            } as u32;
            output[pos] = raw as u8;
            output[pos + 1] = (raw >> 8) as u8;
            output[pos + 2] = (raw >> 16) as u8;
            pos += 3;
        }
    }
}

fn encode_pcm32(input: &[&[f32]], output: &mut [u8], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in input {
            let v = clamped(channel[i]);
            let raw = if v < 0.0 {
                v * 2_147_483_648.0
            } else {
                v * 2_147_483_647.0
            } as i32;
            output[pos..pos + 4].copy_from_slice(&raw.to_le_bytes());
            pos += 4;
        }
    }
}

fn encode_pcm32f(input: &[&[f32]], output: &mut [u8], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in input {
            let v = clamped(channel[i]) as f32;
            output[pos..pos + 4].copy_from_slice(&v.to_le_bytes());
            pos += 4;
        }
    }
}

fn encode_pcm64f(input: &[&[f32]], output: &mut [u8], frames: usize) {
    let mut pos = 0;
    for i in 0..frames {
        for channel in input {
            let v = clamped(channel[i]);
            output[pos..pos + 8].copy_from_slice(&v.to_le_bytes());
            pos += 8;
        }
    }
}
