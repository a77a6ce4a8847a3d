use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    chunks::ByteCursor,
    error::{WavCodecError, WavCodecResult},
    samples::SampleFormat,
};

/// WAV format codes (wFormatTag)
///
/// Only linear PCM and IEEE float are decodable; everything else is
/// carried as `Unknown` so errors can name the rejected tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FormatCode {
    /// PCM (uncompressed)
    Pcm,
    /// IEEE Float
    IeeeFloat,
    /// Unknown or unsupported format
    Unknown(u16),
}

impl FormatCode {
    /// Canonical numeric WAV format tag
    pub const fn as_u16(self) -> u16 {
        match self {
            FormatCode::Pcm => 0x0001,
            FormatCode::IeeeFloat => 0x0003,
            FormatCode::Unknown(code) => code,
        }
    }

    pub const fn const_from(code: u16) -> Self {
        match code {
            0x0001 => FormatCode::Pcm,
            0x0003 => FormatCode::IeeeFloat,
            other => FormatCode::Unknown(other),
        }
    }

    /// Short symbolic name
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatCode::Pcm => "PCM",
            FormatCode::IeeeFloat => "IEEE_FLOAT",
            FormatCode::Unknown(_) => "UNKNOWN",
        }
    }

    /// True if this format represents floating-point samples
    pub const fn is_float(self) -> bool {
        matches!(self, FormatCode::IeeeFloat)
    }
}

impl From<u16> for FormatCode {
    fn from(code: u16) -> Self {
        FormatCode::const_from(code)
    }
}

impl From<FormatCode> for u16 {
    fn from(val: FormatCode) -> Self {
        val.as_u16()
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FormatCode::Unknown(code) => write!(f, "UNKNOWN(0x{:04X})", code),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Parsed contents of the 16-byte base `fmt ` chunk payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtChunk {
    pub format_code: FormatCode,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtChunk {
    /// Size of the base fmt payload this crate reads and writes
    pub const BASE_SIZE: u32 = 16;

    /// Read the fixed-order fmt fields from a cursor positioned at the
    /// start of the chunk payload.
    ///
    /// Format tags other than integer PCM and IEEE float are rejected
    /// here, before any field interpretation happens.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> WavCodecResult<Self> {
        let format_tag = cursor.u16_le("format code")?;
        let format_code = FormatCode::const_from(format_tag);
        if matches!(format_code, FormatCode::Unknown(_)) {
            return Err(WavCodecError::UnsupportedFormatCode(format_tag));
        }

        Ok(FmtChunk {
            format_code,
            channels: cursor.u16_le("channel count")?,
            sample_rate: cursor.u32_le("sample rate")?,
            byte_rate: cursor.u32_le("byte rate")?,
            block_align: cursor.u16_le("block align")?,
            bits_per_sample: cursor.u16_le("bits per sample")?,
        })
    }

    /// Build the fmt fields for an encode run from the resolved format.
    ///
    /// # Errors
    ///
    /// Fails when the block align (`channels * bytes_per_sample`) or the
    /// byte rate (`sample_rate * block_align`) overflows its wire field.
    pub fn for_encode(
        sample_format: SampleFormat,
        channels: u16,
        sample_rate: u32,
    ) -> WavCodecResult<Self> {
        let wide_align = u32::from(channels) * sample_format.bytes_per_sample() as u32;
        let block_align = u16::try_from(wide_align).map_err(|_| {
            WavCodecError::invalid_encode_input(format!(
                "{} channels at {} overflow the container's 16-bit block align field",
                channels, sample_format
            ))
        })?;
        let byte_rate = sample_rate.checked_mul(wide_align).ok_or_else(|| {
            WavCodecError::invalid_encode_input(format!(
                "byte rate for {} channels at {} Hz overflows the container's 32-bit field",
                channels, sample_rate
            ))
        })?;
        Ok(FmtChunk {
            format_code: if sample_format.is_float() {
                FormatCode::IeeeFloat
            } else {
                FormatCode::Pcm
            },
            channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample: sample_format.bits_per_sample(),
        })
    }

    /// Append the 16-byte payload in wire order
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.format_code.as_u16().to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.byte_rate.to_le_bytes());
        out.extend_from_slice(&self.block_align.to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
    }

    pub const fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Resolve the (bit depth, float flag) pair to a registered converter
    pub fn sample_format(&self) -> WavCodecResult<SampleFormat> {
        SampleFormat::from_spec(self.bits_per_sample, self.format_code.is_float())
    }

    /// Validate the consistency of fmt chunk fields
    ///
    /// Checks that:
    /// - no field is zero
    /// - bits_per_sample is byte-aligned
    /// - block_align = channels * bytes_per_sample
    pub fn validate_format_consistency(&self) -> WavCodecResult<()> {
        if self.channels == 0 {
            return Err(WavCodecError::invalid_container_simple(
                "Inconsistent fmt chunk",
                "Channels cannot be zero",
            ));
        }
        if self.sample_rate == 0 {
            return Err(WavCodecError::invalid_container_simple(
                "Inconsistent fmt chunk",
                "Sample rate cannot be zero",
            ));
        }
        if self.block_align == 0 {
            return Err(WavCodecError::invalid_container_simple(
                "Inconsistent fmt chunk",
                "Block align cannot be zero",
            ));
        }
        if self.bits_per_sample == 0 || !self.bits_per_sample.is_multiple_of(8) {
            return Err(WavCodecError::invalid_container_simple(
                "Inconsistent fmt chunk",
                format!(
                    "Bits per sample {} is not byte-aligned",
                    self.bits_per_sample
                ),
            ));
        }

        // Widened so a hostile channel count cannot overflow u16
        let expected_block_align = u32::from(self.channels) * u32::from(self.bytes_per_sample());
        if u32::from(self.block_align) != expected_block_align {
            return Err(WavCodecError::invalid_container_simple(
                "Inconsistent fmt chunk",
                format!(
                    "Block align {} does not match expected {} (channels {} * bytes_per_sample {})",
                    self.block_align,
                    expected_block_align,
                    self.channels,
                    self.bytes_per_sample()
                ),
            ));
        }

        Ok(())
    }
}

impl Display for FmtChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "FmtChunk {{ format: {}, channels: {}, sample_rate: {}, byte_rate: {}, block_align: {}, bits_per_sample: {} }}",
            self.format_code,
            self.channels,
            self.sample_rate,
            self.byte_rate,
            self.block_align,
            self.bits_per_sample
        )
    }
}
