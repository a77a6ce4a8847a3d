//! Encode path: compute the output size, emit the canonical 44-byte
//! header, then pack the channel buffers into the data region.

use crate::{
    error::{WavCodecError, WavCodecResult},
    fmt::FmtChunk,
    samples::SampleFormat,
    types::EncodeOptions,
};

/// Fixed header size: 12-byte RIFF header + 8-byte fmt header + 16-byte
/// fmt payload + 8-byte data header
pub const HEADER_SIZE: usize = 44;

/// Encode per-channel float buffers into a complete WAV byte buffer.
///
/// Channel buffers must be equal-length; samples outside [-1, 1] are
/// clamped, not rejected. The output is allocated at its exact final
/// size and never reallocated.
///
/// # Errors
///
/// Fails when no converter exists for the resolved (bit depth, float)
/// pair, when no channels are supplied, or when channel buffers have
/// mismatched lengths. No bytes are produced on failure.
pub fn encode<C: AsRef<[f32]>>(
    channel_data: &[C],
    options: &EncodeOptions,
) -> WavCodecResult<Vec<u8>> {
    // Resolve the converter before committing to any allocation.
    let format = SampleFormat::from_spec(options.effective_bit_depth(), options.floating_point)?;

    if channel_data.is_empty() {
        return Err(WavCodecError::invalid_encode_input(
            "at least one channel is required",
        ));
    }
    if channel_data.len() > u16::MAX as usize {
        return Err(WavCodecError::invalid_encode_input(format!(
            "{} channels exceed the container's 16-bit channel field",
            channel_data.len()
        )));
    }

    let channels: Vec<&[f32]> = channel_data.iter().map(AsRef::as_ref).collect();
    let frames = channels[0].len();
    for (index, channel) in channels.iter().enumerate() {
        if channel.len() != frames {
            return Err(WavCodecError::invalid_encode_input(format!(
                "channel {} has {} samples, expected {}",
                index,
                channel.len(),
                frames
            )));
        }
    }

    let data_len = frames
        .checked_mul(channels.len())
        .and_then(|n| n.checked_mul(format.bytes_per_sample()))
        .filter(|n| n + HEADER_SIZE <= u32::MAX as usize)
        .ok_or_else(|| {
            WavCodecError::invalid_encode_input(format!(
                "{} frames x {} channels at {} do not fit a RIFF container",
                frames,
                channels.len(),
                format
            ))
        })?;
    let total_len = HEADER_SIZE + data_len;

    let fmt = FmtChunk::for_encode(format, channels.len() as u16, options.sample_rate)?;

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((total_len - 8) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FmtChunk::BASE_SIZE.to_le_bytes());
    fmt.write_to(&mut out);

    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());

    debug_assert_eq!(out.len(), HEADER_SIZE);
    out.resize(total_len, 0);
    format.encode_into(&channels, &mut out[HEADER_SIZE..], frames);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn test_encode_header_layout() {
        let channel = vec![0.0f32; 100];
        let bytes = encode(&[channel], &EncodeOptions::default()).unwrap();

        assert_eq!(bytes.len(), 44 + 200);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(
            u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize,
            bytes.len() - 8
        );
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]), 16);
        assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 0x0001);
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 1);
        assert_eq!(
            u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            16_000
        );
        assert_eq!(
            u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
            32_000
        );
        assert_eq!(u16::from_le_bytes([bytes[32], bytes[33]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(
            u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]) as usize,
            bytes.len() - 44
        );
    }

    #[test]
    fn test_encode_float_sets_ieee_format_code() {
        let channel = vec![0.25f32; 8];
        let bytes = encode(
            &[channel],
            &EncodeOptions::new(48_000).with_floating_point(true),
        )
        .unwrap();
        assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 0x0003);
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 32);
    }

    #[test]
    fn test_encode_float_overrides_bit_depth() {
        let channel = vec![0.0f32; 2];
        let options = EncodeOptions::new(8_000)
            .with_bit_depth(24)
            .with_floating_point(true);
        let bytes = encode(&[channel], &options).unwrap();
        // 2 frames x 4 bytes, not 3
        assert_eq!(bytes.len(), 44 + 8);
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 32);
    }

    #[test]
    fn test_encode_rejects_unsupported_bit_depth() {
        let channel = vec![0.0f32; 2];
        let err = encode(&[channel], &EncodeOptions::new(8_000).with_bit_depth(12)).unwrap_err();
        assert!(err.to_string().contains("pcm12"));
    }

    #[test]
    fn test_encode_rejects_empty_channel_list() {
        let none: [&[f32]; 0] = [];
        let err = encode(&none, &EncodeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("at least one channel"));
    }

    #[test]
    fn test_encode_rejects_mismatched_channel_lengths() {
        let left = vec![0.0f32; 4];
        let right = vec![0.0f32; 3];
        let err = encode(&[left, right], &EncodeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("channel 1 has 3 samples, expected 4"));
    }

    #[test]
    fn test_encode_rejects_byte_rate_overflow() {
        // 65535 one-byte channels at 70 kHz overflow the u32 byte rate
        let channels = vec![vec![0.0f32]; u16::MAX as usize];
        let err = encode(
            &channels,
            &EncodeOptions::new(70_000).with_bit_depth(8),
        )
        .unwrap_err();
        assert!(err.to_string().contains("byte rate"));
    }

    #[test]
    fn test_encode_zero_frames_yields_header_only() {
        let channel: Vec<f32> = Vec::new();
        let bytes = encode(&[channel], &EncodeOptions::default()).unwrap();
        assert_eq!(bytes.len(), 44);
        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.frames(), 0);
        assert_eq!(audio.num_channels(), 1);
    }

    #[test]
    fn test_float_roundtrip_is_bit_exact() {
        let left = vec![0.0f32, 0.1, -0.1, 1.0, -1.0, 0.333_333_3];
        let right = vec![0.9f32, -0.9, 0.000_001, -0.000_001, 0.5, -0.5];
        let bytes = encode(
            &[left.clone(), right.clone()],
            &EncodeOptions::new(44_100).with_floating_point(true),
        )
        .unwrap();

        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.sample_rate, 44_100);
        assert_eq!(audio.channel_data, vec![left, right]);
    }

    #[test]
    fn test_integer_roundtrip_within_one_quantization_step() {
        let samples: Vec<f32> = (0..1000).map(|i| ((i as f32) / 500.0) - 1.0).collect();
        for bit_depth in [8u16, 16, 24, 32] {
            let step = 2.0 / (1u64 << bit_depth) as f64;
            // f32 rounding on decode dominates the quantization step at
            // 32 bits, so the tolerance floors at one f32 ulp of 1.0.
            let tolerance = (2.0 * step).max(1e-6) as f32;
            let bytes = encode(
                &[samples.clone()],
                &EncodeOptions::new(8_000).with_bit_depth(bit_depth),
            )
            .unwrap();
            let audio = decode(&bytes).unwrap();
            for (original, decoded) in samples.iter().zip(&audio.channel_data[0]) {
                assert!(
                    (original - decoded).abs() <= tolerance,
                    "{}-bit roundtrip drifted: {} vs {}",
                    bit_depth,
                    original,
                    decoded
                );
            }
        }
    }

    #[test]
    fn test_eight_bit_roundtrip_keeps_full_scale() {
        let samples = vec![-1.0f32, 1.0];
        let bytes = encode(&[samples], &EncodeOptions::new(8_000).with_bit_depth(8)).unwrap();
        assert_eq!(&bytes[44..46], &[0x00, 0xFF]);
        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.channel_data[0], vec![-1.0, 1.0]);
    }

    #[test]
    fn test_24_bit_negative_full_scale_roundtrip() {
        let samples = vec![-1.0f32, 1.0 - f32::EPSILON];
        let bytes = encode(&[samples], &EncodeOptions::new(8_000).with_bit_depth(24)).unwrap();
        assert_eq!(&bytes[44..47], &[0x00, 0x00, 0x80]);
        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.channel_data[0][0], -1.0);
        assert!(audio.channel_data[0][1] > 0.999_999);
    }
}
