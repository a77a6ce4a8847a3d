//! Decode path: walk the RIFF container, locate `fmt ` and `data`, and
//! unpack the sample region into per-channel float buffers.

use crate::{
    chunks::{ByteCursor, ChunkId, DATA_CHUNK, FMT_CHUNK, RIFF_CHUNK, WAVE_CHUNK},
    error::{ErrorPosition, WavCodecError, WavCodecResult},
    fmt::FmtChunk,
    types::{DecodedAudio, WavInfo},
};

/// Located `data` chunk: the validated format plus the usable byte region
struct DataRegion<'a> {
    fmt: FmtChunk,
    bytes: &'a [u8],
    frames: usize,
}

/// Decode a complete WAV buffer into per-channel normalized floats.
///
/// To decode a sub-range of a larger buffer, pass the sub-slice. Chunks
/// other than `fmt ` and `data` are skipped without interpretation; the
/// walk returns at the first `data` chunk, so anything after it is never
/// visited.
///
/// # Errors
///
/// Fails on missing `RIFF`/`WAVE` magic, a format code other than
/// integer PCM or IEEE float, a `data` chunk with no preceding `fmt `,
/// an unsupported (bit depth, float) pair, a missing `data` chunk, or a
/// buffer too short for its own chunk headers.
pub fn decode(bytes: &[u8]) -> WavCodecResult<DecodedAudio> {
    let region = walk_to_data(bytes)?;
    let format = region.fmt.sample_format()?;
    let channels = region.fmt.channels as usize;

    let mut channel_data = vec![vec![0.0f32; region.frames]; channels];
    format.decode_into(region.bytes, &mut channel_data, region.frames);

    Ok(DecodedAudio {
        sample_rate: region.fmt.sample_rate,
        channel_data,
    })
}

/// Probe a WAV buffer's header without converting any samples.
pub fn info(bytes: &[u8]) -> WavCodecResult<WavInfo> {
    let region = walk_to_data(bytes)?;
    let sample_format = region.fmt.sample_format()?;

    Ok(WavInfo {
        sample_rate: region.fmt.sample_rate,
        channels: region.fmt.channels,
        bits_per_sample: region.fmt.bits_per_sample,
        sample_format,
        byte_rate: region.fmt.byte_rate,
        block_align: region.fmt.block_align,
        frames: region.frames,
    })
}

fn expect_magic(cursor: &mut ByteCursor<'_>, expected: ChunkId, what: &str) -> WavCodecResult<()> {
    let at = cursor.position();
    let found = cursor.chunk_id(what)?;
    if found != expected {
        return Err(WavCodecError::invalid_container(
            "Invalid WAV file",
            format!("expected \"{}\", found \"{}\"", expected, found),
            ErrorPosition::new(at).with_description(what.to_string()),
        ));
    }
    Ok(())
}

/// Single-pass chunk walk ending at the first `data` chunk.
fn walk_to_data(bytes: &[u8]) -> WavCodecResult<DataRegion<'_>> {
    let mut cursor = ByteCursor::new(bytes);

    expect_magic(&mut cursor, RIFF_CHUNK, "RIFF magic")?;
    // The declared file size is not validated against the buffer: the
    // buffer boundary is the source of truth for trimmed inputs.
    let _declared_size = cursor.u32_le("RIFF size")?;
    expect_magic(&mut cursor, WAVE_CHUNK, "WAVE magic")?;

    let mut fmt: Option<FmtChunk> = None;

    while cursor.has_chunk_header() {
        let at = cursor.position();
        let id = cursor.chunk_id("chunk id")?;
        let size = cursor.u32_le("chunk size")? as usize;

        // Chunks are word-aligned on disk; odd sizes carry a pad byte.
        let next = cursor
            .position()
            .checked_add(size)
            .and_then(|n| n.checked_add(size & 1))
            .ok_or_else(|| {
                WavCodecError::invalid_container(
                    "Integer overflow in chunk size calculation",
                    format!("chunk \"{}\" declares {} bytes", id, size),
                    ErrorPosition::new(at + 4).with_description("chunk size field"),
                )
            })?;

        if id == FMT_CHUNK {
            let parsed = FmtChunk::read_from(&mut cursor)?;
            parsed.validate_format_consistency()?;
            fmt = Some(parsed);
        } else if id == DATA_CHUNK {
            let Some(fmt) = fmt else {
                return Err(WavCodecError::MissingFmtChunk);
            };

            let rest = cursor.peek_rest();
            if size > rest.len() {
                return Err(WavCodecError::invalid_container(
                    "Data chunk extends beyond end of buffer",
                    format!("declared {} bytes, {} available", size, rest.len()),
                    ErrorPosition::new(at).with_description("data chunk"),
                ));
            }

            let frames = size / fmt.block_align as usize;
            return Ok(DataRegion {
                fmt,
                bytes: &rest[..size],
                frames,
            });
        }

        cursor.seek_to(next);
    }

    Err(WavCodecError::MissingDataChunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode::encode, types::EncodeOptions};

    fn push_chunk(out: &mut Vec<u8>, id: &[u8; 4], payload: &[u8]) {
        out.extend_from_slice(id);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            out.push(0);
        }
    }

    fn wav_with_chunks(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (id, payload) in chunks {
            push_chunk(&mut body, id, payload);
        }
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&body);
        out
    }

    fn fmt_payload(
        format_code: u16,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Vec<u8> {
        let block_align = channels * (bits_per_sample / 8);
        let byte_rate = sample_rate * block_align as u32;
        let mut payload = Vec::new();
        payload.extend_from_slice(&format_code.to_le_bytes());
        payload.extend_from_slice(&channels.to_le_bytes());
        payload.extend_from_slice(&sample_rate.to_le_bytes());
        payload.extend_from_slice(&byte_rate.to_le_bytes());
        payload.extend_from_slice(&block_align.to_le_bytes());
        payload.extend_from_slice(&bits_per_sample.to_le_bytes());
        payload
    }

    #[test]
    fn test_decode_rejects_bad_riff_magic() {
        let err = decode(b"RIFX\x00\x00\x00\x00WAVE").unwrap_err();
        assert!(err.to_string().contains("Invalid WAV file"));
        assert!(err.to_string().contains("RIFX"));
    }

    #[test]
    fn test_decode_rejects_bad_wave_magic() {
        let bytes = b"RIFF\x04\x00\x00\x00WAVX";
        let err = decode(bytes).unwrap_err();
        assert!(err.to_string().contains("expected \"WAVE\""));
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        let err = decode(b"RI").unwrap_err();
        assert!(err.to_string().contains("Buffer too short"));
    }

    #[test]
    fn test_decode_rejects_data_before_fmt() {
        let bytes = wav_with_chunks(&[(b"data", vec![0u8; 4])]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, WavCodecError::MissingFmtChunk));
    }

    #[test]
    fn test_decode_rejects_missing_data_chunk() {
        let bytes = wav_with_chunks(&[(b"fmt ", fmt_payload(1, 1, 8_000, 16))]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, WavCodecError::MissingDataChunk));
    }

    #[test]
    fn test_decode_rejects_unsupported_format_code() {
        // 0x0002 is ADPCM
        let bytes = wav_with_chunks(&[
            (b"fmt ", fmt_payload(2, 1, 8_000, 4)),
            (b"data", vec![0u8; 4]),
        ]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, WavCodecError::UnsupportedFormatCode(0x0002)));
    }

    #[test]
    fn test_decode_rejects_unsupported_bit_depth() {
        let bytes = wav_with_chunks(&[
            (b"fmt ", fmt_payload(1, 1, 8_000, 48)),
            (b"data", vec![0u8; 6]),
        ]);
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("pcm48"));
    }

    #[test]
    fn test_decode_rejects_overlong_data_chunk() {
        let mut bytes = wav_with_chunks(&[(b"fmt ", fmt_payload(1, 1, 8_000, 16))]);
        // data chunk declaring more bytes than the buffer holds
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("extends beyond end of buffer"));
    }

    #[test]
    fn test_decode_skips_unrecognized_chunks() {
        let data = vec![0x00u8, 0x40, 0x00, 0xC0]; // 16384, -16384
        let plain = wav_with_chunks(&[
            (b"fmt ", fmt_payload(1, 2, 44_100, 16)),
            (b"data", data.clone()),
        ]);
        let with_list = wav_with_chunks(&[
            (b"fmt ", fmt_payload(1, 2, 44_100, 16)),
            (b"LIST", b"INFOISFT\x05\x00\x00\x00tool\x00\x00".to_vec()),
            (b"data", data),
        ]);

        let a = decode(&plain).unwrap();
        let b = decode(&with_list).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.channel_data[0], vec![(16384.0f64 / 32767.0) as f32]);
        assert_eq!(a.channel_data[1], vec![-0.5]);
    }

    #[test]
    fn test_decode_stops_at_first_data_chunk() {
        let bytes = wav_with_chunks(&[
            (b"fmt ", fmt_payload(1, 1, 8_000, 16)),
            (b"data", vec![0x00, 0x40]),
            (b"data", vec![0xFF, 0xFF]),
        ]);
        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.channel_data, vec![vec![(16384.0f64 / 32767.0) as f32]]);
    }

    #[test]
    fn test_decode_partial_trailing_frame_is_dropped() {
        // 5 bytes of 16-bit stereo: one whole frame plus one dangling byte
        let bytes = wav_with_chunks(&[
            (b"fmt ", fmt_payload(1, 2, 8_000, 16)),
            (b"data", vec![0, 0, 0, 0, 0]),
        ]);
        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.frames(), 1);
    }

    #[test]
    fn test_decode_concrete_16_bit_scenario() {
        let channel: Vec<f32> = vec![0.0, 1.0, -1.0, 0.5];
        let bytes = encode(&[channel], &EncodeOptions::new(8_000)).unwrap();
        assert_eq!(bytes.len(), 52);
        assert_eq!(
            u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            8_000,
            "sample rate field"
        );
        assert_eq!(
            u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
            16_000,
            "byte rate field"
        );

        let audio = decode(&bytes).unwrap();
        assert_eq!(audio.sample_rate, 8_000);
        assert_eq!(audio.num_channels(), 1);
        let samples = &audio.channel_data[0];
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 1.0);
        assert_eq!(samples[2], -1.0);
        assert_eq!(samples[3], (16383.0f64 / 32767.0) as f32);
    }

    #[test]
    fn test_info_probe() {
        let channels = vec![vec![0.0f32; 800], vec![0.0f32; 800]];
        let bytes = encode(
            &channels,
            &EncodeOptions::new(8_000).with_floating_point(true),
        )
        .unwrap();

        let probed = info(&bytes).unwrap();
        assert_eq!(probed.sample_rate, 8_000);
        assert_eq!(probed.channels, 2);
        assert_eq!(probed.bits_per_sample, 32);
        assert_eq!(probed.sample_format, crate::samples::SampleFormat::F32);
        assert_eq!(probed.frames, 800);
        assert_eq!(probed.duration(), std::time::Duration::from_millis(100));
    }
}
