//! Bidirectional codec between RIFF/WAVE buffers and in-memory
//! multichannel normalized float audio.
//!
//! [`decode`] walks a complete WAV byte buffer and returns one `Vec<f32>`
//! per channel with samples in [-1, 1]; [`encode`] does the inverse,
//! producing a canonical 44-byte-header WAV buffer. Only linear PCM
//! (8/16/24/32-bit) and IEEE float (32/64-bit) data are handled; all
//! other chunk types are skipped without interpretation.
//!
//! # Example
//!
//! ```
//! use wav_codec::{decode, encode, EncodeOptions};
//!
//! let left = vec![0.0f32, 0.5, -0.5, 1.0];
//! let right = vec![1.0f32, -1.0, 0.25, 0.0];
//!
//! let bytes = encode(&[left, right], &EncodeOptions::new(44_100))?;
//! let audio = decode(&bytes)?;
//! assert_eq!(audio.sample_rate, 44_100);
//! assert_eq!(audio.num_channels(), 2);
//! # Ok::<(), wav_codec::WavCodecError>(())
//! ```

// Correctness and logic
#![warn(clippy::unit_cmp)]
#![warn(clippy::match_same_arms)]
#![allow(clippy::result_large_err)] // Allow large error types for comprehensive error handling
#![allow(clippy::identity_op)] // Explicit operations for clarity
// Performance-focused
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::map_clone)]
#![warn(clippy::unnecessary_to_owned)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::needless_collect)]
// Style and idiomatic Rust
#![warn(clippy::needless_return)]
#![warn(clippy::manual_map)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
// Maintainability
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::missing_safety_doc)]

pub mod chunks;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fmt;
pub mod samples;
pub mod types;

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

pub use crate::{
    decode::decode,
    encode::encode,
    error::{WavCodecError, WavCodecResult},
    fmt::{FmtChunk, FormatCode},
    samples::SampleFormat,
    types::{AudioDataSource, DecodedAudio, EncodeOptions, WavInfo},
};

pub(crate) const MAX_WAV_SIZE: u64 = 2 * 1024 * 1024 * 1024; // 2GB limit
pub(crate) const MAX_MMAP_SIZE: u64 = 512 * 1024 * 1024; // 512MB for memory mapping

fn open_source(path: &Path) -> WavCodecResult<AudioDataSource<'static>> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();

    if file_size > MAX_WAV_SIZE {
        return Err(WavCodecError::invalid_container_simple(
            "File too large",
            format!(
                "File size {} exceeds maximum {} bytes",
                file_size, MAX_WAV_SIZE
            ),
        ));
    }

    if file_size <= MAX_MMAP_SIZE {
        Ok(AudioDataSource::from_file(&file)?)
    } else {
        // Fallback to buffered read for large files
        let mut buf_reader = BufReader::new(file);
        let mut bytes = Vec::new();
        buf_reader.read_to_end(&mut bytes)?;
        Ok(AudioDataSource::Owned(bytes))
    }
}

/// Decode a WAV file from disk.
///
/// Small files are memory-mapped; larger ones fall back to a buffered
/// read. The decode itself is identical to [`decode`] over the bytes.
pub fn read<P: AsRef<Path>>(path: P) -> WavCodecResult<DecodedAudio> {
    let source = open_source(path.as_ref())?;
    decode(source.as_bytes())
}

/// Encode per-channel float buffers and write the result to disk.
pub fn write<P: AsRef<Path>, C: AsRef<[f32]>>(
    path: P,
    channel_data: &[C],
    options: &EncodeOptions,
) -> WavCodecResult<()> {
    let bytes = encode(channel_data, options)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

/// Probe a WAV file's header from disk without converting samples.
pub fn info<P: AsRef<Path>>(path: P) -> WavCodecResult<WavInfo> {
    let source = open_source(path.as_ref())?;
    decode::info(source.as_bytes())
}
