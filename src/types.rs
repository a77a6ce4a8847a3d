use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::time::Duration;

use memmap2::Mmap;

use crate::samples::SampleFormat;

/// Fully decoded audio: one normalized f32 buffer per channel.
///
/// Channel buffers are independently owned and equal-length; samples are
/// in [-1, 1] for PCM sources (float sources pass through unclamped).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Per-channel sample buffers, channel 0 first
    pub channel_data: Vec<Vec<f32>>,
}

impl DecodedAudio {
    pub fn num_channels(&self) -> usize {
        self.channel_data.len()
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channel_data.first().map_or(0, Vec::len)
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }
}

impl Display for DecodedAudio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} Hz, {} ch, {} frames, {:.2} s",
            self.sample_rate,
            self.num_channels(),
            self.frames(),
            self.duration().as_secs_f32()
        )
    }
}

/// Options controlling the encode path.
///
/// `bit_depth` is ignored when `floating_point` is set; float output is
/// always stored as 32-bit IEEE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Integer PCM bit depth (8, 16, 24 or 32)
    pub bit_depth: u16,
    /// Store samples as 32-bit IEEE float instead of integer PCM
    pub floating_point: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            sample_rate: 16_000,
            bit_depth: 16,
            floating_point: false,
        }
    }
}

impl EncodeOptions {
    pub fn new(sample_rate: u32) -> Self {
        EncodeOptions {
            sample_rate,
            ..Default::default()
        }
    }

    pub const fn with_bit_depth(mut self, bit_depth: u16) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    pub const fn with_floating_point(mut self, floating_point: bool) -> Self {
        self.floating_point = floating_point;
        self
    }

    /// The effective storage depth after the float override
    pub const fn effective_bit_depth(&self) -> u16 {
        if self.floating_point { 32 } else { self.bit_depth }
    }
}

/// Header-only probe result for a WAV buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: u16,
    /// Bits per sample (8, 16, 24, 32, 64)
    pub bits_per_sample: u16,
    /// Resolved storage format
    pub sample_format: SampleFormat,
    /// Byte rate declared by the fmt chunk
    pub byte_rate: u32,
    /// Bytes per frame (all channels)
    pub block_align: u16,
    /// Whole frames available in the data chunk
    pub frames: usize,
}

impl WavInfo {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames as f64 / self.sample_rate as f64)
    }
}

impl Display for WavInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !f.alternate() {
            return write!(
                f,
                "{} | {} Hz, {} ch, {}-bit, {:.2} s",
                self.sample_format,
                self.sample_rate,
                self.channels,
                self.bits_per_sample,
                self.duration().as_secs_f32()
            );
        }

        writeln!(f, "WAV Info:")?;
        writeln!(f, "├─ Sample Format: {}", self.sample_format)?;
        writeln!(f, "├─ Sample Rate: {} Hz", self.sample_rate)?;
        writeln!(f, "├─ Channels: {}", self.channels)?;
        writeln!(f, "├─ Bits per Sample: {}-bit", self.bits_per_sample)?;
        writeln!(f, "├─ Block Align: {} bytes", self.block_align)?;
        writeln!(f, "├─ Frames: {}", self.frames)?;
        writeln!(f, "└─ Duration: {:.2} s", self.duration().as_secs_f32())
    }
}

/// Unified view over WAV byte storage
#[non_exhaustive]
pub enum AudioDataSource<'a> {
    /// Owned heap-allocated byte buffer
    Owned(Vec<u8>),

    /// Memory-mapped file (zero-copy, OS-backed)
    MemoryMapped(Mmap),

    /// Borrowed byte slice
    Borrowed(&'a [u8]),
}

impl<'a> AudioDataSource<'a> {
    /// Returns the data as a contiguous byte slice
    #[inline]
    pub fn as_bytes(&'a self) -> &'a [u8] {
        match self {
            AudioDataSource::Owned(data) => data.as_slice(),
            AudioDataSource::MemoryMapped(mmap) => mmap.as_ref(),
            AudioDataSource::Borrowed(slice) => slice,
        }
    }

    /// Returns the length of the buffer in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forces this source into an owned buffer
    pub fn into_owned(self) -> Vec<u8> {
        match self {
            AudioDataSource::Owned(data) => data,
            AudioDataSource::Borrowed(slice) => slice.to_vec(),
            AudioDataSource::MemoryMapped(mmap) => mmap.as_ref().to_vec(),
        }
    }

    /// Create a memory-mapped source from a file
    pub fn from_file(file: &File) -> io::Result<Self> {
        let mmap = unsafe { Mmap::map(file)? };
        Ok(AudioDataSource::MemoryMapped(mmap))
    }
}

impl<'a> Deref for AudioDataSource<'a> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl<'a> From<Vec<u8>> for AudioDataSource<'a> {
    fn from(value: Vec<u8>) -> Self {
        AudioDataSource::Owned(value)
    }
}

impl<'a> From<&'a [u8]> for AudioDataSource<'a> {
    fn from(value: &'a [u8]) -> Self {
        AudioDataSource::Borrowed(value)
    }
}

impl<'a> From<Mmap> for AudioDataSource<'a> {
    fn from(value: Mmap) -> Self {
        AudioDataSource::MemoryMapped(value)
    }
}

impl<'a> From<Cow<'a, [u8]>> for AudioDataSource<'a> {
    fn from(value: Cow<'a, [u8]>) -> Self {
        match value {
            Cow::Borrowed(slice) => AudioDataSource::Borrowed(slice),
            Cow::Owned(vec) => AudioDataSource::Owned(vec),
        }
    }
}

impl<'a> AsRef<[u8]> for AudioDataSource<'a> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<'a> Debug for AudioDataSource<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AudioDataSource::Owned(data) => f
                .debug_struct("AudioDataSource::Owned")
                .field("len", &data.len())
                .finish(),
            AudioDataSource::MemoryMapped(mmap) => f
                .debug_struct("AudioDataSource::MemoryMapped")
                .field("len", &mmap.len())
                .finish(),
            AudioDataSource::Borrowed(slice) => f
                .debug_struct("AudioDataSource::Borrowed")
                .field("len", &slice.len())
                .finish(),
        }
    }
}

#[allow(dead_code)]
const fn _assert_send_sync()
where
    AudioDataSource<'static>: Send + Sync,
{
}
