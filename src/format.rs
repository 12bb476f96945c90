use binrw::{BinRead, BinReaderExt, BinWrite, BinWriterExt};
use log::warn;
use std::io::Cursor;

use crate::error::{RepairError, Result};

/// Size of the PCM format block that follows the `fmt ` size field
pub const FORMAT_BLOCK_LEN: usize = 16;

/// PCM format block of a `fmt ` chunk
///
/// ```rust
/// use wavsplice::format::AudioFormatInfo;
///
/// let block: [u8; 16] = [
///     0x01, 0x00, // PCM
///     0x02, 0x00, // stereo
///     0x44, 0xAC, 0x00, 0x00, // 44100 Hz
///     0x10, 0xB1, 0x02, 0x00, // 176400 bytes/s
///     0x04, 0x00, // block align
///     0x10, 0x00, // 16 bits
/// ];
/// let info = AudioFormatInfo::parse(&block).unwrap();
///
/// assert_eq!(info.channels, 2);
/// assert_eq!(info.sample_rate, 44100);
/// assert_eq!(info.frame_size(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct AudioFormatInfo {
    pub audio_format: u16,    // 1 = PCM
    pub channels: u16,        // Interleaved channel count
    pub sample_rate: u32,     // Frames per second
    pub byte_rate: u32,       // sample_rate * block_align
    pub block_align: u16,     // Bytes per frame as declared by the file
    pub bits_per_sample: u16, // Bits per single-channel sample
}

impl AudioFormatInfo {
    /// Build a PCM format block, deriving byte rate and block alignment
    ///
    /// Derived fields saturate at their type's maximum instead of wrapping.
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = (bits_per_sample / 8).saturating_mul(channels);
        AudioFormatInfo {
            audio_format: 1,
            channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(u32::from(block_align)),
            block_align,
            bits_per_sample,
        }
    }

    /// Decode the first 16 bytes of a `fmt ` chunk body
    pub fn parse(body: &[u8]) -> Result<Self> {
        if body.len() < FORMAT_BLOCK_LEN {
            return Err(RepairError::InvalidReferenceFormat(format!(
                "fmt chunk body is {} bytes, need {}",
                body.len(),
                FORMAT_BLOCK_LEN
            )));
        }
        let mut reader = Cursor::new(&body[..FORMAT_BLOCK_LEN]);
        reader
            .read_le()
            .map_err(|e| RepairError::InvalidReferenceFormat(format!("bad fmt chunk: {e}")))
    }

    /// Encode as the 16-byte little-endian format block
    pub fn to_bytes(&self) -> binrw::BinResult<Vec<u8>> {
        let mut writer = Cursor::new(Vec::with_capacity(FORMAT_BLOCK_LEN));
        writer.write_le(self)?;
        Ok(writer.into_inner())
    }

    /// Bytes per frame: one sample for every channel
    pub fn frame_size(&self) -> usize {
        (self.bits_per_sample as usize / 8) * self.channels as usize
    }

    /// Reject format blocks that make frame alignment impossible
    pub fn validate(&self) -> Result<()> {
        let frame_size = self.frame_size();
        if frame_size == 0 {
            return Err(RepairError::MalformedFormatInfo {
                bits_per_sample: self.bits_per_sample,
                channels: self.channels,
            });
        }
        if self.block_align as usize != frame_size {
            warn!(
                "block align {} disagrees with {} bits x {} channels, using frame size {}",
                self.block_align, self.bits_per_sample, self.channels, frame_size
            );
        }
        if self.audio_format != 1 {
            warn!(
                "audio format tag {:#06x} is not plain PCM",
                self.audio_format
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mono_16bit() {
        let bytes = AudioFormatInfo::pcm(1, 44100, 16).to_bytes().unwrap();
        assert_eq!(bytes.len(), FORMAT_BLOCK_LEN);

        let info = AudioFormatInfo::parse(&bytes).unwrap();
        assert_eq!(info.audio_format, 1);
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 44100);
        assert_eq!(info.byte_rate, 88200);
        assert_eq!(info.block_align, 2);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.frame_size(), 2);
    }

    #[test]
    fn test_parse_ignores_extension_bytes() {
        let mut bytes = AudioFormatInfo::pcm(6, 48000, 24).to_bytes().unwrap();
        bytes.extend_from_slice(&[0x16, 0x00, 0xAA, 0xBB]);
        let info = AudioFormatInfo::parse(&bytes).unwrap();
        assert_eq!(info.frame_size(), 18);
    }

    #[test]
    fn test_pcm_saturates_derived_fields() {
        let info = AudioFormatInfo::pcm(u16::MAX, u32::MAX, 32);
        assert_eq!(info.block_align, u16::MAX);
        assert_eq!(info.byte_rate, u32::MAX);
        assert_eq!(info.frame_size(), 4 * u16::MAX as usize);

        let info = AudioFormatInfo::pcm(8, 192_000, 32);
        assert_eq!(info.block_align, 32);
        assert_eq!(info.byte_rate, 6_144_000);
    }

    #[test]
    fn test_parse_short_body() {
        let result = AudioFormatInfo::parse(&[1, 0, 1, 0]);
        assert!(matches!(result, Err(RepairError::InvalidReferenceFormat(_))));
    }

    #[test]
    fn test_validate_zero_frame_size() {
        let info = AudioFormatInfo::pcm(0, 44100, 16);
        assert!(matches!(
            info.validate(),
            Err(RepairError::MalformedFormatInfo { channels: 0, .. })
        ));

        let info = AudioFormatInfo::pcm(2, 44100, 4);
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_validate_tolerates_bad_block_align() {
        let mut info = AudioFormatInfo::pcm(2, 44100, 16);
        info.block_align = 3;
        assert!(info.validate().is_ok());
        assert_eq!(info.frame_size(), 4);
    }
}
