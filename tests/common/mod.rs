//! Shared helpers for building synthetic WAV files in tests

#![allow(dead_code)]

use wavsplice::format::AudioFormatInfo;

/// Build a WAV file with correct size fields
///
/// `extra` is inserted verbatim between the `fmt ` chunk and the `data` chunk.
pub fn build_wav(format: &AudioFormatInfo, extra: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(44 + extra.len() + payload.len());
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&format.to_bytes().unwrap());
    bytes.extend_from_slice(extra);
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(payload);
    let riff_size = (bytes.len() - 8) as u32;
    bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());
    bytes
}

/// Canonical 44-byte header, mono 16-bit 44.1 kHz
pub fn mono16_wav(payload: &[u8]) -> Vec<u8> {
    build_wav(&AudioFormatInfo::pcm(1, 44100, 16), &[], payload)
}

/// Deterministic audio-like bytes that never contain a chunk marker
pub fn ramp_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 100) as u8 + 0x80).collect()
}

/// Simulate the fixed-window corruption: scrambled prefix plus appended trailer
pub fn ransomware_damage(original: &[u8], prefix: usize, trailer: usize) -> Vec<u8> {
    let mut damaged = original.to_vec();
    let scrambled = prefix.min(damaged.len());
    for (i, byte) in damaged[..scrambled].iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(31) ^ 0x5A;
    }
    damaged.extend(std::iter::repeat(0xEE).take(trailer));
    damaged
}

pub fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}
