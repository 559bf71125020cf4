//! PNG-in-ICO container encoding.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! header     reserved: u16 = 0, type: u16 = 1, count: u16
//! entry × N  width: u8, height: u8 (0 means 256), colors: u8 = 0,
//!            reserved: u8 = 0, planes: u16 = 1, bpp: u16 = 32,
//!            data size: u32, data offset: u32
//! payloads   PNG bytes, concatenated in entry order
//! ```

use crate::error::{FaviconError, Result};

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const ICON_TYPE: u16 = 1;

/// One PNG-encoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoFrame {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl IcoFrame {
    pub fn square(size: u32, png: Vec<u8>) -> Self {
        Self {
            width: size,
            height: size,
            png,
        }
    }
}

/// Dimension byte for a directory entry: `0` stands for 256 and above.
fn dimension_byte(value: u32) -> u8 {
    if value >= 256 { 0 } else { value as u8 }
}

/// Packs the frames into an ICO file, preserving their order.
pub fn encode(frames: &[IcoFrame]) -> Result<Vec<u8>> {
    let count = u16::try_from(frames.len())
        .map_err(|_| FaviconError::encoding("favicon.ico", "too many frames"))?;

    let payload_len: usize = frames.iter().map(|f| f.png.len()).sum();
    let directory_len = HEADER_LEN + ENTRY_LEN * frames.len();
    let mut out = Vec::with_capacity(directory_len + payload_len);

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&ICON_TYPE.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());

    let mut offset = directory_len;
    for frame in frames {
        let size = u32::try_from(frame.png.len())
            .map_err(|_| FaviconError::encoding("favicon.ico", "frame larger than 4 GiB"))?;
        let data_offset = u32::try_from(offset)
            .map_err(|_| FaviconError::encoding("favicon.ico", "file larger than 4 GiB"))?;

        out.push(dimension_byte(frame.width));
        out.push(dimension_byte(frame.height));
        out.push(0); // palette size
        out.push(0); // reserved
        out.extend_from_slice(&1u16.to_le_bytes()); // planes
        out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());

        offset += frame.png.len();
    }

    for frame in frames {
        out.extend_from_slice(&frame.png);
    }

    Ok(out)
}

// ============================================================================
// Reading
// ============================================================================

/// A parsed directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoEntry {
    /// Decoded width, with `0` mapped back to 256.
    pub width: u32,
    pub height: u32,
    pub color_count: u8,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub size: u32,
    pub offset: u32,
}

impl IcoEntry {
    /// The payload of this entry inside `bytes`, if it is in bounds.
    pub fn data<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.offset as usize;
        let end = start.checked_add(self.size as usize)?;
        bytes.get(start..end)
    }
}

/// Parses the header and directory of an ICO file.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<IcoEntry>> {
    let malformed = |reason: &str| FaviconError::decode("ICO data", reason);

    let header = bytes
        .get(..HEADER_LEN)
        .ok_or_else(|| malformed("truncated header"))?;
    let reserved = u16::from_le_bytes([header[0], header[1]]);
    let kind = u16::from_le_bytes([header[2], header[3]]);
    let count = u16::from_le_bytes([header[4], header[5]]) as usize;

    if reserved != 0 || kind != ICON_TYPE {
        return Err(malformed("not an icon file"));
    }

    (0..count)
        .map(|i| {
            let start = HEADER_LEN + i * ENTRY_LEN;
            let e = bytes
                .get(start..start + ENTRY_LEN)
                .ok_or_else(|| malformed("truncated directory"))?;

            let dimension = |b: u8| if b == 0 { 256 } else { u32::from(b) };
            Ok(IcoEntry {
                width: dimension(e[0]),
                height: dimension(e[1]),
                color_count: e[2],
                planes: u16::from_le_bytes([e[4], e[5]]),
                bits_per_pixel: u16::from_le_bytes([e[6], e[7]]),
                size: u32::from_le_bytes([e[8], e[9], e[10], e[11]]),
                offset: u32::from_le_bytes([e[12], e[13], e[14], e[15]]),
            })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
