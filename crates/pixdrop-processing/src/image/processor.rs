//! Image processor - decoding and dimension probing

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// ISO-BMFF brands identifying an AVIF file
const AVIF_BRANDS: [&[u8; 4]; 2] = [b"avif", b"avis"];

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode image bytes, guessing the format from the content rather than any filename.
    pub fn decode(data: &[u8]) -> Result<DynamicImage> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .context("Failed to read image header")?;

        if reader.format().is_none() {
            return Err(anyhow!("Unrecognized image format"));
        }

        reader.decode().context("Failed to decode image")
    }

    /// Read width and height from encoded image bytes without a full decode.
    pub fn read_dimensions(data: &[u8]) -> Result<(u32, u32)> {
        if Self::is_avif(data) {
            return Self::read_avif_dimensions(data);
        }

        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .context("Failed to read image header")?
            .into_dimensions()
            .context("Failed to read image dimensions")
    }

    /// Whether `data` starts with an ISO-BMFF `ftyp` box carrying an AVIF brand
    pub fn is_avif(data: &[u8]) -> bool {
        data.len() >= 12
            && &data[4..8] == b"ftyp"
            && AVIF_BRANDS.iter().any(|brand| &data[8..12] == *brand)
    }

    /// Dimensions from the `ispe` (image spatial extents) property at
    /// `meta/iprp/ipco/ispe`. The first `ispe` belongs to the primary color item.
    fn read_avif_dimensions(data: &[u8]) -> Result<(u32, u32)> {
        let meta = find_box(data, b"meta")?.ok_or_else(|| anyhow!("AVIF file has no meta box"))?;
        // meta is a full box: skip version and flags
        let meta = meta
            .get(4..)
            .ok_or_else(|| anyhow!("AVIF meta box is truncated"))?;
        let iprp = find_box(meta, b"iprp")?.ok_or_else(|| anyhow!("AVIF file has no iprp box"))?;
        let ipco = find_box(iprp, b"ipco")?.ok_or_else(|| anyhow!("AVIF file has no ipco box"))?;
        let ispe = find_box(ipco, b"ispe")?.ok_or_else(|| anyhow!("AVIF file has no ispe box"))?;

        // version/flags (4), width (u32 BE), height (u32 BE)
        let width = read_u32(ispe, 4)?;
        let height = read_u32(ispe, 8)?;

        if width == 0 || height == 0 {
            return Err(anyhow!("AVIF ispe box reports empty dimensions"));
        }

        Ok((width, height))
    }
}

/// Payload of the first box of type `wanted` among the sibling boxes in `data`.
fn find_box<'a>(mut data: &'a [u8], wanted: &[u8; 4]) -> Result<Option<&'a [u8]>> {
    while !data.is_empty() {
        let size = read_u32(data, 0)? as u64;
        let box_type = data
            .get(4..8)
            .ok_or_else(|| anyhow!("AVIF box header is truncated"))?;

        let (header_len, size) = match size {
            0 => (8, data.len() as u64),
            1 => (16, read_u64(data, 8)?),
            n => (8, n),
        };
        if size < header_len as u64 || size > data.len() as u64 {
            return Err(anyhow!("AVIF box size {} is out of range", size));
        }
        let size = size as usize;

        if box_type == wanted {
            return Ok(Some(&data[header_len..size]));
        }
        data = &data[size..];
    }
    Ok(None)
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or_else(|| anyhow!("AVIF box is truncated"))?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let high = read_u32(data, offset)? as u64;
    let low = read_u32(data, offset + 4)? as u64;
    Ok((high << 32) | low)
}
