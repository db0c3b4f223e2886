//! Multi-page TIFF stacks
//!
//! A stack is one TIFF file with one page per frame. Two stacks describe a
//! recording: a color-coded classification stack (RGB pages) and a gray
//! intensity stack. Per-category masks are written back as 8-bit stacks
//! where foreground is 255.

use crate::{IoError, IoResult};
use plaque_color::convert_to_gray;
use plaque_core::{BinaryField, GrayField, RgbField};
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray8, RGB8};
use tiff::encoder::{Compression, TiffEncoder};

/// Classification and intensity stacks of one recording
#[derive(Debug, Clone)]
pub struct ImageStacks {
    /// Color-coded classification frames
    pub rgb: Vec<RgbField>,
    /// Gray intensity frames
    pub gray: Vec<GrayField>,
}

impl ImageStacks {
    /// Pair two stacks, checking that they line up frame by frame.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::StackMismatch`] if the frame counts differ or a
    /// frame pair differs in size.
    pub fn new(rgb: Vec<RgbField>, gray: Vec<GrayField>) -> IoResult<Self> {
        if rgb.len() != gray.len() {
            return Err(IoError::StackMismatch(format!(
                "{} classification frames but {} intensity frames",
                rgb.len(),
                gray.len()
            )));
        }
        for (i, (c, g)) in rgb.iter().zip(&gray).enumerate() {
            if c.dimensions() != g.dimensions() {
                return Err(IoError::StackMismatch(format!(
                    "frame {}: classification is {:?}, intensity is {:?}",
                    i,
                    c.dimensions(),
                    g.dimensions()
                )));
            }
        }
        Ok(Self { rgb, gray })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.rgb.len()
    }

    /// Whether the stacks hold no frames.
    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }
}

/// Read both stacks of a recording.
pub fn read_stacks<R1, R2>(rgb_reader: R1, gray_reader: R2) -> IoResult<ImageStacks>
where
    R1: Read + Seek,
    R2: Read + Seek,
{
    let rgb = read_rgb_stack(rgb_reader)?;
    let gray = read_gray_stack(gray_reader)?;
    ImageStacks::new(rgb, gray)
}

/// Read every page of a color-coded stack.
///
/// RGB and RGBA pages are accepted (alpha is dropped); 8-bit gray pages
/// are replicated into all three channels.
pub fn read_rgb_stack<R: Read + Seek>(reader: R) -> IoResult<Vec<RgbField>> {
    read_pages(reader, decode_rgb_page)
}

/// Read every page of an intensity stack.
///
/// 8- and 16-bit gray pages are taken as is, so a 16-bit page may carry
/// values above 255; RGB pages are converted to gray.
pub fn read_gray_stack<R: Read + Seek>(reader: R) -> IoResult<Vec<GrayField>> {
    read_pages(reader, decode_gray_page)
}

/// Get the number of pages in a TIFF file
pub fn tiff_page_count<R: Read + Seek>(reader: R) -> IoResult<usize> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let mut count = 1;
    while decoder.more_images() {
        decoder
            .next_image()
            .map_err(|e| IoError::DecodeError(format!("TIFF page navigation error: {}", e)))?;
        count += 1;
    }

    Ok(count)
}

/// Write binary masks as a multi-page 8-bit stack (0 / 255), LZW compressed.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] if `masks` is empty.
pub fn write_mask_stack<W: Write + Seek>(masks: &[&BinaryField], writer: W) -> IoResult<()> {
    if masks.is_empty() {
        return Err(IoError::InvalidData("no pages to write".to_string()));
    }

    let mut encoder = new_encoder(writer)?;
    for mask in masks {
        let data: Vec<u8> = mask.data().iter().map(|&b| if b { 255 } else { 0 }).collect();
        encoder
            .write_image::<Gray8>(mask.width(), mask.height(), &data)
            .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    }
    Ok(())
}

/// Write gray frames as a multi-page 8-bit stack.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] if `frames` is empty or a value does
/// not fit in 8 bits.
pub fn write_gray_stack<W: Write + Seek>(frames: &[&GrayField], writer: W) -> IoResult<()> {
    if frames.is_empty() {
        return Err(IoError::InvalidData("no pages to write".to_string()));
    }

    let mut encoder = new_encoder(writer)?;
    for (page, frame) in frames.iter().enumerate() {
        let data = frame
            .data()
            .iter()
            .map(|&v| u8::try_from(v))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| IoError::InvalidData(format!("page {}: intensity above 255", page)))?;
        encoder
            .write_image::<Gray8>(frame.width(), frame.height(), &data)
            .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    }
    Ok(())
}

/// Write color-coded frames as a multi-page RGB stack.
pub fn write_rgb_stack<W: Write + Seek>(frames: &[&RgbField], writer: W) -> IoResult<()> {
    if frames.is_empty() {
        return Err(IoError::InvalidData("no pages to write".to_string()));
    }

    let mut encoder = new_encoder(writer)?;
    for frame in frames {
        let data: Vec<u8> = frame.data().iter().flatten().copied().collect();
        encoder
            .write_image::<RGB8>(frame.width(), frame.height(), &data)
            .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    }
    Ok(())
}

fn new_encoder<W: Write + Seek>(writer: W) -> IoResult<TiffEncoder<W>> {
    Ok(TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?
        .with_compression(Compression::Lzw))
}

/// Decode every page with `decode`, in file order.
fn read_pages<R, T, F>(reader: R, mut decode: F) -> IoResult<Vec<T>>
where
    R: Read + Seek,
    F: FnMut(&mut Decoder<R>) -> IoResult<T>,
{
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let mut pages = Vec::new();
    loop {
        pages.push(decode(&mut decoder)?);

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| IoError::DecodeError(format!("TIFF page navigation error: {}", e)))?;
    }

    Ok(pages)
}

/// Dimensions, color type and raw samples of the current page
fn read_current_page<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> IoResult<(u32, u32, ColorType, DecodingResult)> {
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;
    let data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;
    Ok((width, height, color_type, data))
}

fn decode_rgb_page<R: Read + Seek>(decoder: &mut Decoder<R>) -> IoResult<RgbField> {
    let (width, height, color_type, data) = read_current_page(decoder)?;

    let pixels: Vec<[u8; 3]> = match (color_type, data) {
        (ColorType::RGB(8), DecodingResult::U8(d)) => {
            d.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect()
        }
        (ColorType::RGBA(8), DecodingResult::U8(d)) => {
            d.chunks_exact(4).map(|p| [p[0], p[1], p[2]]).collect()
        }
        (ColorType::Gray(8), DecodingResult::U8(d)) => d.iter().map(|&v| [v, v, v]).collect(),
        (ct, _) => {
            return Err(IoError::UnsupportedFormat(format!(
                "classification page with color type {:?}",
                ct
            )));
        }
    };

    Ok(RgbField::from_vec(width, height, pixels)?)
}

fn decode_gray_page<R: Read + Seek>(decoder: &mut Decoder<R>) -> IoResult<GrayField> {
    let (width, height, color_type, data) = read_current_page(decoder)?;

    match (color_type, data) {
        (ColorType::Gray(8), DecodingResult::U8(d)) => Ok(GrayField::from_vec(
            width,
            height,
            d.into_iter().map(u16::from).collect(),
        )?),
        (ColorType::Gray(16), DecodingResult::U16(d)) => Ok(GrayField::from_vec(width, height, d)?),
        (ColorType::RGB(8), DecodingResult::U8(d)) => {
            let rgb = RgbField::from_vec(
                width,
                height,
                d.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect(),
            )?;
            Ok(convert_to_gray(&rgb))
        }
        (ct, _) => Err(IoError::UnsupportedFormat(format!(
            "intensity page with color type {:?}",
            ct
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_mask_stack_roundtrip() {
        let a = BinaryField::from_points(4, 3, &[(0, 0), (3, 2)]).unwrap();
        let b = BinaryField::new(4, 3).unwrap();

        let mut buf = Cursor::new(Vec::new());
        write_mask_stack(&[&a, &b], &mut buf).unwrap();

        buf.set_position(0);
        assert_eq!(tiff_page_count(&mut buf).unwrap(), 2);
        buf.set_position(0);
        let pages = read_gray_stack(&mut buf).unwrap();
        assert_eq!(pages[0].get(0, 0), Some(255));
        assert_eq!(pages[0].get(1, 0), Some(0));
        assert_eq!(pages[0].get(3, 2), Some(255));
        assert!(pages[1].data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rgb_page_to_gray() {
        let rgb = RgbField::from_vec(2, 1, vec![[255, 255, 255], [0, 0, 0]]).unwrap();
        let mut buf = Cursor::new(Vec::new());
        write_rgb_stack(&[&rgb], &mut buf).unwrap();

        buf.set_position(0);
        let gray = read_gray_stack(&mut buf).unwrap();
        assert_eq!(gray[0].data(), &[255, 0]);
    }

    #[test]
    fn test_gray_page_as_rgb() {
        let gray = GrayField::from_vec(2, 1, vec![7, 200]).unwrap();
        let mut buf = Cursor::new(Vec::new());
        write_gray_stack(&[&gray], &mut buf).unwrap();

        buf.set_position(0);
        let rgb = read_rgb_stack(&mut buf).unwrap();
        assert_eq!(rgb[0].data(), &[[7, 7, 7], [200, 200, 200]]);
    }

    #[test]
    fn test_write_rejects() {
        let mut buf = Cursor::new(Vec::new());
        assert!(write_mask_stack(&[], &mut buf).is_err());
        let wide = GrayField::from_vec(1, 1, vec![300]).unwrap();
        assert!(matches!(
            write_gray_stack(&[&wide], &mut buf),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_stack_mismatch() {
        let rgb = vec![RgbField::new(2, 2).unwrap()];
        let gray = vec![GrayField::new(2, 2).unwrap(), GrayField::new(2, 2).unwrap()];
        assert!(matches!(
            ImageStacks::new(rgb.clone(), gray),
            Err(IoError::StackMismatch(_))
        ));
        let gray = vec![GrayField::new(3, 2).unwrap()];
        assert!(ImageStacks::new(rgb, gray).is_err());
    }
}
