//! PNG in, PNG out.

use anyhow::{bail, Context, Result};
use halftone_core::types::Frame;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub fn load_png(path: &Path) -> Result<Frame> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    decode_png(BufReader::new(file)).with_context(|| format!("decode {}", path.display()))
}

pub fn save_png(path: &Path, frame: &Frame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    encode_png(BufWriter::new(file), frame).with_context(|| format!("encode {}", path.display()))
}

/// Decode any 8 or 16 bit PNG into opaque 0xFFRRGGBB pixels. Alpha is
/// dropped; the effect only reads color.
pub fn decode_png<R: Read>(input: R) -> Result<Frame> {
    let mut decoder = png::Decoder::new(input);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => bail!("palette was not expanded"),
    };
    let row_len = info.line_size;

    let mut frame = Frame::new(info.width, info.height);
    for (y, row) in bytes.chunks(row_len).take(info.height as usize).enumerate() {
        for (x, px) in row
            .chunks_exact(channels)
            .take(info.width as usize)
            .enumerate()
        {
            let (r, g, b) = if channels < 3 {
                (px[0], px[0], px[0])
            } else {
                (px[0], px[1], px[2])
            };
            frame.pixels[y * info.width as usize + x] =
                0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32;
        }
    }
    Ok(frame)
}

/// Encode as 8 bit RGB.
pub fn encode_png<W: Write>(output: W, frame: &Frame) -> Result<()> {
    if frame.is_empty() {
        bail!("cannot encode an empty {}x{} image", frame.width, frame.height);
    }
    let mut encoder = png::Encoder::new(output, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut data = Vec::with_capacity(frame.pixels.len() * 3);
    for p in &frame.pixels {
        data.push((p >> 16) as u8);
        data.push((p >> 8) as u8);
        data.push(*p as u8);
    }
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}
