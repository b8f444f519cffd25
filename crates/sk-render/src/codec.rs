//! Lossless snapshot codec for the raster surface.
//!
//! Snapshots store the surface's *premultiplied* RGBA buffer as an 8-bit
//! RGBA PNG stream. Going through a straight-alpha export would
//! demultiply and re-premultiply every anti-aliased edge pixel, which is
//! not bit-exact; storing the buffer as-is is.

use sk_core::{RasterSnapshot, SketchError};

/// Encode a premultiplied RGBA buffer of `width × height` pixels.
pub fn encode(width: u32, height: u32, data: &[u8]) -> Result<RasterSnapshot, SketchError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(SketchError::Surface(format!(
            "buffer is {} bytes, expected {expected}",
            data.len()
        )));
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| SketchError::Surface(format!("snapshot header: {e}")))?;
        writer
            .write_image_data(data)
            .map_err(|e| SketchError::Surface(format!("snapshot data: {e}")))?;
        writer
            .finish()
            .map_err(|e| SketchError::Surface(format!("snapshot finish: {e}")))?;
    }
    Ok(RasterSnapshot::new(width, height, out))
}

/// Decode a snapshot back into its premultiplied RGBA buffer.
pub fn decode(snapshot: &RasterSnapshot) -> Result<Vec<u8>, SketchError> {
    let decoder = png::Decoder::new(&snapshot.bytes[..]);
    let mut reader = decoder
        .read_info()
        .map_err(|e| SketchError::Decode(format!("snapshot header: {e}")))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| SketchError::Decode(format!("snapshot data: {e}")))?;

    if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
        return Err(SketchError::Decode(format!(
            "snapshot has unexpected pixel format {:?}/{:?}",
            info.color_type, info.bit_depth
        )));
    }
    if info.width != snapshot.width || info.height != snapshot.height {
        return Err(SketchError::Decode(format!(
            "snapshot is {}x{}, header says {}x{}",
            info.width, info.height, snapshot.width, snapshot.height
        )));
    }
    buf.truncate(info.buffer_size());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiplied_edge_pixels_survive_exactly() {
        // Values a demultiply/premultiply cycle would perturb.
        let data: Vec<u8> = vec![
            3, 1, 2, 7, //
            0, 0, 0, 0, //
            127, 64, 1, 128, //
            255, 255, 255, 255,
        ];
        let snap = encode(2, 2, &data).unwrap();
        assert_eq!(decode(&snap).unwrap(), data);
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        assert!(matches!(
            encode(2, 2, &[0; 15]),
            Err(SketchError::Surface(_))
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let snap = RasterSnapshot::new(1, 1, vec![1, 2, 3]);
        assert!(matches!(decode(&snap), Err(SketchError::Decode(_))));
    }
}
