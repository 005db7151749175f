//! Animated GIF export of replayed canvases

use std::path::Path;

use image::{Delay, Frame, Luma, Rgba, RgbaImage};

use crate::io::configuration::FINAL_FRAME_HOLD;
use crate::io::error::{Result, StencilError, ensure_same_shape, invalid_parameter};
use crate::io::image::create_parent_dir;
use crate::spatial::Raster;

/// Encode replay frames as an animated GIF
///
/// Every frame is shown for `frame_delay_ms`; the last one is held for
/// `FINAL_FRAME_HOLD` times as long so the finished canvas stays readable.
///
/// # Errors
///
/// Returns an error if:
/// - `frames` is empty or its frames differ in dimensions
/// - File system operations fail
/// - GIF encoding fails
pub fn export_replay_gif(frames: &[Raster], output_path: &Path, frame_delay_ms: u32) -> Result<()> {
    let Some(first) = frames.first() else {
        return Err(invalid_parameter(
            "frames",
            &0,
            &"no frames captured for the replay animation",
        ));
    };
    for frame in frames {
        ensure_same_shape("replay animation", first.shape(), frame.shape())?;
    }

    let last_index = frames.len() - 1;
    let encoded = frames
        .iter()
        .enumerate()
        .map(|(index, raster)| {
            let delay_ms = if index == last_index {
                frame_delay_ms.saturating_mul(FINAL_FRAME_HOLD)
            } else {
                frame_delay_ms
            };
            render_frame(raster, delay_ms)
        })
        .collect::<Result<Vec<Frame>>>()?;

    create_parent_dir(output_path)?;

    let file = std::fs::File::create(output_path).map_err(|e| StencilError::FileSystem {
        path: output_path.to_path_buf(),
        operation: "create file",
        source: e,
    })?;

    let mut encoder = image::codecs::gif::GifEncoder::new(file);
    encoder
        .encode_frames(encoded)
        .map_err(|e| StencilError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

fn render_frame(raster: &Raster, delay_ms: u32) -> Result<Frame> {
    let luma = raster.to_luma()?;
    let mut img = RgbaImage::new(luma.width(), luma.height());

    for (x, y, &Luma([value])) in luma.enumerate_pixels() {
        img.put_pixel(x, y, Rgba([value, value, value, u8::MAX]));
    }

    Ok(Frame::from_parts(
        img,
        0,
        0,
        Delay::from_numer_denom_ms(delay_ms, 1),
    ))
}
