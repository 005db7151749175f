//! Target decoding and grayscale PNG export

use std::path::Path;

use crate::io::error::{Result, StencilError, invalid_parameter};
use crate::spatial::Raster;

/// Decode an image file and convert it to 8-bit luma
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_target(path: &Path) -> Result<Raster> {
    let decoded = image::open(path).map_err(|e| StencilError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Raster::from_luma(decoded.into_luma8())
}

/// Export a raster as a grayscale PNG
///
/// # Errors
///
/// Returns an error if:
/// - The raster is empty
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_raster_as_png(raster: &Raster, output_path: &Path) -> Result<()> {
    if raster.is_empty() {
        return Err(invalid_parameter(
            "raster",
            &"0 pixels",
            &"cannot export an empty raster",
        ));
    }

    create_parent_dir(output_path)?;

    raster
        .to_luma()?
        .save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| StencilError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Create the directory an output file will be written into
///
/// # Errors
///
/// Returns an error if the directory cannot be created
pub fn create_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|e| StencilError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}
