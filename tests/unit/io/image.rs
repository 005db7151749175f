//! Tests for loading targets and exporting rasters as PNG

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use stencilfit::StencilError;
    use stencilfit::io::image::{create_parent_dir, export_raster_as_png, load_target};
    use stencilfit::spatial::Raster;

    // Tests exported rasters load back pixel for pixel
    // Verified by swapping width and height on export
    #[test]
    fn test_export_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("canvas.png");
        let raster = Raster::from_vec(2, 3, vec![0, 50, 100, 150, 200, 255]).unwrap();

        export_raster_as_png(&raster, &path).unwrap();
        assert_eq!(load_target(&path).unwrap(), raster);
    }

    // Tests color targets are reduced to luma
    // Verified by keeping only the red channel
    #[test]
    fn test_load_converts_color_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.png");
        let mut image = RgbImage::new(4, 2);
        image.put_pixel(0, 0, Rgb([255, 255, 255]));
        image.put_pixel(1, 0, Rgb([0, 0, 255]));
        image.save(&path).unwrap();

        let target = load_target(&path).unwrap();
        assert_eq!(target.shape(), (2, 4));
        assert_eq!(target.get(0, 0), Some(255));
        assert_eq!(target.get(1, 3), Some(0));
        let blue = target.get(0, 1).unwrap();
        assert!(blue > 0 && blue < 64, "blue luma {blue}");
    }

    // Tests unreadable files surface as load errors
    // Verified by returning an empty raster
    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("garbage.png");
        std::fs::write(&garbage, b"definitely not a png").unwrap();

        assert!(matches!(
            load_target(&garbage),
            Err(StencilError::ImageLoad { .. })
        ));
        assert!(matches!(
            load_target(&dir.path().join("missing.png")),
            Err(StencilError::ImageLoad { .. })
        ));
    }

    // Tests empty rasters cannot be exported
    // Verified by letting the encoder reject the image
    #[test]
    fn test_export_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();

        let result = export_raster_as_png(&Raster::filled(0, 0, 0), &dir.path().join("e.png"));
        assert!(matches!(result, Err(StencilError::InvalidParameter { .. })));
    }

    // Tests parent directories are created on demand
    // Verified by creating the file path as a directory
    #[test]
    fn test_create_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("file.png");

        create_parent_dir(&path).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
        assert!(!path.exists());
        assert!(create_parent_dir(std::path::Path::new("bare.png")).is_ok());
    }
}
