/****************************************************************
 * $ID: preprocess.rs  	Fri 16 Oct 2026 10:30:05+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

//  Raster -> normalized model input, and the inverse used for display.

use crate::error::PreprocessError;
use image::DynamicImage;
use std::path::Path;

pub const IMAGE_SIDE: usize = 28;
pub const INPUT_SIZE: usize = IMAGE_SIDE * IMAGE_SIDE;

// values mean=0.1307,std=0.3081 are from the PyTorch MNIST example, the external model
// was trained with them: https://github.com/pytorch/examples/blob/54f4572509891883a947411fd7239237dd2a39c3/mnist/main.py#L122
pub const MEAN: f32 = 0.1307;
pub const  STD: f32 = 0.3081;

#[inline] pub fn normalize(brightness: f32) -> f32 { (brightness - MEAN) / STD }

/// Back to displayable brightness, clamped into [0, 1].
#[inline] pub fn denormalize(value: f32) -> f32 { (value * STD + MEAN).clamp(0.0, 1.0) }

/// HSB "value" of an 8-bit RGB pixel: the brightest channel.
#[inline] pub fn brightness(rgb: [u8; 3]) -> f32 {
    rgb.into_iter().max().unwrap_or(0) as f32 / 255.0
}

/// Model input: 784 normalized values in row-major 28x28 order (index = row * 28 + col).
#[derive(Clone, Debug, PartialEq)] pub struct InputVector(Vec<f32>);

impl InputVector {
    /// Wraps already normalized values, `None` unless exactly 784 of them.
    pub fn from_normalized(values: Vec<f32>) -> Option<Self> {
        (values.len() == INPUT_SIZE).then_some(Self(values))
    }

    pub fn as_slice(&self) -> &[f32] { &self.0 }
}

pub fn preprocess(image: &DynamicImage) -> Result<InputVector, PreprocessError> {
    let (width, height) = (image.width(), image.height());
    if width as usize != IMAGE_SIDE || height as usize != IMAGE_SIDE {
        return Err(PreprocessError::ShapeMismatch { width, height, expected: IMAGE_SIDE as _ });
    }

    let rgb = image.to_rgb8();
    let mut data = Vec::with_capacity(INPUT_SIZE);
    for y in 0..IMAGE_SIDE as u32 {
        for x in 0..IMAGE_SIDE as u32 {
            data.push(normalize(brightness(rgb.get_pixel(x, y).0)));
        }
    }   Ok(InputVector(data))
}

/// Reads and decodes a sample raster; a missing file is reported apart from a broken one.
pub fn load_raster<P: AsRef<Path>>(path: P) -> Result<DynamicImage, PreprocessError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound =>
            PreprocessError::AssetMissing { path: path.to_path_buf(), source },
        _ => PreprocessError::Read { path: path.to_path_buf(), source },
    })?;
    decode_raster(&bytes)
}

pub fn decode_raster(bytes: &[u8]) -> Result<DynamicImage, PreprocessError> {
    Ok(image::load_from_memory(bytes)?)
}

#[cfg(test)] mod tests {
use super::*;
use image::{GrayImage, Luma, Rgb, RgbImage};

#[test] fn normalize_round_trip() {
    for i in 0..=1000 {
        let b = i as f32 / 1000.0;
        assert!((denormalize(normalize(b)) - b).abs() < 1e-5, "b = {b}");
    }
    assert_eq!(denormalize(normalize(-0.5)), 0.0);
    assert_eq!(denormalize(normalize( 1.5)), 1.0);
}

#[test] fn row_major_order() -> Result<(), Box<dyn std::error::Error>> {
    let image = GrayImage::from_fn(28, 28, |x, y| Luma([match (x, y) {
        (27, 0) => 255, (0, 1) => 128, _ => 0 }]));
    let input = preprocess(&DynamicImage::ImageLuma8(image))?;

    assert_eq!(input.as_slice().len(), INPUT_SIZE);
    assert_eq!(input.as_slice()[0],  normalize(0.0));
    assert_eq!(input.as_slice()[27], normalize(1.0));
    assert_eq!(input.as_slice()[28], normalize(128.0 / 255.0));
    assert_eq!(input.as_slice()[29], normalize(0.0));   Ok(())
}

#[test] fn mid_gray() -> Result<(), Box<dyn std::error::Error>> {
    // 0.5 brightness is not representable in 8 bits, go through the value path directly
    let expected = (0.5 - 0.1307) / 0.3081;
    assert!((normalize(0.5) - expected).abs() < 1e-5);
    assert!((normalize(0.5) - 1.1978).abs() < 1e-3);

    let image = GrayImage::from_pixel(28, 28, Luma([128]));
    let input = preprocess(&DynamicImage::ImageLuma8(image))?;
    let first = input.as_slice()[0];
    assert!(input.as_slice().iter().all(|&v| v == first));
    assert!((denormalize(first) - 128.0 / 255.0).abs() < 1e-5);  Ok(())
}

#[test] fn color_pixel_uses_max_channel() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(brightness([10, 200, 30]), 200.0 / 255.0);

    let image = RgbImage::from_pixel(28, 28, Rgb([255, 0, 0]));
    let input = preprocess(&DynamicImage::ImageRgb8(image))?;
    assert!(input.as_slice().iter().all(|&v| v == normalize(1.0)));   Ok(())
}

#[test] fn shape_mismatch() {
    for (w, h) in [(27, 28), (28, 29), (56, 56), (0, 0)] {
        let image = DynamicImage::ImageLuma8(GrayImage::new(w, h));
        match preprocess(&image) {
            Err(PreprocessError::ShapeMismatch { width, height, expected: 28 }) =>
                assert_eq!((width, height), (w, h)),
            other => panic!("expected shape mismatch for {w}x{h}, got {other:?}"),
        }
    }
}

#[test] fn input_vector_length() {
    assert!(InputVector::from_normalized(vec![0.0; 783]).is_none());
    assert!(InputVector::from_normalized(vec![0.0; 784]).is_some());
}

#[test] fn missing_and_broken_rasters() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    assert!(matches!(load_raster(dir.path().join("nope.png")),
        Err(PreprocessError::AssetMissing { .. })));
    // a directory exists but can't be read as a raster, that's not "missing"
    match load_raster(dir.path()) {
        Err(err @ PreprocessError::Read { .. }) =>
            assert!(!err.to_string().contains("not found"), "{err}"),
        other => panic!("expected a read error, got {other:?}"),
    }

    let broken = dir.path().join("broken.png");
    std::fs::write(&broken, b"not a png")?;
    assert!(matches!(load_raster(&broken), Err(PreprocessError::Decode(_))));

    let good = dir.path().join("3_0.png");
    GrayImage::from_pixel(28, 28, Luma([255])).save(&good)?;
    let input = preprocess(&load_raster(&good)?)?;
    assert!(input.as_slice().iter().all(|&v| v == normalize(1.0)));   Ok(())
}

}
