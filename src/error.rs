/****************************************************************
 * $ID: error.rs  	Fri 16 Oct 2026 10:12:31+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

use std::path::PathBuf;

/// Fatal before the first trigger: the model or the app config can't be brought up.
#[derive(thiserror::Error, Debug)] pub enum StartupError {
    #[error("model artifact not found: {}", .0.display())] ModelMissing(PathBuf),
    #[error("failed to load model config {}: {source}", path.display())]
    ModelConfig { path: PathBuf, source: burn::config::ConfigError },
    #[error("failed to load model record {}: {source}", path.display())]
    ModelRecord { path: PathBuf, source: burn::record::RecorderError },
    #[error("model contract mismatch: {what} is {actual}, expected {expected}")]
    ModelShape { what: &'static str, actual: usize, expected: usize },
    #[error("invalid app config: {0}")] AppConfig(String),
    #[error("no samples to cycle through")] NoSamples,
}

/// Raster could not be turned into an input vector.
#[derive(thiserror::Error, Debug)] pub enum PreprocessError {
    #[error("sample raster not found: {}", path.display())]
    AssetMissing { path: PathBuf, source: std::io::Error },
    #[error("cannot read sample raster {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot decode sample raster: {0}")] Decode(#[from] image::ImageError),
    #[error("raster is {width}x{height}, expected {expected}x{expected}")]
    ShapeMismatch { width: u32, height: u32, expected: u32 },
}

/// The inference engine failed for one call.
#[derive(thiserror::Error, Debug)] pub enum InferenceError {
    #[error("tensor data conversion failed: {0}")] Data(String),
    #[error("output `{name}` has {actual} values, expected {expected}")]
    OutputShape { name: &'static str, actual: usize, expected: usize },
    #[error("no finite class probability in the output")] NoPrediction,
}

#[derive(thiserror::Error, Debug)] pub enum CanvasError {
    #[error("svg drawing failed: {0}")] Draw(String),
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("cannot write thumbnail: {0}")] Thumbnail(#[from] image::ImageError),
}

/// Everything that may abort a single "next sample" trigger; never fatal.
#[derive(thiserror::Error, Debug)] pub enum TriggerError {
    #[error(transparent)] Preprocess(#[from] PreprocessError),
    #[error("inference failed: {0}")] Inference(#[from] InferenceError),
    #[error(transparent)] Canvas(#[from] CanvasError),
}
