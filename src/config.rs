/****************************************************************
 * $ID: config.rs  	Sat 17 Oct 2026 16:48:09+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

use crate::{error::StartupError, selector::REFERENCE_SAMPLES, spectrum::SpectrumConfig};
use burn::config::Config;

#[derive(Config, Debug)] pub struct AppConfig {
    /// Holds `config.json` + `model.mpk`.
    pub model_dir: String,
    pub samples_dir: String,
    /// Sample file names under `samples_dir`, cycled in this order.
    pub samples: Vec<String>,
    /// Where `spectrum.svg` and `thumbnail.png` land after each trigger.
    pub output_dir: String,
    pub spectrum: SpectrumConfig,
    #[config(default = "false")] pub wgpu: bool,
    #[config(default = 100)] pub thumbnail_size: u32,
}

impl AppConfig {
    /// Layout of the bundled demo: `models/nano_mlp`, `images/*.png`, results into `out`.
    pub fn reference() -> Self {
        Self::new("models/nano_mlp".into(), "images".into(),
            REFERENCE_SAMPLES.iter().map(|&name| name.into()).collect(),
            "out".into(), SpectrumConfig::new())
    }

    pub fn validate(&self) -> Result<(), StartupError> {
        if self.samples.is_empty() { return Err(StartupError::NoSamples) }
        if self.thumbnail_size == 0 {
            return Err(StartupError::AppConfig("thumbnail_size must be positive".into()))
        }

        let layout = &self.spectrum;
        if !(layout.width > 0.0 && layout.height > 0.0) {
            return Err(StartupError::AppConfig(format!(
                "canvas must have a positive size, got {}x{}", layout.width, layout.height)))
        }
        if !(layout.cell_size > 0.0 && layout.bar_width > 0.0 && layout.prob_bar_height > 0.0) {
            return Err(StartupError::AppConfig("cell and bar sizes must be positive".into()))
        }   Ok(())
    }
}
