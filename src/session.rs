/****************************************************************
 * $ID: session.rs  	Sat 17 Oct 2026 17:26:33+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

//  One "next sample" trigger: select -> preprocess -> infer -> render.

use crate::{error::{CanvasError, InferenceError, TriggerError},
    infer::{Classifier, Inference}, preprocess::{load_raster, preprocess, InputVector},
    selector::{Sample, Selector}, spectrum::{SpectrumConfig, VisualFrame},
};
use image::{imageops::FilterType, DynamicImage};
use std::path::Path;
use tracing::{debug, info, warn};

pub const SPECTRUM_FILE: &str = "spectrum.svg";
pub const THUMBNAIL_FILE: &str = "thumbnail.png";

/// `"<sample>: predicted <digit> (<percent>%)"`
pub fn status_line(sample: &str, digit: usize, confidence: f32) -> String {
    format!("{sample}: predicted {digit} ({:.1}%)", confidence * 100.0)
}

/// Everything the presentation surface shows after a successful trigger.
#[derive(Clone, Debug)] pub struct Update {
    pub sample: Sample,
    pub raster: DynamicImage,
    pub  input: InputVector,
    pub inference: Inference,
    pub frame: VisualFrame,
    pub status: String,
}

impl Update {
    /// Raw sample scaled up without smoothing, the way it shows next to the canvas.
    pub fn thumbnail(&self, size: u32) -> DynamicImage {
        self.raster.resize_exact(size, size, FilterType::Nearest)
    }

    /// The thumbnail goes first: if it can't be written the canvas keeps the previous
    /// sample too, so both files always show the same one.
    pub fn save<P: AsRef<Path>>(&self, dir: P, thumbnail_size: u32) -> Result<(), CanvasError> {
        let dir = dir.as_ref();
        self.thumbnail(thumbnail_size).save(dir.join(THUMBNAIL_FILE))?;
        self.frame.save_svg(dir.join(SPECTRUM_FILE))
    }
}

pub struct Session<C> {
    selector: Selector<Sample>,
    classifier: C,
    layout: SpectrumConfig,
}

impl<C: Classifier> Session<C> {
    pub fn new(selector: Selector<Sample>, classifier: C, layout: SpectrumConfig) -> Self {
        Self { selector, classifier, layout }
    }

    pub fn selector(&self) -> &Selector<Sample> { &self.selector }

    /// Runs the whole pipeline for the next sample. The cursor moves on even if this one
    /// fails, so a broken sample never blocks the rest; nothing is rendered on failure.
    pub fn on_advance(&mut self) -> Result<Update, TriggerError> {
        let sample = self.selector.advance().clone();
        debug!(sample = %sample.name, "advance");

        let raster = load_raster(&sample.path)?;
        let input  = preprocess(&raster)?;
        let inference = self.classifier.infer(&input)?;
        let (digit, confidence) = inference.prediction().ok_or(InferenceError::NoPrediction)?;

        let frame = self.layout.render(input.as_slice(), &inference.hidden, &inference.prob);
        let status = status_line(&sample.name, digit, confidence);
        info!(sample = %sample.name, label = ?sample.label, digit, confidence, "predicted");

        Ok(Update { sample, raster, input, inference, frame, status })
    }

    /// Trigger boundary for a host: the status line on success, the error text otherwise.
    /// Outputs go into `out_dir` when given.
    pub fn trigger(&mut self, out_dir: Option<&Path>, thumbnail_size: u32) -> String {
        let result = self.on_advance().and_then(|update| {
            if let Some(dir) = out_dir { update.save(dir, thumbnail_size)? }
            Ok(update.status)
        });

        result.unwrap_or_else(|err| { warn!("trigger failed: {err}"); format!("error: {err}") })
    }
}
