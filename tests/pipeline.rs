/****************************************************************
 * $ID: pipeline.rs  	Sat 17 Oct 2026 19:02:14+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

use burn::backend::NdArray;
use image::{GrayImage, Luma};
use inspectrum::{model::{self, MlpConfig}, preprocess::{denormalize, INPUT_SIZE},
    selector::REFERENCE_SAMPLES, spectrum::Rgb, AppConfig, BurnClassifier, Selector, Session,
    StartupError};

#[test] fn reference_samples_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let config = AppConfig::reference();
    let (models, images) = (root.path().join(&config.model_dir), root.path().join(&config.samples_dir));
    std::fs::create_dir_all(&images)?;
    for name in REFERENCE_SAMPLES {     // synthetic mid-gray digits
        GrayImage::from_pixel(28, 28, Luma([128])).save(images.join(name))?;
    }

    let device = Default::default();
    model::init_artifact::<NdArray>(&models, &MlpConfig::new(), 7, &device)?;
    let classifier = BurnClassifier::new(model::load::<NdArray>(&models, &device)?, device);
    let mut session = Session::new(Selector::from_dir(&images, &config.samples)?,
        classifier, config.spectrum.clone());

    for (i, name) in REFERENCE_SAMPLES.iter().chain(&REFERENCE_SAMPLES[..1]).enumerate() {
        let update = session.on_advance()?;
        assert_eq!(update.sample.name, *name, "trigger {i}");
        assert!(update.status.starts_with(&format!("{name}: predicted ")));
        assert!(update.status.ends_with("%)"));

        let input = update.input.as_slice();
        assert_eq!(input.len(), INPUT_SIZE);
        assert!(input.iter().all(|&v| (v - (128.0 / 255.0 - 0.1307) / 0.3081).abs() < 1e-4));
        assert!((denormalize(input[0]) - 128.0 / 255.0).abs() < 1e-5);

        let rects = update.frame.rects().collect::<Vec<_>>();
        assert!(rects[..INPUT_SIZE].iter().all(|r| r.4 == Rgb(128, 128, 128)));
        let hidden = &rects[INPUT_SIZE..INPUT_SIZE + 32];
        assert!(hidden.iter().all(|r| (0.0..=150.0).contains(&r.3)));
    }

    let out = root.path().join("out");
    std::fs::create_dir_all(&out)?;
    let status = session.trigger(Some(&out), config.thumbnail_size);
    assert!(status.starts_with("1_2.png: predicted "), "{status}");
    assert!(out.join("spectrum.svg").is_file() && out.join("thumbnail.png").is_file());
    Ok(())
}

#[test] fn contract_mismatch_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    use burn::config::Config;
    let dir = tempfile::tempdir()?;
    model::init_artifact::<NdArray>(dir.path(), &MlpConfig::new(), 1, &Default::default())?;
    MlpConfig::new().with_num_classes(12).save(dir.path().join("config.json"))?;

    let result = model::load::<NdArray>(dir.path(), &Default::default());
    assert!(matches!(result, Err(StartupError::ModelShape { what: "class count", .. })));
    Ok(())
}

#[test] fn mismatched_weights_are_fatal() -> Result<(), Box<dyn std::error::Error>> {
    use burn::{config::Config, module::Module, record::CompactRecorder};
    let (dir, device) = (tempfile::tempdir()?, Default::default());
    // weights of a 784 -> 64 -> 10 net filed under the regular 784 -> 32 -> 10 config
    MlpConfig::new().with_hidden_size(64).init::<NdArray>(&device)
        .save_file(dir.path().join("model"), &CompactRecorder::new())?;
    MlpConfig::new().save(dir.path().join("config.json"))?;

    let result = model::load::<NdArray>(dir.path(), &device);
    assert!(matches!(result,
        Err(StartupError::ModelShape { what: "hidden size", actual: 64, expected: 32 })));
    Ok(())
}
