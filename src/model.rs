/****************************************************************
 * $ID: model.rs  	Fri 16 Oct 2026 11:40:18+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

//  The nano MLP whose hidden layer is put on display.
//  Artifact layout: <dir>/config.json (MlpConfig) + <dir>/model.mpk (CompactRecorder)

use crate::{error::StartupError, preprocess::INPUT_SIZE};
use burn::{config::Config, module::Module,
    nn::{Linear, LinearConfig, Relu}, record::{CompactRecorder, Recorder},
    tensor::{activation::softmax, backend::Backend, Tensor},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const  HIDDEN_SIZE: usize = 32;
pub const NUM_CLASSES: usize = 10;

#[derive(Module, Debug)] pub struct Mlp<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    activation: Relu,
}

/// Both named outputs of one forward pass.
#[derive(Clone, Debug)] pub struct MlpOutput<B: Backend> {
    pub hidden: Tensor<B, 2>,   // [batch_size, hidden_size]
    pub   prob: Tensor<B, 2>,   // [batch_size, num_classes]
}

impl<B: Backend> Mlp<B> {
    /// # Shapes
    ///   - Images [batch_size, 1, height, width]
    ///   - Output hidden [batch_size, hidden_size], prob [batch_size, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> MlpOutput<B> {
        let [batch_size, channels, height, width] = images.dims();

        let x = images.reshape([batch_size, channels * height * width]);
        let x = self.fc1.forward(x);
        let hidden = self.activation.forward(x);

        let logits = self.fc2.forward(hidden.clone());
        MlpOutput { hidden, prob: softmax(logits, 1) }
    }

    /// The record may disagree with its config.json, so look at the weights themselves.
    pub fn check_contract(&self) -> Result<(), StartupError> {
        let [input, hidden] = self.fc1.weight.val().dims();     // [d_input, d_output]
        let [hidden_in, classes] = self.fc2.weight.val().dims();
        check_sizes([("input size", input, INPUT_SIZE), ("hidden size", hidden, HIDDEN_SIZE),
            ("hidden size", hidden_in, HIDDEN_SIZE), ("class count", classes, NUM_CLASSES)])
    }
}

fn check_sizes<const N: usize>(sizes: [(&'static str, usize, usize); N])
    -> Result<(), StartupError> {
    sizes.into_iter().try_for_each(|(what, actual, expected)| if actual == expected { Ok(()) }
        else { Err(StartupError::ModelShape { what, actual, expected }) })
}

#[derive(Config, Debug)] pub struct MlpConfig {
    #[config(default = 784)] pub  input_size: usize,
    #[config(default =  32)] pub hidden_size: usize,
    #[config(default =  10)] pub num_classes: usize,
}

impl MlpConfig {  // Returns the initialized model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Mlp<B> { Mlp {
        fc1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
        fc2: LinearConfig::new(self.hidden_size, self.num_classes).init(device),
        activation: Relu::new(),
    } }

    /// The visualization is laid out for exactly 784 -> 32 -> 10.
    pub fn check_contract(&self) -> Result<(), StartupError> {
        check_sizes([("input size", self.input_size, INPUT_SIZE),
            ("hidden size", self.hidden_size, HIDDEN_SIZE),
            ("class count", self.num_classes, NUM_CLASSES)])
    }
}

fn config_path(artifact_dir: &Path) -> PathBuf { artifact_dir.join("config.json") }
fn record_path(artifact_dir: &Path) -> PathBuf { artifact_dir.join("model") }

pub fn load<B: Backend>(artifact_dir: &Path, device: &B::Device)
    -> Result<Mlp<B>, StartupError> {
    let (path, record) = (config_path(artifact_dir), record_path(artifact_dir));
    for file in [path.clone(), record.with_extension("mpk")] {
        if !file.is_file() { return Err(StartupError::ModelMissing(file)) }
    }

    let config = MlpConfig::load(&path)
        .map_err(|source| StartupError::ModelConfig { path: path.clone(), source })?;
    config.check_contract()?;   debug!(?config, "model config");

    let record = CompactRecorder::new().load(record.clone(), device)
        .map_err(|source| StartupError::ModelRecord { path: record, source })?;
    let model = config.init::<B>(device).load_record(record);
    model.check_contract()?;

    info!(dir = %artifact_dir.display(), "model loaded");   Ok(model)
}

/// Writes a freshly initialized artifact; no training happens here.
pub fn init_artifact<B: Backend>(artifact_dir: &Path, config: &MlpConfig, seed: u64,
    device: &B::Device) -> Result<(), Box<dyn std::error::Error>> {
    config.check_contract()?;
    std::fs::create_dir_all(artifact_dir).and_then(|_|
        config.save(config_path(artifact_dir)))?;
    B::seed(seed);

    config.init::<B>(device).save_file(record_path(artifact_dir), &CompactRecorder::new())?;
    info!(dir = %artifact_dir.display(), seed, "model artifact written");   Ok(())
}

#[cfg(test)] mod tests {
use super::*;
use burn::backend::NdArray;

type TestBackend = NdArray<f32>;

#[test] fn forward_shapes() {
    let device = Default::default();
    let model = MlpConfig::new().init::<TestBackend>(&device);
    let output = model.forward(Tensor::zeros([2, 1, 28, 28], &device));

    assert_eq!(output.hidden.dims(), [2, HIDDEN_SIZE]);
    assert_eq!(output.prob.dims(), [2, NUM_CLASSES]);
    let sums = output.prob.sum_dim(1).into_data().to_vec::<f32>().unwrap_or_default();
    assert_eq!(sums.len(), 2);
    assert!(sums.iter().all(|s| (s - 1.0).abs() < 1e-4));
}

#[test] fn hidden_is_rectified() {
    let device = Default::default();
    let model = MlpConfig::new().init::<TestBackend>(&device);
    let output = model.forward(Tensor::ones([1, 1, 28, 28], &device) * 2.5);
    let hidden = output.hidden.into_data().to_vec::<f32>().unwrap_or_default();
    assert_eq!(hidden.len(), HIDDEN_SIZE);
    assert!(hidden.iter().all(|&h| h >= 0.0));
}

#[test] fn contract_mismatch() {
    assert!(MlpConfig::new().check_contract().is_ok());
    assert!(matches!(MlpConfig::new().with_hidden_size(64).check_contract(),
        Err(StartupError::ModelShape { what: "hidden size", actual: 64, expected: 32 })));
}

#[test] fn weight_sizes_are_checked() {
    let device = Default::default();
    assert!(MlpConfig::new().init::<TestBackend>(&device).check_contract().is_ok());

    let wide = MlpConfig::new().with_hidden_size(64).init::<TestBackend>(&device);
    assert!(matches!(wide.check_contract(),
        Err(StartupError::ModelShape { what: "hidden size", actual: 64, expected: 32 })));
    let narrow = MlpConfig::new().with_input_size(100).init::<TestBackend>(&device);
    assert!(matches!(narrow.check_contract(),
        Err(StartupError::ModelShape { what: "input size", actual: 100, expected: 784 })));
}

#[test] fn artifact_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let (dir, device) = (tempfile::tempdir()?, Default::default());
    init_artifact::<TestBackend>(dir.path(), &MlpConfig::new(), 42, &device)?;
    assert!(dir.path().join("config.json").is_file());
    assert!(dir.path().join("model.mpk").is_file());

    let model = load::<TestBackend>(dir.path(), &device)?;
    let output = model.forward(Tensor::zeros([1, 1, 28, 28], &device));
    assert_eq!(output.prob.dims(), [1, NUM_CLASSES]);   Ok(())
}

#[test] fn missing_artifact() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let result = load::<TestBackend>(dir.path(), &Default::default());
    assert!(matches!(result, Err(StartupError::ModelMissing(path)) if path.ends_with("config.json")));

    MlpConfig::new().save(dir.path().join("config.json"))?;
    let result = load::<TestBackend>(dir.path(), &Default::default());
    assert!(matches!(result, Err(StartupError::ModelMissing(path)) if path.ends_with("model.mpk")));
    Ok(())
}

}
