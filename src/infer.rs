/****************************************************************
 * $ID: infer.rs  	Sat 17 Oct 2026 14:05:52+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

use crate::{error::InferenceError, model::{Mlp, HIDDEN_SIZE, NUM_CLASSES},
    preprocess::{InputVector, IMAGE_SIDE}};
use burn::tensor::{backend::Backend, Tensor, TensorData};

/// Named outputs of one inference call, batch size 1.
#[derive(Clone, Debug, PartialEq)] pub struct Inference {
    pub   prob: Vec<f32>,   // NUM_CLASSES
    pub hidden: Vec<f32>,   // HIDDEN_SIZE
}

impl Inference {
    pub fn new(prob: Vec<f32>, hidden: Vec<f32>) -> Result<Self, InferenceError> {
        check_len("prob", &prob, NUM_CLASSES)?;
        check_len("hidden", &hidden, HIDDEN_SIZE)?;     Ok(Self { prob, hidden })
    }

    /// Most probable class and its probability; the first one wins a tie.
    /// Non-finite entries never win, `None` if nothing else is left.
    pub fn prediction(&self) -> Option<(usize, f32)> {
        self.prob.iter().enumerate().filter(|(_, p)| p.is_finite())
            .fold(None, |best, (i, &p)| match best {
                Some((_, max)) if max >= p => best, _ => Some((i, p)) })
    }
}

fn check_len(name: &'static str, values: &[f32], expected: usize) -> Result<(), InferenceError> {
    if values.len() == expected { Ok(()) } else {
        Err(InferenceError::OutputShape { name, actual: values.len(), expected })
    }
}

/// Opaque inference capability: tensor in, named tensors out.
pub trait Classifier {
    fn infer(&self, input: &InputVector) -> Result<Inference, InferenceError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn infer(&self, input: &InputVector) -> Result<Inference, InferenceError> {
        (**self).infer(input)
    }
}

pub struct BurnClassifier<B: Backend> { model: Mlp<B>, device: B::Device, }

impl<B: Backend> BurnClassifier<B> {
    pub fn new(model: Mlp<B>, device: B::Device) -> Self { Self { model, device } }
}

fn into_vec<B: Backend>(name: &'static str, tensor: Tensor<B, 2>)
    -> Result<Vec<f32>, InferenceError> {
    match tensor.dims() {
        [1, _] => tensor.into_data().to_vec::<f32>()
            .map_err(|err| InferenceError::Data(format!("{name}: {err:?}"))),
        [batch, _] => Err(InferenceError::Data(format!("{name}: batch size {batch}, expected 1"))),
    }
}

impl<B: Backend> Classifier for BurnClassifier<B> {
    fn infer(&self, input: &InputVector) -> Result<Inference, InferenceError> {
        let data = TensorData::new(input.as_slice().to_vec(), [1, 1, IMAGE_SIDE, IMAGE_SIDE]);
        let output = self.model.forward(Tensor::<B, 4>::from_data(data, &self.device));

        // tensors are owned here, whatever path returns drops them
        Inference::new(into_vec("prob", output.prob)?, into_vec("hidden", output.hidden)?)
    }
}
