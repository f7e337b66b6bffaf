/****************************************************************
 * $ID: lib.rs  	Tue 21 Nov 2023 15:25:27+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

//  select -> preprocess -> infer -> render, once per "next sample"

pub mod error;
pub mod config;
pub mod preprocess;
pub mod selector;
pub mod model;
pub mod infer;
pub mod spectrum;
pub mod session;

pub use self::{config::AppConfig, error::{StartupError, TriggerError},
    infer::{BurnClassifier, Classifier, Inference}, preprocess::InputVector,
    selector::{Sample, Selector}, session::{Session, Update},
    spectrum::{SpectrumConfig, VisualFrame},
};

pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"),
    " (", env!("BUILD_GIT_HASH"), " ", env!("BUILD_TIMESTAMP"), ")");
