/****************************************************************
 * $ID: selector.rs  	Fri 16 Oct 2026 11:02:47+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

use crate::error::StartupError;
use std::path::{Path, PathBuf};

/// File names of the bundled samples, `<index>_<label>.png`.
pub const REFERENCE_SAMPLES: [&str; 10] = [
    "0_7.png", "1_2.png", "2_1.png", "3_0.png", "4_4.png",
    "5_1.png", "6_4.png", "7_9.png", "8_5.png", "9_9.png",
];

#[derive(Clone, Debug, PartialEq, Eq)] pub struct Sample {
    pub name: String,
    pub path: PathBuf,
    /// Ground truth embedded in the file name, for display only.
    pub label: Option<u8>,
}

impl Sample {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.file_name().map(|name|
            name.to_string_lossy().into_owned()).unwrap_or_default();
        Self { label: parse_label(&name), name, path }
    }
}

/// `7_9.png` -> Some(9); anything not shaped like that -> None.
pub fn parse_label(name: &str) -> Option<u8> {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let (_, label) = stem.rsplit_once('_')?;
    match label.as_bytes() { [d @ b'0'..=b'9'] => Some(d - b'0'), _ => None }
}

/// Endless round-robin over a fixed, non-empty list.
#[derive(Clone, Debug)] pub struct Selector<T> { items: Vec<T>, cursor: usize, }

impl<T> Selector<T> {
    pub fn new(items: Vec<T>) -> Result<Self, StartupError> {
        if items.is_empty() { return Err(StartupError::NoSamples) }
        Ok(Self { items, cursor: 0 })
    }

    pub fn items(&self) -> &[T] { &self.items }

    /// Index of the item the next call hands out.
    pub fn cursor(&self) -> usize { self.cursor }

    pub fn advance(&mut self) -> &T {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.items.len();
        &self.items[index]
    }
}

impl Selector<Sample> {
    pub fn from_dir<P: AsRef<Path>, S: AsRef<str>>(dir: P, names: &[S])
        -> Result<Self, StartupError> {
        Self::new(names.iter().map(|name| Sample::new(dir.as_ref().join(name.as_ref()))).collect())
    }
}

impl<T: Clone> Iterator for Selector<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> { Some(self.advance().clone()) }
}
