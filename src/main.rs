/****************************************************************
 * $ID: main.rs  	Sat 17 Oct 2026 18:10:57+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

use burn::{backend::{wgpu::WgpuDevice, NdArray, Wgpu}, config::Config, tensor::backend::Backend};
use clap::{Args, Parser, Subcommand};
use inspectrum::{model::{self, MlpConfig}, AppConfig, BurnClassifier, Selector, Session};
use std::{error::Error, io::{BufRead, Write}, path::{Path, PathBuf}};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "inspectrum", version = inspectrum::VERSION)]
#[command(about = "Show a digit classifier's input, hidden layer and output as a spectrum")]
struct Cli {
    #[command(subcommand)] command: Option<Command>,
}

#[derive(Subcommand, Debug)] enum Command {
    /// Step through the samples (default)
    Run(RunArgs),
    /// Write a seeded, untrained model artifact
    InitModel(InitArgs),
}

#[derive(Args, Debug, Default)] struct RunArgs {
    /// JSON app config, see `AppConfig`
    #[arg(short, long)] config: Option<PathBuf>,
    /// Model artifact directory
    #[arg(short, long)] model: Option<String>,
    /// Directory holding the sample images
    #[arg(short, long)] samples: Option<String>,
    /// Sample file name, repeat to replace the bundled list
    #[arg(long = "sample")] names: Vec<String>,
    /// Output directory for spectrum.svg and thumbnail.png
    #[arg(short, long)] out: Option<String>,
    /// Run this many triggers then exit, instead of prompting
    #[arg(long)] steps: Option<usize>,
    /// Use the wgpu backend instead of ndarray
    #[arg(long)] wgpu: bool,
}

#[derive(Args, Debug)] struct InitArgs {
    /// Model artifact directory
    #[arg(short, long, default_value = "models/nano_mlp")] model: PathBuf,
    #[arg(long, default_value_t = 42)] seed: u64,
}

fn app_config(args: RunArgs) -> Result<(AppConfig, Option<usize>), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?, None => AppConfig::reference(),
    };

    if let Some(dir) = args.model   { config.model_dir   = dir }
    if let Some(dir) = args.samples { config.samples_dir = dir }
    if let Some(dir) = args.out     { config.output_dir  = dir }
    if !args.names.is_empty() { config.samples = args.names }
    config.wgpu |= args.wgpu;

    config.validate()?;     Ok((config, args.steps))
}

fn start<B: Backend>(config: &AppConfig, device: B::Device, steps: Option<usize>)
    -> Result<(), Box<dyn Error>> {
    let model = model::load::<B>(Path::new(&config.model_dir), &device)?;
    let selector = Selector::from_dir(&config.samples_dir, &config.samples)?;
    let mut session = Session::new(selector,
        BurnClassifier::new(model, device), config.spectrum.clone());

    let out = Path::new(&config.output_dir);
    std::fs::create_dir_all(out)?;
    info!(samples = session.selector().items().len(), out = %out.display(), "ready");

    let mut trigger = || println!("{}", session.trigger(Some(out), config.thumbnail_size));
    trigger();  // the first sample shows up right away

    if let Some(steps) = steps {
        (1..steps).for_each(|_| trigger());     return Ok(())
    }

    let (stdin, mut stdout) = (std::io::stdin(), std::io::stdout());
    let mut line = String::new();
    loop {
        print!("[Enter] next sample, q to quit> ");     stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 { break }

        match line.trim() {
            "q" | "quit" | "exit" => break,
            _ => trigger(),
        }
    }   Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into())).init();

    match Cli::parse().command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => {
            let (config, steps) = app_config(args)?;
            if config.wgpu {
                start::<Wgpu>(&config, WgpuDevice::default(), steps)
            } else { start::<NdArray>(&config, Default::default(), steps) }
        }
        Command::InitModel(args) =>
            model::init_artifact::<NdArray>(&args.model, &MlpConfig::new(), args.seed,
                &Default::default()),
    }
}
