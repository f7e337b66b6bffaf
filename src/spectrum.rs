/****************************************************************
 * $ID: spectrum.rs  	Sat 17 Oct 2026 15:21:40+0800               *
 *                                                              *
 * Maintainer: 范美辉 (MeiHui FAN) <mhfan@ustc.edu>              *
 * Copyright (c) 2023 M.H.Fan, All rights reserved.             *
 ****************************************************************/

//  Maps (input, hidden, prob) onto one canvas, drawn left to right:
//  a 28x28 gray grid, 32 upward bars, 10 stacked horizontal bars.

use crate::{error::CanvasError, preprocess::{denormalize, IMAGE_SIDE}};
use burn::config::Config;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)] pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
    pub const   RED: Self = Self(255, 0, 0);
    pub const LIME_GREEN: Self = Self(50, 205, 50);

    /// `intensity` in [0, 1], out of range saturates.
    pub fn gray(intensity: f32) -> Self {
        let v = unit_to_u8(intensity);  Self(v, v, v)
    }

    /// Hue in degrees, saturation and brightness in [0, 1].
    pub fn hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        let chroma = brightness * saturation;
        let sector = hue.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0), 1 => (x, chroma, 0.0), 2 => (0.0, chroma, x),
            3 => (0.0, x, chroma), 4 => (x, 0.0, chroma), _ => (chroma, 0.0, x),
        };
        let m = brightness - chroma;
        Self(unit_to_u8(r + m), unit_to_u8(g + m), unit_to_u8(b + m))
    }
}

#[inline] fn unit_to_u8(v: f32) -> u8 { (v.clamp(0.0, 1.0) * 255.0).round() as u8 }

#[derive(Clone, Debug, PartialEq)] pub enum Primitive {
    Rect  { x: f32, y: f32, w: f32, h: f32, color: Rgb },
    /// Anchored at the text baseline's left end.
    Label { text: String, x: f32, y: f32, color: Rgb },
}

/// One full redraw of the canvas, in painting order.
#[derive(Clone, Debug, PartialEq)] pub struct VisualFrame {
    pub  width: f32,
    pub height: f32,
    pub background: Rgb,
    pub primitives: Vec<Primitive>,
}

impl VisualFrame {
    pub fn rects(&self) -> impl Iterator<Item = (f32, f32, f32, f32, Rgb)> + '_ {
        self.primitives.iter().filter_map(|p| match *p {
            Primitive::Rect { x, y, w, h, color } => Some((x, y, w, h, color)), _ => None })
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, f32, f32)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { text, x, y, .. } => Some((text.as_str(), *x, *y)), _ => None })
    }
}

pub const  INPUT_TITLE: &str = "Input Layer (784)";
pub const HIDDEN_TITLE: &str = "Hidden Layer (32 Features)";
pub const OUTPUT_TITLE: &str = "Output Layer (10)";

/// Canvas layout, in the canvas' own length unit.
#[derive(Config, Debug)] pub struct SpectrumConfig {
    #[config(default = 800.0)] pub  width: f32,
    #[config(default = 300.0)] pub height: f32,
    #[config(default =  20.0)] pub title_y: f32,

    #[config(default = 50.0)] pub input_x: f32,
    #[config(default = 50.0)] pub input_y: f32,
    #[config(default =  5.0)] pub cell_size: f32,

    #[config(default = 350.0)] pub hidden_x: f32,
    #[config(default = 200.0)] pub baseline: f32,
    #[config(default =   8.0)] pub bar_width: f32,
    #[config(default =   2.0)] pub bar_gap: f32,
    #[config(default =  30.0)] pub bar_scale: f32,
    #[config(default = 150.0)] pub max_bar_height: f32,
    #[config(default = 180.0)] pub hidden_hue: f32,
    #[config(default =   0.8)] pub hidden_saturation: f32,

    #[config(default = 650.0)] pub output_x: f32,
    #[config(default =  50.0)] pub output_y: f32,
    #[config(default =  15.0)] pub prob_bar_height: f32,
    #[config(default =   5.0)] pub prob_bar_gap: f32,
    #[config(default = 100.0)] pub prob_scale: f32,
    #[config(default =   0.5)] pub high_threshold: f32,
    #[config(default =  40.0)] pub digit_label_offset: f32,
    #[config(default =  12.0)] pub digit_label_dy: f32,
}

impl SpectrumConfig {
    /// Upward bar height, capped at the maximum; negative activations draw nothing.
    pub fn hidden_bar_height(&self, val: f32) -> f32 {
        (val * self.bar_scale).max(0.0).min(self.max_bar_height)
    }

    /// Brighter with magnitude, regardless of sign.
    pub fn hidden_color(&self, val: f32) -> Rgb {
        Rgb::hsb(self.hidden_hue, self.hidden_saturation, (0.3 + val.abs() * 0.2).min(1.0))
    }

    pub fn output_bar_width(&self, prob: f32) -> f32 { (prob * self.prob_scale).max(0.0) }

    pub fn output_color(&self, prob: f32) -> Rgb {
        if prob > self.high_threshold { Rgb::RED } else { Rgb::LIME_GREEN }
    }

    pub fn render(&self, input: &[f32], hidden: &[f32], prob: &[f32]) -> VisualFrame {
        let mut primitives = Vec::with_capacity(input.len() + hidden.len() + prob.len() * 2 + 3);
        let title = |text: &str, x| Primitive::Label {
            text: text.to_owned(), x, y: self.title_y, color: Rgb::WHITE };
        primitives.extend([title(INPUT_TITLE, self.input_x),
            title(HIDDEN_TITLE, self.hidden_x), title(OUTPUT_TITLE, self.output_x)]);

        let size = self.cell_size;
        primitives.extend(input.iter().enumerate().map(|(i, &val)| {
            let (row, col) = (i / IMAGE_SIDE, i % IMAGE_SIDE);
            Primitive::Rect { x: self.input_x + col as f32 * size,
                y: self.input_y + row as f32 * size, w: size, h: size,
                color: Rgb::gray(denormalize(val)) }
        }));

        primitives.extend(hidden.iter().enumerate().map(|(i, &val)| {
            let h = self.hidden_bar_height(val);
            Primitive::Rect { x: self.hidden_x + i as f32 * (self.bar_width + self.bar_gap),
                y: self.baseline - h, w: self.bar_width, h, color: self.hidden_color(val) }
        }));

        for (i, &p) in prob.iter().enumerate() {
            let y = self.output_y + i as f32 * (self.prob_bar_height + self.prob_bar_gap);
            primitives.push(Primitive::Rect { x: self.output_x, y,
                w: self.output_bar_width(p), h: self.prob_bar_height, color: self.output_color(p) });
            primitives.push(Primitive::Label { text: format!("Digit {i}"),
                x: self.output_x - self.digit_label_offset, y: y + self.digit_label_dy,
                color: Rgb::WHITE });
        }

        VisualFrame { width: self.width, height: self.height, background: Rgb::BLACK, primitives }
    }
}

pub mod svg {

use super::{Primitive, Rgb, VisualFrame};
use crate::error::CanvasError;
use plotters::{prelude::*, style::text_anchor::{HPos, Pos, VPos}};

const FONT: (&str, u32) = ("sans-serif", 12);

fn color(rgb: Rgb) -> RGBColor { RGBColor(rgb.0, rgb.1, rgb.2) }

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> CanvasError {
    CanvasError::Draw(err.to_string())
}

pub fn to_string(frame: &VisualFrame) -> Result<String, CanvasError> {
    let mut svg = String::new();
    let size = (frame.width.round().max(1.0) as u32, frame.height.round().max(1.0) as u32);
    {   let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&color(frame.background)).map_err(draw_err)?;

        for primitive in &frame.primitives { let drawn = match primitive {
            Primitive::Rect { x, y, w, h, color: rgb } => {
                let (x0, y0) = (x.round() as i32, y.round() as i32);
                let (x1, y1) = ((x + w).round() as i32, (y + h).round() as i32);
                if x1 <= x0 || y1 <= y0 { continue }    // nothing visible
                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], color(*rgb).filled()))
            }
            Primitive::Label { text, x, y, color: rgb } => {
                let style = FONT.into_font().color(&color(*rgb))
                    .pos(Pos::new(HPos::Left, VPos::Bottom));
                root.draw(&Text::new(text.as_str(), (x.round() as i32, y.round() as i32), style))
            }
        };  drawn.map_err(draw_err)?; }

        root.present().map_err(draw_err)?;
    }   Ok(svg)
}

}

impl VisualFrame {
    pub fn to_svg(&self) -> Result<String, CanvasError> { svg::to_string(self) }

    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<(), CanvasError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg()?).map_err(|source|
            CanvasError::Write { path: path.to_path_buf(), source })
    }
}
