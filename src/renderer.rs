// src/renderer.rs

use crate::error::RenderError;
use crate::model::*;
use image::{Rgb, RgbImage};
use palette::{named, Srgb};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

const MARGIN: u32 = 20;
const LABEL_SCALE: u32 = 2;
const LABEL_TOP: u32 = MARGIN + 4;

/// Block colors, reused cyclically when there are more groups
const GROUP_COLORS: [Srgb<u8>; 5] = [named::RED, named::GREEN, named::BLUE, named::ORANGE, named::PURPLE];

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

/// Draws the partition and writes it to `options.output`
pub fn render(partition: &Partition, options: &RenderOptions) -> Result<(), RenderError> {
    let image = draw(partition, options.width, options.height)?;
    image.save(&options.output).map_err(|source| RenderError::Write {
        path: options.output.clone(),
        source,
    })?;
    info!(groups = partition.len(), path = %options.output.display(), "wrote graph");
    Ok(())
}

/// One full-height colored block per group, left to right, each labelled "Group N"
pub fn draw(partition: &Partition, width: u32, height: u32) -> Result<RgbImage, RenderError> {
    if width <= 2 * MARGIN || height <= 2 * MARGIN {
        return Err(RenderError::InvalidSize { width, height });
    }

    let columns = width - 2 * MARGIN;
    if partition.len() > columns as usize {
        warn!(
            groups = partition.len(),
            columns,
            "more groups than pixel columns; some groups will have no visible block"
        );
    }

    let background = to_rgb(named::WHITE);
    let blocks = block_columns(partition.len(), width);

    // Every row of the band between the margins looks the same
    let mut band = Vec::with_capacity(width as usize * 3);
    for _ in 0..width {
        band.extend_from_slice(&background.0);
    }
    for (index, &(start, end)) in blocks.iter().enumerate() {
        let color = group_color(index);
        for x in start..end {
            let offset = x as usize * 3;
            band[offset..offset + 3].copy_from_slice(&color.0);
        }
    }

    let mut image = RgbImage::new(width, height);
    let band_rows = MARGIN as usize..(height - MARGIN) as usize;
    image
        .par_chunks_mut(width as usize * 3)
        .enumerate()
        .for_each(|(y, row)| {
            if band_rows.contains(&y) {
                row.copy_from_slice(&band);
            } else {
                for pixel in row.chunks_exact_mut(3) {
                    pixel.copy_from_slice(&background.0);
                }
            }
        });

    let ink = to_rgb(named::BLACK);
    for (index, &(start, end)) in blocks.iter().enumerate() {
        let label = format!("Group {}", index + 1);
        draw_label(&mut image, &label, (start, end), ink);
    }

    Ok(image)
}

pub fn group_color(index: usize) -> Rgb<u8> {
    to_rgb(GROUP_COLORS[index % GROUP_COLORS.len()])
}

fn to_rgb(color: Srgb<u8>) -> Rgb<u8> {
    let (r, g, b) = color.into_components();
    Rgb([r, g, b])
}

/// Horizontal pixel range `[start, end)` of each block
fn block_columns(groups: usize, width: u32) -> Vec<(u32, u32)> {
    if groups == 0 {
        return Vec::new();
    }
    let block_width = f64::from(width - 2 * MARGIN) / groups as f64;
    (0..groups)
        .map(|i| {
            let start = MARGIN + (i as f64 * block_width).floor() as u32;
            let end = MARGIN + ((i + 1) as f64 * block_width).floor() as u32;
            (start, end)
        })
        .collect()
}

/// Centres `text` at the top of the block, clipped to its columns
fn draw_label(image: &mut RgbImage, text: &str, (start, end): (u32, u32), ink: Rgb<u8>) {
    let advance = (GLYPH_WIDTH + 1) * LABEL_SCALE;
    let text_width = (text.chars().count() as u32 * advance).saturating_sub(LABEL_SCALE);
    let centre = start + (end - start) / 2;
    let left = i64::from(centre) - i64::from(text_width / 2);

    for (n, ch) in text.chars().enumerate() {
        let rows = glyph(ch);
        let glyph_left = left + i64::from(n as u32 * advance);
        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1u8 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..LABEL_SCALE {
                    for dx in 0..LABEL_SCALE {
                        let x = glyph_left + i64::from(col * LABEL_SCALE + dx);
                        let y = LABEL_TOP + row as u32 * LABEL_SCALE + dy;
                        if x >= i64::from(start) && x < i64::from(end) && y < image.height() {
                            image.put_pixel(x as u32, y, ink);
                        }
                    }
                }
            }
        }
    }
}

const GLYPH_WIDTH: u32 = 5;

/// 5x7 bitmaps for the characters labels use; anything else is blank
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'u' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'p' => [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        _ => [0; 7],
    }
}
