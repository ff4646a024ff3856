//! Ruling detection on a grayscale raster.
//!
//! An edge is a grayscale jump along a straight run of consistent color.
//! The raster comes from the renderer rather than the page's own vector
//! data because invisible drawing instructions otherwise masquerade as
//! rulings; what matters is what a reader sees.

use image::GrayImage;

use crate::geom::Ruling;

use super::{H_MIN_WIDTH, INTENSITY_THRESHOLD, V_MIN_HEIGHT};

/// Scan every column downward for intensity jumps, then walk each jump
/// rightward while the edge persists. Runs longer than `H_MIN_WIDTH`
/// become rulings in image coordinates.
pub fn horizontal_rulings(image: &GrayImage) -> Vec<Ruling> {
    let (width, height) = image.dimensions();
    let mut rulings: Vec<Ruling> = Vec::new();
    if width == 0 || height < 2 {
        return rulings;
    }
    let px = |x: u32, y: u32| i32::from(image.get_pixel(x, y)[0]);

    for x in 0..width {
        let mut last = px(x, 0);
        for y in 1..height - 1 {
            let curr = px(x, y);
            if (curr - last).abs() > INTENSITY_THRESHOLD {
                let already_covered = rulings.iter().any(|r| {
                    y as f64 == r.p1.1 && x as f64 >= r.p1.0 && x as f64 <= r.p2.0
                });
                if !already_covered {
                    let mut line_x = x + 1;
                    while line_x < width {
                        let here = px(line_x, y);
                        let above = px(line_x, y - 1);
                        if (here - above).abs() <= INTENSITY_THRESHOLD
                            || (curr - here).abs() > INTENSITY_THRESHOLD
                        {
                            break;
                        }
                        line_x += 1;
                    }
                    let end_x = line_x - 1;
                    if end_x - x > H_MIN_WIDTH {
                        rulings.push(Ruling::horizontal_at(y as f64, x as f64, end_x as f64));
                    }
                }
            }
            last = curr;
        }
    }
    rulings
}

/// The transpose of `horizontal_rulings`: row-major scan for vertical
/// edges, with `V_MIN_HEIGHT` as the run threshold.
pub fn vertical_rulings(image: &GrayImage) -> Vec<Ruling> {
    let (width, height) = image.dimensions();
    let mut rulings: Vec<Ruling> = Vec::new();
    if height == 0 || width < 2 {
        return rulings;
    }
    let px = |x: u32, y: u32| i32::from(image.get_pixel(x, y)[0]);

    for y in 0..height {
        let mut last = px(0, y);
        for x in 1..width - 1 {
            let curr = px(x, y);
            if (curr - last).abs() > INTENSITY_THRESHOLD {
                let already_covered = rulings.iter().any(|r| {
                    x as f64 == r.p1.0 && y as f64 >= r.p1.1 && y as f64 <= r.p2.1
                });
                if !already_covered {
                    let mut line_y = y + 1;
                    while line_y < height {
                        let here = px(x, line_y);
                        let left = px(x - 1, line_y);
                        if (here - left).abs() <= INTENSITY_THRESHOLD
                            || (curr - here).abs() > INTENSITY_THRESHOLD
                        {
                            break;
                        }
                        line_y += 1;
                    }
                    let end_y = line_y - 1;
                    if end_y - y > V_MIN_HEIGHT {
                        rulings.push(Ruling::vertical_at(x as f64, y as f64, end_y as f64));
                    }
                }
            }
            last = curr;
        }
    }
    rulings
}
