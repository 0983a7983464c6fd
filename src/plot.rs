use std::path::Path;
use image::{Rgb, RgbImage};
use log::info;
use crate::error::SignalResult;
use crate::signal::FinalSequence;
use crate::types::{SampleTime, SampleValue, SignalFloat};

/// How to draw a plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub background: Rgb<u8>,
    pub grid: Rgb<u8>,
    pub trace: Rgb<u8>,

    /// The number of grid divisions along each axis.
    pub divisions: u32,

    /// The time range to show. The whole sequence if not set.
    pub window: Option<(SampleTime, SampleTime)>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: Rgb([255, 255, 255]),
            grid: Rgb([220, 220, 220]),
            trace: Rgb([0, 0, 255]),
            divisions: 10,
            window: None,
        }
    }
}

/// Maps signal coordinates to pixels.
struct Viewport {
    time: (SampleTime, SampleTime),
    voltage: (SampleValue, SampleValue),
    width: u32,
    height: u32,
}

impl Viewport {
    fn x(&self, time: SampleTime) -> i64 {
        let span = self.time.1 - self.time.0;
        let nrm = if span > 0.0 { (time - self.time.0) / span } else { 0.0 };
        (nrm * (self.width - 1) as SignalFloat).round() as i64
    }

    fn y(&self, value: SampleValue) -> i64 {
        let span = self.voltage.1 - self.voltage.0;
        let nrm = if span > 0.0 { (value - self.voltage.0) / span } else { 0.5 };
        ((1.0 - nrm) * (self.height - 1) as SignalFloat).round() as i64
    }
}

/// Render the sequence as a line plot, time left to right and voltage bottom to top, with linear
/// interpolation between breakpoints like the simulator does.
pub fn render_plot(sequence: &FinalSequence, width: u32, height: u32, style: &PlotStyle) -> RgbImage {
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), style.background);
    draw_grid(&mut img, style);

    let points = sequence.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return img;
    };

    let time = style.window.unwrap_or((first.0, last.0));
    let (low, high) = sequence
        .voltages()
        .fold((SampleValue::INFINITY, SampleValue::NEG_INFINITY), |(low, high), value| {
            (low.min(value), high.max(value))
        });
    let margin = (high - low).max(1e-3) * 0.05;
    let viewport = Viewport {
        time,
        voltage: (low - margin, high + margin),
        width: img.width(),
        height: img.height(),
    };

    if points.len() == 1 {
        let (t, v) = points[0];
        put(&mut img, viewport.x(t), viewport.y(v), style.trace);
        return img;
    }

    for pair in points.windows(2) {
        let Some(((t0, v0), (t1, v1))) = clip(pair[0], pair[1], time) else {
            continue;
        };
        draw_line(
            &mut img,
            (viewport.x(t0), viewport.y(v0)),
            (viewport.x(t1), viewport.y(v1)),
            style.trace,
        );
    }

    img
}

/// Render and save the plot. The format follows the file extension.
pub fn save_plot(
    path: impl AsRef<Path>,
    sequence: &FinalSequence,
    width: u32,
    height: u32,
    style: &PlotStyle,
) -> SignalResult<()> {
    let path = path.as_ref();
    render_plot(sequence, width, height, style).save(path)?;
    info!("saved {}x{} plot to {}", width, height, path.display());
    Ok(())
}

/// Cut a line segment down to the visible time range, interpolating the voltage at the edges.
fn clip(
    (t0, v0): (SampleTime, SampleValue),
    (t1, v1): (SampleTime, SampleValue),
    (start, end): (SampleTime, SampleTime),
) -> Option<((SampleTime, SampleValue), (SampleTime, SampleValue))> {
    if t1 < start || t0 > end {
        return None;
    }

    let at = |t: SampleTime| {
        if t1 > t0 {
            v0 + (v1 - v0) * (t - t0) / (t1 - t0)
        } else {
            v1
        }
    };
    let a = if t0 < start { (start, at(start)) } else { (t0, v0) };
    let b = if t1 > end { (end, at(end)) } else { (t1, v1) };
    Some((a, b))
}

fn draw_grid(img: &mut RgbImage, style: &PlotStyle) {
    if style.divisions == 0 {
        return;
    }

    let (width, height) = img.dimensions();
    for div in 0..=style.divisions {
        let x = (div as u64 * (width - 1) as u64 / style.divisions as u64) as u32;
        let y = (div as u64 * (height - 1) as u64 / style.divisions as u64) as u32;
        for py in 0..height {
            img.put_pixel(x, py, style.grid);
        }
        for px in 0..width {
            img.put_pixel(px, y, style.grid);
        }
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham, both end points included.
fn draw_line(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
