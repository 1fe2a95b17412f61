//! Renders a gradient test pattern through the halftone effect and prints
//! it as text, one character per dot.
//!
//! Run with: cargo run --example halftone_pattern -p halftone_gui

use halftone_core::types::Frame;
use halftone_core::{EffectParameters, HalftoneRenderer, ParameterStore, SoftwareRenderer};
use halftone_gui::video_processor::VideoBackend;

fn main() {
    let width = 240;
    let height = 120;
    let pattern = create_test_pattern(width, height);

    let params = EffectParameters {
        density: 120.0,
        dot_spacing: 6.0,
        ..Default::default()
    };
    let mut store = ParameterStore::new(params);
    store.set_resolution(width, height);

    let mut renderer = SoftwareRenderer::new();
    if let Err(e) = renderer.init(width, height) {
        eprintln!("init failed: {}", e);
        return;
    }
    renderer.sync_parameters(&mut store);
    if let Err(e) = renderer
        .upload_frame(&pattern)
        .and_then(|_| renderer.draw())
    {
        eprintln!("render failed: {}", e);
        return;
    }

    println!("Halftone test pattern ({})", store.density_label());
    println!(
        "Default window backend in this build: {}\n",
        VideoBackend::default().as_str()
    );

    let Some(out) = renderer.output() else {
        return;
    };
    let grid = store.params().grid_size().floor() as u32;
    let cell_w = width as f32 / grid as f32;
    let cell_h = height as f32 / grid as f32;
    for gy in 0..grid {
        let line: String = (0..grid)
            .map(|gx| {
                // Output is rotated 180 degrees relative to the pattern
                let x = ((gx as f32 + 0.5) * cell_w) as u32;
                let y = ((gy as f32 + 0.5) * cell_h) as u32;
                shade_char(out.pixel(x.min(width - 1), y.min(height - 1)))
            })
            .collect();
        println!("{}", line);
    }
}

/// Horizontal luminance ramp, black on the left.
fn create_test_pattern(width: u32, height: u32) -> Frame {
    let mut frame = Frame::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = x * 255 / (width - 1);
            frame.pixels[(y * width + x) as usize] = 0xFF00_0000 | (v << 16) | (v << 8) | v;
        }
    }
    frame
}

fn shade_char(pixel: u32) -> char {
    let r = (pixel >> 16) & 0xFF;
    let g = (pixel >> 8) & 0xFF;
    let b = pixel & 0xFF;
    match r.max(g).max(b) {
        0 => ' ',
        1..=63 => '.',
        64..=127 => 'o',
        128..=191 => 'O',
        _ => '@',
    }
}
