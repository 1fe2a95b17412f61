use halftone_core::types::Frame;
use halftone_core::{
    EffectParameters, FrameDriver, ParameterStore, SoftwareRenderer, StillSource,
};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let size: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(64);

    let mut store = ParameterStore::new(EffectParameters::default());
    store.set_resolution(size, size);

    let mut renderer = SoftwareRenderer::new();
    halftone_core::HalftoneRenderer::init(&mut renderer, size, size).unwrap();

    let mut driver = FrameDriver::new(
        Box::new(StillSource::new(Frame::filled(size, size, 0xFFFF_FFFF))),
        Box::new(renderer),
        store,
    );
    let report = driver.tick().unwrap();
    let out = driver.renderer().output().unwrap();
    let lit = out.pixels.iter().filter(|&&p| p & 0x00FF_FFFF != 0).count();

    println!("Headless frame: {}x{}", out.width, out.height);
    println!("Synced: {}, uploaded: {}", report.synced, report.uploaded);
    println!("Lit pixels: {} of {}", lit, out.pixels.len());
    println!("Grid: {}", driver.store().density_label());
    println!(
        "Parameters: {}",
        serde_json::to_string_pretty(driver.store().params()).unwrap()
    );
}
