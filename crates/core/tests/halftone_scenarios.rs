//! End-to-end checks of the halftone program through the public API.

use halftone_core::shader::texture::Solid;
use halftone_core::shader::{run_stages, shade_fragment, FragmentContext, FrameConstants};
use halftone_core::types::{Frame, Rgb, Vec2};
use halftone_core::{
    EffectParameters, FrameDriver, HalftoneRenderer, ParamId, ParameterStore, SoftwareRenderer,
    StillSource,
};

fn constants(store: &ParameterStore) -> FrameConstants {
    FrameConstants::new(store.params())
}

#[test]
fn test_single_cell_grid() {
    let mut store = ParameterStore::default();
    store.set(ParamId::Density, "20").unwrap();
    store.set(ParamId::DotSpacing, "20").unwrap();
    assert_eq!(store.params().grid_size(), 1.0);
    assert_eq!(store.density_label(), "1 x 1 (20px)");

    // Every fragment samples the middle of the texture
    let c = constants(&store);
    for uv in [Vec2::new(0.01, 0.02), Vec2::new(0.9, 0.5), Vec2::new(0.5, 0.99)] {
        let cell = c.grid.quantize(uv);
        assert_eq!(cell.center, Vec2::new(0.5, 0.5));
    }
}

#[test]
fn test_white_frame_full_visibility_inside_dot() {
    let mut store = ParameterStore::default();
    store.set(ParamId::Threshold, "0.5").unwrap();
    store.set(ParamId::Contrast, "1").unwrap();
    let c = constants(&store);
    let radius = c.radius;

    // Sweep fragments across one cell; inside the dot alpha is ~1
    let size = c.grid.size();
    for i in 0..16 {
        let t = (i as f32 + 0.5) / 16.0;
        let uv = Vec2::new((3.0 + t) / size, 3.5 / size);
        let ctx = run_stages(FragmentContext::sample(&Solid(Rgb::WHITE), uv, &c), &c);
        assert_eq!(ctx.brightness, 1.0);
        assert_eq!(ctx.visibility, 1.0);
        if ctx.dist <= radius - 0.01 {
            assert!((ctx.opacity - 1.0).abs() < 1e-6, "opacity {} at {}", ctx.opacity, ctx.dist);
        }
    }
}

#[test]
fn test_black_frame_is_fully_transparent() {
    let c = FrameConstants::new(&EffectParameters {
        glow_intensity: 2.0,
        contrast: 3.0,
        ..Default::default()
    });
    for y in 0..25 {
        for x in 0..25 {
            let uv = Vec2::new(x as f32 / 24.0, y as f32 / 24.0);
            let f = shade_fragment(&Solid(Rgb::BLACK), uv, &c);
            assert!(f.alpha.abs() < 1e-6, "alpha {} at {:?}", f.alpha, uv);
        }
    }
}

#[test]
fn test_red_dots_without_dodge_stay_red() {
    let mut store = ParameterStore::default();
    store.set(ParamId::DotColor, "#ff0000").unwrap();
    store.set(ParamId::ColorDodgeBlend, "0").unwrap();
    let c = constants(&store);

    for gray in [0.3, 0.6, 0.9] {
        let ctx = run_stages(
            FragmentContext::sample(&Solid(Rgb::splat(gray)), Vec2::new(0.51, 0.49), &c),
            &c,
        );
        let boost = 1.0 + ctx.glow * ctx.brightness * 0.5;
        assert_eq!((ctx.color.g, ctx.color.b), (0.0, 0.0));
        assert!((ctx.color.r - boost).abs() < 1e-5);
    }
}

#[test]
fn test_driver_renders_still_image() {
    let mut store = ParameterStore::default();
    store.set_resolution(48, 48);
    let mut renderer = SoftwareRenderer::new();
    renderer.init(48, 48).unwrap();

    let mut driver = FrameDriver::new(
        Box::new(StillSource::new(Frame::filled(16, 16, 0xFFFF_FFFF))),
        Box::new(renderer),
        store,
    );
    driver.tick().unwrap();
    // Second tick redraws the same texture with new uniforms
    driver.store_mut().set(ParamId::DotColor, "#336699").unwrap();
    driver.tick().unwrap();

    let out = driver.renderer().output().unwrap();
    assert_eq!(out.pixels.len(), 48 * 48);
    let lit = out.pixels.iter().filter(|&&p| p != 0xFF00_0000).count();
    assert!(lit > 0, "white input lights some dots");
    assert!(lit < out.pixels.len(), "gaps between dots stay black");
}
