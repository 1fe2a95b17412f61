mod image_io;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use halftone_core::logging::{LogConfig, LogLevel};
use halftone_core::types::Frame;
use halftone_core::{
    EffectParameters, FrameDriver, HalftoneRenderer, ParameterStore, SoftwareRenderer,
    StillSource,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "halftone-cli", about = "Apply the halftone effect to still images")]
struct Args {
    /// Core log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ParamArgs {
    /// JSON file with effect parameters; missing fields keep their defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// Override one control, e.g. `--set dotSize=6` or `--set dotColor=#ff0088`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Render a PNG through the effect
    Render {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Output width; defaults to the input width
        #[arg(long)]
        width: Option<u32>,

        /// Output height; defaults to the input height
        #[arg(long)]
        height: Option<u32>,
    },
    /// Print the effective parameters as JSON
    Params {
        #[command(flatten)]
        params: ParamArgs,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = LogLevel::from_str(&args.log_level)
        .with_context(|| format!("invalid log level: {}", args.log_level))?;
    LogConfig::global().set_global_level(level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    match args.command {
        Command::Render {
            input,
            output,
            params,
            width,
            height,
        } => {
            let store = build_store(&params)?;
            let frame = image_io::load_png(&input)?;
            log::info!(
                "{}: {}x{}",
                input.display(),
                frame.width,
                frame.height
            );
            let size = (width.unwrap_or(frame.width), height.unwrap_or(frame.height));
            let rendered = render_still(frame, store, size)?;
            image_io::save_png(&output, &rendered)?;
            println!(
                "Wrote {} ({}x{})",
                output.display(),
                rendered.width,
                rendered.height
            );
        }
        Command::Params { params } => {
            let store = build_store(&params)?;
            println!("{}", store.params().to_json_pretty()?);
            println!("{}", store.density_label());
        }
    }

    Ok(())
}

/// Defaults, then the `--params` file, then each `--set` in order.
fn build_store(args: &ParamArgs) -> Result<ParameterStore> {
    let mut store = ParameterStore::new(EffectParameters::default());
    if let Some(path) = &args.params {
        store.replace(load_params(path)?);
    }
    for pair in &args.overrides {
        let (name, value) = split_override(pair)?;
        store
            .set_by_name(name, value)
            .with_context(|| format!("--set {}", pair))?;
    }
    Ok(store)
}

fn load_params(path: &Path) -> Result<EffectParameters> {
    let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let params = EffectParameters::from_json(&json)
        .with_context(|| format!("parse {}", path.display()))?;
    log::debug!("{}", serde_json::to_string(&params)?);
    Ok(params)
}

fn split_override(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("expected NAME=VALUE, got {:?}", pair),
    }
}

/// One tick of the frame loop over a still image, on the CPU renderer.
fn render_still(frame: Frame, store: ParameterStore, size: (u32, u32)) -> Result<Frame> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        bail!("output size must be non-zero, got {}x{}", width, height);
    }
    let mut renderer = SoftwareRenderer::new();
    renderer.init(width, height)?;

    let mut driver = FrameDriver::new(
        Box::new(StillSource::new(frame)),
        Box::new(renderer),
        store,
    );
    // No frame polled yet, so the surface fills the requested size
    driver.context().refit(size)?;

    let report = driver.tick()?;
    if !report.uploaded {
        bail!("source produced no frame");
    }
    driver
        .renderer()
        .output()
        .cloned()
        .context("renderer produced no output")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param_args(overrides: &[&str]) -> ParamArgs {
        ParamArgs {
            params: None,
            overrides: overrides.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_split_override() {
        assert_eq!(split_override("dotSize=6").unwrap(), ("dotSize", "6"));
        assert_eq!(
            split_override(" dotColor = #ff0088").unwrap(),
            ("dotColor", "#ff0088")
        );
        assert!(split_override("dotSize").is_err());
        assert!(split_override("=6").is_err());
    }

    #[test]
    fn test_overrides_apply_in_order() {
        let store = build_store(&param_args(&["contrast=2", "contrast=2.5", "dot_color=#000000"]))
            .unwrap();
        assert_eq!(store.params().contrast, 2.5);
        assert_eq!(store.params().dot_color.g, 0.0);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        assert!(build_store(&param_args(&["gamma=abc"])).is_err());
        assert!(build_store(&param_args(&["sharpness=1"])).is_err());
    }

    #[test]
    fn test_params_file_then_overrides() {
        let dir = std::env::temp_dir().join("halftone_cli_params");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("params.json");
        fs::write(&path, r#"{ "density": 100, "gamma": 2.0 }"#).unwrap();

        let args = ParamArgs {
            params: Some(path),
            overrides: vec!["gamma=0.5".to_string()],
        };
        let store = build_store(&args).unwrap();
        assert_eq!(store.params().density, 100.0);
        assert_eq!(store.params().gamma, 0.5);
        assert_eq!(store.params().dot_size, EffectParameters::default().dot_size);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_render_still_uses_requested_size() {
        let frame = Frame::filled(40, 30, 0xFFFF_FFFF);
        let store = build_store(&param_args(&["dotColor=#336699", "density=40"])).unwrap();
        let out = render_still(frame, store, (80, 20)).unwrap();
        assert_eq!((out.width, out.height), (80, 20));
        assert!(out.pixels.iter().any(|&p| p & 0x00FF_FFFF != 0));
    }

    #[test]
    fn test_render_black_image_stays_black() {
        let frame = Frame::filled(16, 16, 0xFF00_0000);
        let store = ParameterStore::new(EffectParameters::default());
        let out = render_still(frame, store, (16, 16)).unwrap();
        assert!(out.pixels.iter().all(|&p| p == 0xFF00_0000));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let store = ParameterStore::new(EffectParameters::default());
        assert!(render_still(Frame::new(4, 4), store, (0, 4)).is_err());
    }
}
