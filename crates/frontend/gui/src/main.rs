use halftone_core::logging::{LogCategory, LogConfig, LogLevel};
use halftone_core::{FrameDriver, HalftoneRenderer, NullSource, ParameterStore, VideoSource};
use halftone_gui::app::App;
use halftone_gui::camera::CameraFeed;
use halftone_gui::settings::Settings;
use halftone_gui::video_processor::VideoBackend;
use halftone_gui::window_backend::{Sdl2Backend, WindowBackend};
use std::env;
use std::process;

const USAGE: &str = "\
Usage: halftone [options]

Options:
  --software              Render on the CPU
  --opengl                Render with OpenGL (needs the opengl feature)
  --camera <index>        Camera device index
  --log-level <level>     off, error, warn, info, debug, trace
  --log-camera <level>    Override for camera messages
  --log-render <level>    Override for render messages
  --log-params <level>    Override for parameter messages
  --log-driver <level>    Override for frame loop messages
  -h, --help              Show this help

Keys: Tab/Shift+Tab select, Up/Down adjust, [ ] shift density range,
      F1 print values, Escape quit";

#[derive(Debug, Default, PartialEq)]
struct Args {
    backend: Option<VideoBackend>,
    camera: Option<u32>,
    log_level: Option<LogLevel>,
    category_levels: Vec<(LogCategory, LogLevel)>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--software" => parsed.backend = Some(VideoBackend::Software),
            "--opengl" => parsed.backend = Some(VideoBackend::OpenGL),
            "--camera" => {
                let v = value("--camera")?;
                parsed.camera =
                    Some(v.parse().map_err(|_| format!("invalid camera index: {}", v))?);
            }
            "--log-level" => {
                let v = value("--log-level")?;
                parsed.log_level =
                    Some(LogLevel::from_str(&v).ok_or_else(|| format!("invalid log level: {}", v))?);
            }
            "-h" | "--help" => parsed.help = true,
            other => {
                let category = other
                    .strip_prefix("--log-")
                    .and_then(LogCategory::from_str)
                    .ok_or_else(|| format!("unknown argument: {}", other))?;
                let v = value(other)?;
                let level =
                    LogLevel::from_str(&v).ok_or_else(|| format!("invalid log level: {}", v))?;
                parsed.category_levels.push((category, level));
            }
        }
    }

    Ok(parsed)
}

fn init_logging(args: &Args) {
    let config = LogConfig::global();
    let level = args.log_level.unwrap_or(LogLevel::Info);
    config.set_global_level(level);
    for &(category, level) in &args.category_levels {
        config.set_level(category, level);
    }

    // LogConfig does the filtering; RUST_LOG may still narrow it
    env_logger::Builder::new()
        .filter_level(config.max_level().to_level_filter())
        .parse_default_env()
        .init();
}

fn main() {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    init_logging(&args);

    let mut settings = Settings::load();
    if let Some(index) = args.camera {
        settings.camera.index = index;
    }

    let backend = args
        .backend
        .or_else(|| VideoBackend::from_str(&settings.video_backend))
        .unwrap_or_default();

    let (width, height) = settings.window_size();
    let window = match Sdl2Backend::new(
        "Halftone",
        width,
        height,
        backend == VideoBackend::OpenGL,
    ) {
        Ok(window) => window,
        Err(e) => {
            log::error!("failed to open window: {}", e);
            process::exit(1);
        }
    };
    log::info!("window backend: {}", window.name());

    let mut renderer: Box<dyn HalftoneRenderer> = match window.create_renderer() {
        Ok(renderer) => renderer,
        Err(e) => {
            log::error!("failed to create renderer: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = renderer.init(width, height) {
        log::error!("failed to initialise renderer: {}", e);
        process::exit(1);
    }

    // A missing camera leaves a black window rather than no window
    let source: Box<dyn VideoSource> = match CameraFeed::open(&settings.camera) {
        Ok(feed) => Box::new(feed),
        Err(e) => {
            log::error!("camera unavailable: {}", e);
            Box::new(NullSource)
        }
    };

    let store = ParameterStore::new(settings.effect).with_density_range(settings.density_range);
    let mut driver = FrameDriver::new(source, renderer, store);
    let mut app = App::new(window, driver.stop_handle());

    let frames = driver.run(&mut app);
    log::info!("exiting after {} frames", frames);
}
