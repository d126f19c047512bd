use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shadowcast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scripted session over a synthetic live feed and write PNG frames.
    Demo(DemoArgs),
    /// Print the effective engine config as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output directory for PNG frames.
    #[arg(long)]
    out: PathBuf,

    /// Engine config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quality preset applied on top of the config (low, medium, high).
    #[arg(long)]
    quality: Option<shadowcast::QualityTier>,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Ticks to simulate.
    #[arg(long, default_value_t = 90)]
    frames: u32,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Clones to spawn.
    #[arg(long, default_value_t = 3)]
    clones: usize,

    /// Write every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u32,

    /// Alpha of the synthetic feed's backdrop. Clones only show through where it is below 255.
    #[arg(long, default_value_t = 0)]
    backdrop_alpha: u8,

    /// Publish a segmentation mask of the synthetic subject each tick.
    #[arg(long)]
    mask: bool,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Engine config JSON to validate and echo. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quality preset applied on top of the config.
    #[arg(long)]
    quality: Option<shadowcast::QualityTier>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo(args) => cmd_demo(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(
    path: Option<&Path>,
    quality: Option<shadowcast::QualityTier>,
) -> anyhow::Result<shadowcast::EngineConfig> {
    let mut cfg = match path {
        Some(p) => shadowcast::EngineConfig::from_path(p)
            .with_context(|| format!("load engine config '{}'", p.display()))?,
        None => shadowcast::EngineConfig::default(),
    };
    if let Some(q) = quality {
        cfg = cfg.with_quality(q.settings());
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.quality)?;
    println!("{}", cfg.to_json_pretty()?);
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }
    let mut cfg = load_config(args.config.as_deref(), args.quality)?;
    if args.mask {
        cfg.segmentation_enabled = true;
    }
    if cfg.seed.is_none() {
        cfg.seed = Some(1);
    }

    let canvas = shadowcast::Canvas::new(args.width, args.height);
    let mut surface = shadowcast::CpuSurface::new(canvas)?;
    let shared = shadowcast::SharedMask::new();
    let mut pipeline = shadowcast::CompositingPipeline::new(cfg).with_segmenter(shared.clone());

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let dt_ms = 1000.0 / f64::from(args.fps);
    let spawn_at = args.fps;
    let dismiss_at = args.frames.saturating_mul(2) / 3;
    let every = args.every.max(1);
    let mut written = 0u32;

    for i in 0..args.frames {
        let subject = subject_center(canvas, i, args.fps);
        let live = synthetic_frame(canvas, subject, args.backdrop_alpha)?;
        if args.mask {
            shared.publish(subject_mask(canvas, subject)?)?;
        }

        if i == spawn_at {
            let n = pipeline.spawn_all(canvas.center(), args.clones);
            eprintln!("tick {i}: spawned {n} clones");
        }
        if i == dismiss_at {
            let n = pipeline.dismiss_all();
            eprintln!("tick {i}: dismissing {n} clones");
        }

        pipeline.tick(dt_ms, &live, &mut surface);
        if i % every != 0 {
            continue;
        }
        let frame = surface.finish();
        let path = args.out.join(format!("frame_{i:05}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        written += 1;
    }

    eprintln!("wrote {written} frames to {}", args.out.display());
    Ok(())
}

fn subject_radius(canvas: shadowcast::Canvas) -> f64 {
    f64::from(canvas.width.min(canvas.height)) * 0.18
}

/// The subject sways left and right once every two seconds.
fn subject_center(canvas: shadowcast::Canvas, tick: u32, fps: u32) -> shadowcast::Point {
    let t = f64::from(tick) / f64::from(fps);
    let c = canvas.center();
    let sway = f64::from(canvas.width) * 0.2 * (t * std::f64::consts::PI).sin();
    shadowcast::Point::new(c.x + sway, c.y + f64::from(canvas.height) * 0.1)
}

fn synthetic_frame(
    canvas: shadowcast::Canvas,
    subject: shadowcast::Point,
    backdrop_alpha: u8,
) -> anyhow::Result<shadowcast::FrameRGBA> {
    let r = subject_radius(canvas);
    let mut data = Vec::with_capacity(canvas.width as usize * canvas.height as usize * 4);
    for y in 0..canvas.height {
        let shade = (40 + (y * 60 / canvas.height.max(1))) as u8;
        for x in 0..canvas.width {
            let p = shadowcast::Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if (p - subject).hypot() <= r {
                data.extend_from_slice(&[240, 200, 150, 255]);
            } else {
                data.extend_from_slice(&[shade / 2, shade, shade, backdrop_alpha]);
            }
        }
    }
    Ok(shadowcast::FrameRGBA::from_straight(
        canvas.width,
        canvas.height,
        data,
    )?)
}

fn subject_mask(
    canvas: shadowcast::Canvas,
    subject: shadowcast::Point,
) -> anyhow::Result<shadowcast::SegmentationMask> {
    let r = subject_radius(canvas);
    let mut alpha = Vec::with_capacity(canvas.width as usize * canvas.height as usize);
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            let p = shadowcast::Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            alpha.push(if (p - subject).hypot() <= r { 255 } else { 0 });
        }
    }
    Ok(shadowcast::SegmentationMask::new(
        canvas.width,
        canvas.height,
        alpha,
    )?)
}
