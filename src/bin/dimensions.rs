use std::io::BufRead as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dimensions::capture::export::write_png;
use dimensions::{
    Animator, Control, CpuRasterizer, FrameSize, ParamUpdate, SegmenterConfig, Session,
    SessionConfig, SourceConfig, TextLayoutEngine, TickInputs, WavePattern,
};

#[derive(Parser, Debug)]
#[command(name = "dimensions", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a live session. Commands are read from stdin, one per line.
    Run(RunArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Session config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image file or directory used as the camera.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Mask image file or directory used as the segmentation model.
    #[arg(long)]
    masks: Option<PathBuf>,

    /// Synthetic camera width.
    #[arg(long)]
    width: Option<u32>,

    /// Synthetic camera height.
    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    cell_size: Option<u32>,

    /// Background color (`#RRGGBB` or `#RRGGBBAA`).
    #[arg(long)]
    bg: Option<String>,

    /// `0` for the full spectrum, `1..=360` to anchor hues.
    #[arg(long)]
    offset: Option<u16>,

    /// radial, horizontal, vertical, sinusoidal or random.
    #[arg(long)]
    pattern: Option<String>,

    /// Switch to text-art mode with this text.
    #[arg(long)]
    text: Option<String>,

    #[arg(long)]
    speed: Option<f64>,

    /// Monospace font file for text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory recordings and screenshots are written to.
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Exit after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Write the last presented frame as a PNG on exit.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Do not read commands from stdin.
    #[arg(long, default_value_t = false)]
    no_stdin: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Number of ticks to advance before capturing (at least 1).
    #[arg(long, default_value_t = 1)]
    ticks: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Include the grid overlay.
    #[arg(long, default_value_t = false)]
    presented: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(args: &SessionArgs) -> anyhow::Result<SessionConfig> {
    let mut cfg = match &args.config {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => SessionConfig::default(),
    };
    cfg.apply_env();

    if let Some(path) = &args.images {
        cfg.source = SourceConfig::Images { path: path.clone() };
    } else if args.width.is_some() || args.height.is_some() {
        let (w0, h0) = match cfg.source {
            SourceConfig::Synthetic { width, height } => (width, height),
            SourceConfig::Images { .. } => (1280, 720),
        };
        cfg.source = SourceConfig::Synthetic {
            width: args.width.unwrap_or(w0),
            height: args.height.unwrap_or(h0),
        };
    }
    if let Some(path) = &args.masks {
        cfg.segmenter = SegmenterConfig::Masks { path: path.clone() };
    }
    if let Some(font) = &args.font {
        cfg.font = Some(font.clone());
    }
    if let Some(dir) = &args.export_dir {
        cfg.export_dir = dir.clone();
    }

    let mut updates = Vec::new();
    if let Some(size) = args.cell_size {
        updates.push(ParamUpdate::CellSize(size));
    }
    if let Some(bg) = &args.bg {
        let color = bg
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("parse --bg '{bg}'"))?;
        updates.push(ParamUpdate::Background(color));
    }
    if let Some(offset) = args.offset {
        updates.push(ParamUpdate::SpectrumOffset(offset));
    }
    if let Some(name) = &args.pattern {
        updates.push(ParamUpdate::WavePattern(WavePattern::from_name(name)));
    }
    if let Some(text) = &args.text {
        updates.push(ParamUpdate::Text(text.clone()));
    }
    if let Some(speed) = args.speed {
        updates.push(ParamUpdate::WaveSpeed(speed));
    }
    for update in updates {
        cfg.render.apply(update)?;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.session)?;
    let source = cfg.source.build()?;
    let segmenter = cfg.segmenter.build();
    let mut session = Session::start(cfg, source, segmenter).context("start session")?;

    if !args.no_stdin {
        spawn_stdin_reader(session.controls())?;
    }

    let report = session.run_for(args.ticks);
    session.shutdown();
    tracing::info!(
        ticks = report.ticks,
        failed = report.failed_ticks,
        "session finished"
    );
    if let Some(status) = session.status().latest() {
        eprintln!("{}", status.message);
    }

    if let Some(out) = &args.dump {
        let frame = session
            .presented()
            .latest()
            .context("no frame was rendered")?;
        write_png(&frame, out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn spawn_stdin_reader(tx: std::sync::mpsc::Sender<Control>) -> anyhow::Result<()> {
    std::thread::Builder::new()
        .name("dimensions-stdin".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Control>() {
                    Ok(control) => {
                        if tx.send(control).is_err() {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
        })
        .context("spawn stdin reader")?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.session)?;
    let mut source = cfg.source.build()?;
    let mut segmenter = cfg.segmenter.build();

    let canvas: FrameSize = source.open()?;
    segmenter.load()?;
    let video = source.next_frame().context("read source frame")?;
    let mask = segmenter.segment(&video).context("segment source frame")?;

    let text = TextLayoutEngine::discover(cfg.font.as_deref());
    let mut animator = Animator::new(canvas, cfg.render.clone(), CpuRasterizer::new(text))?;
    let inputs = TickInputs {
        mask: Some(&mask),
        video: Some(&video),
    };
    for _ in 1..args.ticks.max(1) {
        animator.compose(inputs)?;
    }
    let out = animator.tick(inputs)?;
    let frame = if args.presented {
        animator.present(&out.frame)?
    } else {
        (*out.frame).clone()
    };

    write_png(&frame, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
