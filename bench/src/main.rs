use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use serde_json::json;

use dimensions::{
    Animator, CpuRasterizer, Fps, ForegroundMask, FrameSize, InMemorySink, ParamUpdate,
    Recorder, RenderParams, Segmenter, SilhouetteSegmenter, SinkConfig, TextLayoutEngine,
    TickInputs, VideoFrame, WavePattern,
};

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    ticks: u32,
    warmup: u32,
    repeats: u32,
    mode: Mode,
    cell_size: u32,
    pattern: WavePattern,
    record: bool,
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Cells,
    Text,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    setup: Duration,
    tick_total: Duration,
    present_total: Duration,
    record_total: Duration,
    wall_total: Duration,
    foreground_cells: u64,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.width == 0 || args.height == 0 {
        anyhow::bail!("--width/--height must be > 0");
    }
    if args.ticks == 0 || args.repeats == 0 {
        anyhow::bail!("--ticks and --repeats must be > 0");
    }
    if args.cell_size == 0 {
        anyhow::bail!("--cell-size must be >= 1");
    }

    let canvas = FrameSize::new(args.width, args.height)?;
    let (video, mask) = bench_inputs(canvas)?;

    if args.warmup > 0 {
        eprintln!("warmup: {} run(s)", args.warmup);
        for _ in 0..args.warmup {
            let _ = run_once(&args, canvas, &video, &mask)?;
        }
    }

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), {ticks} ticks/run at {w}x{h}, mode={mode:?}, cell={cell}, pattern={pattern}, record={record}",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        ticks = args.ticks,
        w = args.width,
        h = args.height,
        mode = args.mode,
        cell = args.cell_size,
        pattern = args.pattern,
        record = if args.record { "yes" } else { "no" },
    );

    let mut runs = Vec::<RunMetrics>::with_capacity(args.repeats as usize);
    for _ in 0..args.repeats {
        runs.push(run_once(&args, canvas, &video, &mask)?);
    }

    report_percentiles(&runs, args.ticks);
    if args.json {
        let summary = json!({
            "width": args.width,
            "height": args.height,
            "ticks": args.ticks,
            "repeats": args.repeats,
            "mode": format!("{:?}", args.mode).to_lowercase(),
            "cell_size": args.cell_size,
            "pattern": args.pattern.name(),
            "tick_ms_p50": per_tick_ms(&runs, args.ticks, 0.50),
            "tick_ms_p90": per_tick_ms(&runs, args.ticks, 0.90),
            "foreground_cells": runs.last().map(|m| m.foreground_cells).unwrap_or(0),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

/// A still camera frame and a silhouette mask for it.
fn bench_inputs(canvas: FrameSize) -> anyhow::Result<(VideoFrame, ForegroundMask)> {
    let mut rgba = Vec::with_capacity(canvas.rgba_len());
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            let v = ((x ^ y) & 0xff) as u8;
            rgba.extend_from_slice(&[v, v / 2, 255 - v, 255]);
        }
    }
    let video = VideoFrame::from_rgba(canvas, rgba)?;
    let mut segmenter = SilhouetteSegmenter::new();
    segmenter.load()?;
    let mask = segmenter
        .segment(&video)
        .context("segment bench frame")?;
    Ok((video, mask))
}

fn run_once(
    args: &BenchArgs,
    canvas: FrameSize,
    video: &VideoFrame,
    mask: &ForegroundMask,
) -> anyhow::Result<RunMetrics> {
    let mut m = RunMetrics::default();
    let wall0 = Instant::now();

    let t0 = Instant::now();
    let mut params = RenderParams::default();
    params.apply(ParamUpdate::CellSize(args.cell_size))?;
    params.apply(ParamUpdate::WavePattern(args.pattern))?;
    if args.mode == Mode::Text {
        params.apply(ParamUpdate::Text("dimensions".to_owned()))?;
    }
    let text = TextLayoutEngine::discover(None);
    let mut animator = Animator::new(canvas, params, CpuRasterizer::new(text))?;

    let sink = Arc::new(Mutex::new(InMemorySink::new()));
    let mut recorder = Recorder::new(60.0).with_queue_capacity(args.ticks as usize);
    if args.record {
        recorder.start(
            Arc::clone(&sink),
            SinkConfig {
                size: canvas,
                fps: Fps::new(30, 1)?,
            },
            "bench.webm".into(),
        )?;
    }
    m.setup = t0.elapsed();

    let inputs = TickInputs {
        mask: Some(mask),
        video: Some(video),
    };
    for _ in 0..args.ticks {
        let t = Instant::now();
        let out = animator.tick(inputs)?;
        m.tick_total += t.elapsed();
        m.foreground_cells = out.stats.foreground_cells as u64;

        let t = Instant::now();
        let _presented = animator.present(&out.frame)?;
        m.present_total += t.elapsed();

        let t = Instant::now();
        if let Some(mut job) = recorder.on_tick(&out.frame) {
            job.wait()
                .context("recording job already finished")??;
            anyhow::bail!("encoder exited while recording");
        }
        m.record_total += t.elapsed();
    }

    if let Some(mut job) = recorder.stop() {
        let t = Instant::now();
        job.wait()
            .context("recording job already finished")??;
        m.record_total += t.elapsed();
        let frames = sink
            .lock()
            .map_err(|_| anyhow::anyhow!("bench sink poisoned"))?
            .frames()
            .len();
        if frames == 0 {
            anyhow::bail!("recording produced no frames");
        }
    }

    m.wall_total = wall0.elapsed();
    Ok(m)
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 1280,
        height: 720,
        ticks: 120,
        warmup: 1,
        repeats: 10,
        mode: Mode::Cells,
        cell_size: 20,
        pattern: WavePattern::Radial,
        record: false,
        json: false,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--ticks" => out.ticks = parse_u32(args.next(), "--ticks")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--cell-size" => out.cell_size = parse_u32(args.next(), "--cell-size")?,
            "--mode" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --mode (cells|text)"))?;
                out.mode = match v.as_str() {
                    "cells" => Mode::Cells,
                    "text" => Mode::Text,
                    _ => anyhow::bail!("unknown --mode '{v}' (expected cells or text)"),
                };
            }
            "--pattern" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --pattern"))?;
                out.pattern = WavePattern::lookup(&v)
                    .ok_or_else(|| anyhow::anyhow!("unknown --pattern '{v}'"))?;
            }
            "--record" => out.record = true,
            "--json" => out.json = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        "dimensions-bench: tick throughput of the CPU render loop

USAGE:
  cargo run -p dimensions-bench --release -- [options]

OPTIONS:
  --width <px>        canvas width (default 1280)
  --height <px>       canvas height (default 720)
  --ticks <n>         ticks per run (default 120)
  --warmup <n>        untimed runs first (default 1)
  --repeats <n>       timed runs (default 10)
  --mode <cells|text> renderer (default cells)
  --cell-size <px>    grid cell size (default 20)
  --pattern <name>    radial, horizontal, vertical, sinusoidal, random
  --record            feed every frame to an in-memory recorder
  --json              print a JSON summary on stdout"
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("invalid value for {flag}: '{v}'"))
}

fn sorted(runs: &[RunMetrics], f: fn(&RunMetrics) -> Duration) -> Vec<Duration> {
    let mut v = runs.iter().map(f).collect::<Vec<_>>();
    v.sort_by_key(|d| d.as_nanos());
    v
}

fn percentile(v: &[Duration], p: f64) -> Duration {
    if v.is_empty() {
        return Duration::ZERO;
    }
    let n = v.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    v[rank - 1]
}

fn per_tick_ms(runs: &[RunMetrics], ticks: u32, p: f64) -> f64 {
    let v = sorted(runs, |m| m.tick_total);
    percentile(&v, p).as_secs_f64() * 1000.0 / f64::from(ticks.max(1))
}

fn report_percentiles(runs: &[RunMetrics], ticks: u32) {
    type Field = (&'static str, fn(&RunMetrics) -> Duration);

    fn fmt_ms(d: Duration) -> String {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    }

    let fields: &[Field] = &[
        ("setup", |m| m.setup),
        ("tick_total", |m| m.tick_total),
        ("present_total", |m| m.present_total),
        ("record_total", |m| m.record_total),
        ("wall_total", |m| m.wall_total),
    ];

    eprintln!("\npercentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let v = sorted(runs, *getter);
        eprintln!(
            "  {name:14} p50={p50:>10}  p90={p90:>10}  p99={p99:>10}",
            name = *name,
            p50 = fmt_ms(percentile(&v, 0.50)),
            p90 = fmt_ms(percentile(&v, 0.90)),
            p99 = fmt_ms(percentile(&v, 0.99)),
        );
    }
    eprintln!(
        "  per tick       p50={:.3}ms",
        per_tick_ms(runs, ticks, 0.50)
    );
}
