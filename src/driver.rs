//! Animation clock, per-tick frame composition, and the cancellable tick loop.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::core::FrameSize;
use crate::foundation::error::{DimensionsError, DimensionsResult};
use crate::frame::VideoFrame;
use crate::grid::{GridGeometry, SpreadsheetHeaders};
use crate::mask::ForegroundMask;
use crate::palette::PaletteCursor;
use crate::params::{ParamUpdate, RenderParams};
use crate::render::cpu::CpuRasterizer;
use crate::render::display_list::DisplayList;
use crate::render::{FrameInputs, FrameRGBA, RenderStats};
use crate::wave::WavePattern;

/// Color clock increment per tick.
pub const COLOR_CHANGE_SPEED: f64 = 0.0015;

/// Monotonic animation clocks. Never reset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationClock {
    time: f64,
    color_time: f64,
}

impl AnimationClock {
    pub fn advance(&mut self, wave_speed: f64) {
        self.time += wave_speed;
        self.color_time += COLOR_CHANGE_SPEED;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn color_time(&self) -> f64 {
        self.color_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Cells,
    TextArt,
}

/// Display list and counters for one tick, before rasterization.
#[derive(Debug, Clone)]
pub struct ComposedTick {
    pub mode: RenderMode,
    pub stats: RenderStats,
    pub list: DisplayList,
}

/// Output of one full tick.
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub mode: RenderMode,
    pub stats: RenderStats,
    /// The cell layer, as captured by recording and screenshots.
    pub frame: Arc<FrameRGBA>,
}

/// Latest producer values read by a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInputs<'a> {
    pub mask: Option<&'a ForegroundMask>,
    pub video: Option<&'a VideoFrame>,
}

#[derive(Debug)]
struct Geometry {
    grid: GridGeometry,
    headers: SpreadsheetHeaders,
    overlay: DisplayList,
    overlay_frame: Option<FrameRGBA>,
}

/// Owns the animation state and render parameters. Lives on the scheduler thread.
#[derive(Debug)]
pub struct Animator {
    canvas: FrameSize,
    params: RenderParams,
    clock: AnimationClock,
    palette: PaletteCursor,
    geometry: Option<Geometry>,
    geometry_revision: u64,
    rasterizer: CpuRasterizer,
}

impl Animator {
    pub fn new(
        canvas: FrameSize,
        params: RenderParams,
        rasterizer: CpuRasterizer,
    ) -> DimensionsResult<Self> {
        params.validate()?;
        Ok(Self {
            canvas,
            params,
            clock: AnimationClock::default(),
            palette: PaletteCursor::new(),
            geometry: None,
            geometry_revision: 0,
            rasterizer,
        })
    }

    pub fn canvas(&self) -> FrameSize {
        self.canvas
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn clock(&self) -> AnimationClock {
        self.clock
    }

    pub fn palette(&self) -> PaletteCursor {
        self.palette
    }

    /// Incremented each time the grid, headers and overlay are rebuilt.
    pub fn geometry_revision(&self) -> u64 {
        self.geometry_revision
    }

    pub fn grid(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref().map(|g| &g.grid)
    }

    pub fn headers(&self) -> Option<&SpreadsheetHeaders> {
        self.geometry.as_ref().map(|g| &g.headers)
    }

    /// Apply a parameter update. A cell-size change invalidates the geometry for the next tick.
    pub fn apply(&mut self, update: ParamUpdate) -> DimensionsResult<()> {
        if self.params.apply(update)? {
            self.geometry = None;
        }
        Ok(())
    }

    /// Advance the clocks, refresh stale geometry, step the palette and build the display list
    /// of exactly one renderer.
    pub fn compose(&mut self, inputs: TickInputs<'_>) -> DimensionsResult<ComposedTick> {
        self.clock.advance(self.params.wave_speed);
        self.ensure_geometry()?;
        self.palette.advance(self.clock.color_time());

        let Some(geometry) = self.geometry.as_ref() else {
            return Err(DimensionsError::render_tick("grid geometry unavailable"));
        };
        let frame_inputs = FrameInputs {
            grid: &geometry.grid,
            params: &self.params,
            time: self.clock.time(),
            color_time: self.clock.color_time(),
            palette: &self.palette,
            mask: inputs.mask,
            video: inputs.video,
        };
        let metrics = self.rasterizer.metrics();
        let (mode, (list, stats)) = if self.params.text_mode() {
            (
                RenderMode::TextArt,
                crate::render::text_art::render_text_art(&frame_inputs, metrics),
            )
        } else {
            (
                RenderMode::Cells,
                crate::render::cells::render_cells(&frame_inputs, metrics),
            )
        };
        Ok(ComposedTick { mode, stats, list })
    }

    pub fn tick(&mut self, inputs: TickInputs<'_>) -> DimensionsResult<TickOutput> {
        let composed = self.compose(inputs)?;
        let frame = self.rasterizer.render(&composed.list)?;
        Ok(TickOutput {
            mode: composed.mode,
            stats: composed.stats,
            frame: Arc::new(frame),
        })
    }

    /// The cell layer with the grid overlay composited on top, as shown to the viewer.
    pub fn present(&mut self, layer: &FrameRGBA) -> DimensionsResult<FrameRGBA> {
        let Some(geometry) = self.geometry.as_mut() else {
            return Ok(layer.clone());
        };
        if geometry.overlay_frame.is_none() {
            geometry.overlay_frame = Some(self.rasterizer.render(&geometry.overlay)?);
        }
        let mut presented = layer.clone();
        if let Some(overlay) = geometry.overlay_frame.as_ref() {
            presented.composite_over(overlay)?;
        }
        Ok(presented)
    }

    fn ensure_geometry(&mut self) -> DimensionsResult<()> {
        if self.geometry.is_some() {
            return Ok(());
        }
        let grid = GridGeometry::new(self.canvas, self.params.cell_size)?;
        let headers = SpreadsheetHeaders::for_grid(&grid);
        let overlay = crate::render::overlay::grid_overlay(&grid);
        self.geometry_revision += 1;
        tracing::debug!(
            cols = grid.cols(),
            rows = grid.rows(),
            cell_size = grid.cell_size(),
            revision = self.geometry_revision,
            "grid geometry rebuilt"
        );
        self.geometry = Some(Geometry {
            grid,
            headers,
            overlay,
            overlay_frame: None,
        });
        Ok(())
    }
}

/// Messages accepted by a running session, drained at the start of each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Update(ParamUpdate),
    ToggleRecording,
    Screenshot,
    Stop,
}

/// Parses one console command: `size 24`, `bg #000000`, `offset 120`, `pattern sinusoidal`,
/// `text hello`, `clear`, `speed 0.02`, `record`, `screenshot`, `stop`.
impl std::str::FromStr for Control {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };
        let need_arg = || {
            if arg.is_empty() {
                Err(format!("'{cmd}' needs an argument"))
            } else {
                Ok(arg)
            }
        };
        let update = match cmd.to_ascii_lowercase().as_str() {
            "size" => ParamUpdate::CellSize(
                need_arg()?
                    .parse()
                    .map_err(|e| format!("invalid cell size: {e}"))?,
            ),
            "bg" => ParamUpdate::Background(need_arg()?.parse()?),
            "offset" => ParamUpdate::SpectrumOffset(
                need_arg()?
                    .parse()
                    .map_err(|e| format!("invalid spectrum offset: {e}"))?,
            ),
            "pattern" => ParamUpdate::WavePattern(WavePattern::from_name(need_arg()?)),
            "text" => ParamUpdate::Text(need_arg()?.to_owned()),
            "clear" => ParamUpdate::ClearText,
            "speed" => ParamUpdate::WaveSpeed(
                need_arg()?
                    .parse()
                    .map_err(|e| format!("invalid wave speed: {e}"))?,
            ),
            "record" => return Ok(Self::ToggleRecording),
            "screenshot" => return Ok(Self::Screenshot),
            "stop" | "quit" => return Ok(Self::Stop),
            "" => return Err("empty command".to_owned()),
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(Self::Update(update))
    }
}

/// Counters reported when the tick loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    pub ticks: u64,
    pub failed_ticks: u64,
}

/// Runs ticks until the running flag is cleared.
///
/// Errors and panics inside a tick are logged and the loop continues with the next tick.
#[derive(Debug, Clone)]
pub struct Scheduler {
    running: Arc<AtomicBool>,
    frame_interval: Option<Duration>,
    max_ticks: Option<u64>,
}

impl Scheduler {
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self {
            running,
            frame_interval: None,
            max_ticks: None,
        }
    }

    /// Pace ticks to one per `interval`. Unpaced by default.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    /// Stop on its own after `n` ticks.
    pub fn with_max_ticks(mut self, n: u64) -> Self {
        self.max_ticks = Some(n);
        self
    }

    pub fn running(&self) -> &Arc<AtomicBool> {
        &self.running
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn run<F>(&self, mut tick: F) -> LoopReport
    where
        F: FnMut(u64) -> DimensionsResult<()>,
    {
        let mut report = LoopReport::default();
        let mut next_deadline = Instant::now();

        while self.running.load(Ordering::SeqCst) {
            if self.max_ticks.is_some_and(|max| report.ticks >= max) {
                break;
            }

            let n = report.ticks;
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| tick(n)));
            report.ticks += 1;
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(DimensionsError::render_tick(e.to_string())),
                Err(payload) => Some(DimensionsError::render_tick(format!(
                    "tick panicked: {}",
                    panic_message(payload.as_ref())
                ))),
            };
            if let Some(err) = failure {
                report.failed_ticks += 1;
                tracing::error!(tick = n, error = %err, "render tick failed");
            }

            if let Some(interval) = self.frame_interval {
                next_deadline += interval;
                let now = Instant::now();
                if next_deadline > now {
                    std::thread::sleep(next_deadline - now);
                } else {
                    next_deadline = now;
                }
            }
        }
        tracing::debug!(
            ticks = report.ticks,
            failed = report.failed_ticks,
            "tick loop exited"
        );
        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
#[path = "../tests/unit/driver.rs"]
mod tests;
