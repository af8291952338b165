use super::*;
use crate::render::text::TextLayoutEngine;

fn animator(w: u32, h: u32) -> Animator {
    Animator::new(
        FrameSize::new(w, h).unwrap(),
        RenderParams::default(),
        CpuRasterizer::new(TextLayoutEngine::without_font()),
    )
    .unwrap()
}

#[test]
fn clock_advances_by_wave_speed_and_color_speed() {
    let mut clock = AnimationClock::default();
    clock.advance(0.015);
    clock.advance(0.015);
    assert!((clock.time() - 0.03).abs() < 1e-12);
    assert!((clock.color_time() - 0.003).abs() < 1e-12);
}

#[test]
fn full_foreground_720p_evaluates_every_cell() {
    let mut a = animator(1280, 720);
    let mask = ForegroundMask::filled(a.canvas(), 255);
    let tick = a
        .compose(TickInputs {
            mask: Some(&mask),
            video: None,
        })
        .unwrap();
    assert_eq!(tick.mode, RenderMode::Cells);
    assert_eq!(tick.stats.cells_evaluated, 64 * 36);
    assert_eq!(tick.stats.foreground_cells, 64 * 36);
    let grid = a.grid().unwrap();
    assert_eq!((grid.cols(), grid.rows()), (64, 36));
    assert_eq!(a.headers().unwrap().columns[63], "BL");
}

#[test]
fn palette_advances_once_per_color_time_unit() {
    let mut a = animator(64, 36);
    while a.clock().color_time() < 1.0 {
        assert_eq!(a.palette().index(), 0);
        a.compose(TickInputs::default()).unwrap();
    }
    assert_eq!(a.palette().index(), 1);
    while a.clock().color_time() < 2.0 {
        a.compose(TickInputs::default()).unwrap();
    }
    assert_eq!(a.palette().index(), 2);
}

#[test]
fn geometry_rebuilds_only_on_cell_size_change() {
    let mut a = animator(100, 50);
    a.compose(TickInputs::default()).unwrap();
    a.compose(TickInputs::default()).unwrap();
    assert_eq!(a.geometry_revision(), 1);

    a.apply(ParamUpdate::SpectrumOffset(90)).unwrap();
    a.apply(ParamUpdate::CellSize(20)).unwrap();
    a.compose(TickInputs::default()).unwrap();
    assert_eq!(a.geometry_revision(), 1);

    a.apply(ParamUpdate::CellSize(30)).unwrap();
    a.compose(TickInputs::default()).unwrap();
    assert_eq!(a.geometry_revision(), 2);
    let grid = a.grid().unwrap();
    assert_eq!((grid.cols(), grid.rows()), (4, 2));
}

#[test]
fn text_selects_text_art_exclusively() {
    let mut a = animator(80, 40);
    let mask = ForegroundMask::filled(a.canvas(), 255);
    let video = VideoFrame::filled(a.canvas(), crate::foundation::core::Rgba8::WHITE);
    let inputs = TickInputs {
        mask: Some(&mask),
        video: Some(&video),
    };

    let cells = a.compose(inputs).unwrap();
    assert_eq!(cells.mode, RenderMode::Cells);
    assert_eq!(cells.list.text_runs().count(), 1);

    a.apply(ParamUpdate::Text("abc".into())).unwrap();
    let art = a.compose(inputs).unwrap();
    assert_eq!(art.mode, RenderMode::TextArt);
    // One glyph run per foreground cell plus the watermark.
    assert_eq!(art.list.text_runs().count(), 8 + 1);

    a.apply(ParamUpdate::ClearText).unwrap();
    assert_eq!(a.compose(inputs).unwrap().mode, RenderMode::Cells);
}

#[test]
fn tick_rasterizes_background_and_present_adds_grid() {
    let mut a = animator(40, 40);
    a.apply(ParamUpdate::Background("#000000".parse().unwrap()))
        .unwrap();
    let out = a.tick(TickInputs::default()).unwrap();
    assert_eq!(out.frame.pixel(10, 10), [0, 0, 0, 255]);

    let presented = a.present(&out.frame).unwrap();
    assert_eq!(presented.pixel(10, 10), [0, 0, 0, 255]);
    // Vertical line at x = 20 straddles pixels 19 and 20.
    assert!(presented.pixel(20, 10)[0] > 0);
}

#[test]
fn scheduler_survives_errors_and_panics() {
    let running = Arc::new(AtomicBool::new(true));
    let scheduler = Scheduler::new(Arc::clone(&running)).with_max_ticks(5);
    let mut seen = Vec::new();
    let report = scheduler.run(|n| {
        seen.push(n);
        match n {
            1 => Err(DimensionsError::validation("bad frame")),
            3 => panic!("boom"),
            _ => Ok(()),
        }
    });
    assert_eq!(report.ticks, 5);
    assert_eq!(report.failed_ticks, 2);
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn clearing_the_running_flag_exits_before_the_next_tick() {
    let running = Arc::new(AtomicBool::new(true));
    let scheduler = Scheduler::new(Arc::clone(&running));
    let report = scheduler.run(|n| {
        if n == 2 {
            running.store(false, Ordering::SeqCst);
        }
        Ok(())
    });
    assert_eq!(report.ticks, 3);

    let report = scheduler.run(|_| Ok(()));
    assert_eq!(report.ticks, 0);
}

#[test]
fn console_commands_map_onto_controls() {
    assert_eq!(
        "size 24".parse::<Control>().unwrap(),
        Control::Update(ParamUpdate::CellSize(24))
    );
    assert_eq!(
        "pattern Sinusoidal".parse::<Control>().unwrap(),
        Control::Update(ParamUpdate::WavePattern(WavePattern::Sinusoidal))
    );
    assert_eq!(
        "text hello world".parse::<Control>().unwrap(),
        Control::Update(ParamUpdate::Text("hello world".to_owned()))
    );
    assert_eq!(
        "  clear ".parse::<Control>().unwrap(),
        Control::Update(ParamUpdate::ClearText)
    );
    assert_eq!(
        "record".parse::<Control>().unwrap(),
        Control::ToggleRecording
    );
    assert_eq!("stop".parse::<Control>().unwrap(), Control::Stop);
    assert_eq!(
        "pattern spiral".parse::<Control>().unwrap(),
        Control::Update(ParamUpdate::WavePattern(WavePattern::Radial))
    );
    assert!(matches!(
        "bg #000000".parse::<Control>().unwrap(),
        Control::Update(ParamUpdate::Background(_))
    ));
}

#[test]
fn malformed_commands_are_rejected() {
    assert!("size".parse::<Control>().is_err());
    assert!("size big".parse::<Control>().is_err());
    assert!("pattern".parse::<Control>().is_err());
    assert!("bg notacolor".parse::<Control>().is_err());
    assert!("dance".parse::<Control>().is_err());
    assert!("".parse::<Control>().is_err());
}
