use super::*;

#[test]
fn frame_size_rejects_zero_and_oversized() {
    assert!(FrameSize::new(0, 10).is_err());
    assert!(FrameSize::new(10, 0).is_err());
    assert!(FrameSize::new(70_000, 10).is_err());
    let s = FrameSize::new(1280, 720).unwrap();
    assert_eq!(s.pixel_count(), 921_600);
    assert_eq!(s.rgba_len(), 3_686_400);
    assert_eq!(s.to_string(), "1280x720");
}

#[test]
fn fps_validation_and_frame_duration() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.as_f64() - 60.0).abs() < 1e-12);
    assert_eq!(fps.frame_duration().as_micros(), 16_666);
}

#[test]
fn premultiply_keeps_opaque_and_zeroes_transparent() {
    assert_eq!(Rgba8::rgb(10, 20, 30).to_premul(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::new(200, 100, 50, 0).to_premul(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::new(255, 255, 255, 128).to_premul(), [128, 128, 128, 128]);
}

#[test]
fn alpha_from_fraction_rounds() {
    assert_eq!(Rgba8::with_alpha_f(0, 17, 0, 0.9).a, 230);
    assert_eq!(Rgba8::with_alpha_f(0, 0, 0, 2.0).a, 255);
}
