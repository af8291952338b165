use super::*;

fn size(w: u32, h: u32) -> FrameSize {
    FrameSize::new(w, h).unwrap()
}

#[test]
fn rejects_mismatched_buffers() {
    assert!(ForegroundMask::from_confidence(size(4, 4), vec![0; 15]).is_err());
    assert!(ForegroundMask::from_rgba_channel0(size(2, 2), &[0; 15]).is_err());
}

#[test]
fn uses_channel_zero_of_rgba() {
    let rgba = [200, 0, 0, 255, 10, 255, 255, 255];
    let m = ForegroundMask::from_rgba_channel0(size(2, 1), &rgba).unwrap();
    assert_eq!(m.as_bytes(), &[200, 10]);
}

#[test]
fn threshold_is_strictly_above_128() {
    let frame = size(40, 20);
    let grid = GridGeometry::new(frame, 20).unwrap();
    let mut conf = vec![0u8; frame.pixel_count()];
    conf[10 * 40 + 10] = 128;
    conf[10 * 40 + 30] = 129;
    let mask = ForegroundMask::from_confidence(frame, conf).unwrap();
    let sampler = MaskSampler::new(&mask, grid);
    assert!(!sampler.is_foreground(0, 0));
    assert!(sampler.is_foreground(1, 0));
}

#[test]
fn samples_a_single_center_pixel_not_an_average() {
    let frame = size(20, 20);
    let grid = GridGeometry::new(frame, 20).unwrap();
    let mut conf = vec![255u8; frame.pixel_count()];
    conf[10 * 20 + 10] = 0;
    let mask = ForegroundMask::from_confidence(frame, conf).unwrap();
    assert!(!MaskSampler::new(&mask, grid).is_foreground(0, 0));
}

#[test]
fn partial_edge_cells_sample_the_clamped_edge_pixel() {
    let frame = size(30, 30);
    let grid = GridGeometry::new(frame, 20).unwrap();
    let mut conf = vec![0u8; frame.pixel_count()];
    conf[29 * 30 + 29] = 255;
    let mask = ForegroundMask::from_confidence(frame, conf).unwrap();
    let sampler = MaskSampler::new(&mask, grid);
    assert_eq!(sampler.sample_point(1, 1), (29, 29));
    assert!(sampler.is_foreground(1, 1));
}

#[test]
fn lower_resolution_masks_are_mapped_proportionally() {
    let canvas = size(40, 40);
    let grid = GridGeometry::new(canvas, 20).unwrap();
    // 2x2 mask: only bottom-right quadrant is foreground.
    let mask = ForegroundMask::from_confidence(size(2, 2), vec![0, 0, 0, 255]).unwrap();
    let sampler = MaskSampler::new(&mask, grid);
    assert!(!sampler.is_foreground(0, 0));
    assert!(!sampler.is_foreground(1, 0));
    assert!(sampler.is_foreground(1, 1));
}
