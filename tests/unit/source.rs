use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "dimensions_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

#[test]
fn acquisition_messages_by_cause() {
    let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
    assert_eq!(
        AcquisitionFailure::from_io(&denied).user_message(),
        "Camera permission denied. Please allow camera access."
    );
    let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
    assert_eq!(
        AcquisitionFailure::from_io(&missing).user_message(),
        "No camera found on this device."
    );
    assert_eq!(
        AcquisitionFailure::Busy.user_message(),
        "Camera is already in use by another application."
    );
    assert!(AcquisitionFailure::Busy.into_error().is_fatal());
}

#[test]
fn missing_sequence_is_an_acquisition_error() {
    let mut src = ImageSequenceSource::new(temp_dir("missing").join("nope"));
    let err = src.open().unwrap_err();
    assert!(matches!(err, DimensionsError::Acquisition(_)));
    assert!(err.to_string().contains("No camera found"));
}

#[test]
fn oversized_first_image_is_an_acquisition_error() {
    let dir = temp_dir("oversized");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("wide.png"), u32::from(u16::MAX) + 1, 1, [0, 0, 0, 255]);

    let err = ImageSequenceSource::new(&dir).open().unwrap_err();
    assert!(matches!(err, DimensionsError::Acquisition(_)));
    assert!(err.to_string().contains("Error: "));
    assert!(err.to_string().contains("exceeds"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn image_sequence_loops_in_name_order() {
    let dir = temp_dir("sequence");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("b.png"), 4, 2, [0, 0, 255, 255]);
    write_png(&dir.join("a.png"), 4, 2, [255, 0, 0, 255]);
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let mut src = ImageSequenceSource::new(&dir);
    assert_eq!(src.open().unwrap(), FrameSize::new(4, 2).unwrap());
    assert_eq!(src.len(), 2);
    let reds: Vec<u8> = (0..3).map(|_| src.next_frame().unwrap().pixel(0, 0).r).collect();
    assert_eq!(reds, vec![255, 0, 255]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn mask_sequence_reads_channel_zero() {
    let dir = temp_dir("masks");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("m0.png"), 2, 2, [200, 0, 0, 255]);

    let mut seg = MaskSequenceSegmenter::new(&dir);
    seg.load().unwrap();
    let frame = VideoFrame::filled(
        FrameSize::new(2, 2).unwrap(),
        crate::foundation::core::Rgba8::BLACK,
    );
    let mask = seg.segment(&frame).unwrap();
    assert_eq!(mask.as_bytes(), &[200, 200, 200, 200]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_mask_directory_fails_model_load() {
    let dir = temp_dir("empty_masks");
    std::fs::create_dir_all(&dir).unwrap();
    let err = MaskSequenceSegmenter::new(&dir).load().unwrap_err();
    assert!(matches!(err, DimensionsError::ModelLoad(_)));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn synthetic_source_produces_frames_of_its_size() {
    let size = FrameSize::new(16, 9).unwrap();
    let mut src = SyntheticSource::new(size);
    assert_eq!(src.open().unwrap(), size);
    let a = src.next_frame().unwrap();
    let b = src.next_frame().unwrap();
    assert_eq!(a.size(), size);
    assert_ne!(a, b);
}

#[test]
fn silhouette_covers_head_and_shoulders_but_not_corners() {
    assert!(SilhouetteSegmenter::contains(0.5, 0.5, 0.35));
    assert!(SilhouetteSegmenter::contains(0.5, 0.3, 0.95));
    assert!(!SilhouetteSegmenter::contains(0.5, 0.02, 0.02));
    assert!(!SilhouetteSegmenter::contains(0.5, 0.98, 0.1));

    let frame = VideoFrame::filled(
        FrameSize::new(64, 36).unwrap(),
        crate::foundation::core::Rgba8::BLACK,
    );
    let mut seg = SilhouetteSegmenter::new();
    seg.load().unwrap();
    let mask = seg.segment(&frame).unwrap();
    assert_eq!(mask.size(), frame.size());
    assert_eq!(mask.confidence_at(32, 12), 255);
    assert_eq!(mask.confidence_at(0, 0), 0);
}
