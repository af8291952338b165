use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DimensionsError::acquisition("x")
            .to_string()
            .contains("acquisition error:")
    );
    assert!(
        DimensionsError::model_load("x")
            .to_string()
            .contains("model load error:")
    );
    assert!(
        DimensionsError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(
        DimensionsError::render_tick("x")
            .to_string()
            .contains("render tick error:")
    );
    assert!(
        DimensionsError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn only_startup_failures_are_fatal() {
    assert!(DimensionsError::acquisition("no camera").is_fatal());
    assert!(DimensionsError::model_load("no model").is_fatal());
    assert!(!DimensionsError::capture("disk full").is_fatal());
    assert!(!DimensionsError::render_tick("boom").is_fatal());
    assert!(!DimensionsError::validation("bad").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DimensionsError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
