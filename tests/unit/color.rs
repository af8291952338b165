use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: ColorValue = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, ColorValue::rgba(1.0, 0.0, 0.0, 1.0));

    let c: ColorValue = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);

    let c: ColorValue = "#fff".parse().unwrap();
    assert_eq!(c.to_rgba8(), Rgba8::WHITE);

    assert!("#12345".parse::<ColorValue>().is_err());
    assert!("#gg0000".parse::<ColorValue>().is_err());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: ColorValue = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, ColorValue::rgba(0.25, 0.5, 0.75, 1.0));

    let c: ColorValue = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, ColorValue::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<ColorValue>(json!([0.1, 0.2])).is_err());
}

#[test]
fn hex_round_trips_through_display_form() {
    let c: ColorValue = "#1a2B3c".parse().unwrap();
    assert_eq!(c.to_hex(), "#1A2B3C");
    let c: ColorValue = "#00000080".parse().unwrap();
    assert_eq!(c.to_hex(), "#00000080");
}

#[test]
fn hsl_primaries() {
    assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgba8(), Rgba8::rgb(255, 0, 0));
    assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_rgba8(), Rgba8::rgb(0, 255, 0));
    assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgba8(), Rgba8::rgb(0, 0, 255));
    assert_eq!(Hsl::new(0.0, 0.0, 100.0).to_rgba8(), Rgba8::WHITE);
}

#[test]
fn hsl_clamps_like_css() {
    // Lightness above 100% is white, negative hue wraps.
    assert_eq!(Hsl::new(200.0, 100.0, 130.0).to_rgba8(), Rgba8::WHITE);
    assert_eq!(
        Hsl::new(-120.0, 100.0, 50.0).to_rgba8(),
        Hsl::new(240.0, 100.0, 50.0).to_rgba8()
    );
    assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgba8_alpha(0.5).a, 128);
}
