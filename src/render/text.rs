//! Font loading, shaping and measurement for glyph strings and the watermark.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{DimensionsError, DimensionsResult};

/// Monospace fonts probed when no font path is configured.
const SYSTEM_MONOSPACE_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Advance of one monospace glyph as a fraction of the font size.
const MONOSPACE_ADVANCE_EM: f64 = 0.6;

/// Shaped layouts kept per engine before the cache is flushed.
const LAYOUT_CACHE_CAP: usize = 512;

/// Width measurement used to size text-dependent boxes.
pub trait TextMetrics {
    /// Horizontal advance of `text` at `font_size` pixels.
    fn advance(&mut self, text: &str, font_size: f32) -> f64;
}

/// Fixed-pitch estimate used when no font is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMetrics;

impl TextMetrics for MonospaceMetrics {
    fn advance(&mut self, text: &str, font_size: f32) -> f64 {
        text.chars().count() as f64 * f64::from(font_size) * MONOSPACE_ADVANCE_EM
    }
}

/// First existing font among `explicit` and the known system monospace fonts.
pub fn discover_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    SYSTEM_MONOSPACE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush;

struct LoadedFont {
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LayoutKey {
    text: String,
    size_bits: u32,
}

/// Parley shaping against a single registered font, with a small layout cache.
///
/// An engine without a font shapes nothing; [`TextMetrics`] falls back to a monospace estimate.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    font: Option<LoadedFont>,
    layouts: HashMap<LayoutKey, parley::Layout<TextBrush>>,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("font", &self.font.as_ref().map(|f| f.family_name.as_str()))
            .field("cached_layouts", &self.layouts.len())
            .finish()
    }
}

impl TextLayoutEngine {
    /// Engine with no font loaded.
    pub fn without_font() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            font: None,
            layouts: HashMap::new(),
        }
    }

    pub fn from_font_bytes(bytes: Vec<u8>) -> DimensionsResult<Self> {
        let mut engine = Self::without_font();
        let families = engine
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            DimensionsError::validation("no font families registered from font bytes")
        })?;
        let family_name = engine
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| DimensionsError::validation("registered font family has no name"))?
            .to_string();

        engine.font = Some(LoadedFont {
            family_name,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        });
        Ok(engine)
    }

    pub fn from_font_path(path: &Path) -> DimensionsResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            DimensionsError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes)
    }

    /// Load the first usable font from `explicit` or the system candidates.
    ///
    /// Never fails: a missing or unreadable font yields an engine without a font.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let Some(path) = discover_font(explicit) else {
            tracing::warn!("no monospace font found; text will not be drawn");
            return Self::without_font();
        };
        match Self::from_font_path(&path) {
            Ok(engine) => {
                tracing::debug!(font = %path.display(), "loaded font");
                engine
            }
            Err(e) => {
                tracing::warn!(error = %e, "font unusable; text will not be drawn");
                Self::without_font()
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub(crate) fn font_data(&self) -> Option<&vello_cpu::peniko::FontData> {
        self.font.as_ref().map(|f| &f.data)
    }

    /// Shaped single-line layout for `text` at `size_px`, or `None` when no font is loaded.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        size_px: f32,
    ) -> DimensionsResult<Option<&parley::Layout<TextBrush>>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(DimensionsError::validation(
                "text size must be finite and > 0",
            ));
        }
        let Some(font) = self.font.as_ref() else {
            return Ok(None);
        };

        let key = LayoutKey {
            text: text.to_owned(),
            size_bits: size_px.to_bits(),
        };
        if !self.layouts.contains_key(&key) {
            if self.layouts.len() >= LAYOUT_CACHE_CAP {
                self.layouts.clear();
            }
            let mut builder = self
                .layout_ctx
                .ranged_builder(&mut self.font_ctx, text, 1.0, true);
            builder.push_default(parley::style::StyleProperty::FontStack(
                parley::style::FontStack::Source(std::borrow::Cow::Owned(
                    font.family_name.clone(),
                )),
            ));
            builder.push_default(parley::style::StyleProperty::FontSize(size_px));
            builder.push_default(parley::style::StyleProperty::Brush(TextBrush));
            let mut layout: parley::Layout<TextBrush> = builder.build(text);
            layout.break_all_lines(None);
            self.layouts.insert(key.clone(), layout);
        }
        Ok(self.layouts.get(&key))
    }
}

impl TextMetrics for TextLayoutEngine {
    fn advance(&mut self, text: &str, font_size: f32) -> f64 {
        match self.layout(text, font_size) {
            Ok(Some(layout)) => f64::from(layout.width()),
            _ => MonospaceMetrics.advance(text, font_size),
        }
    }
}
