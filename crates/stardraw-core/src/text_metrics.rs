//! Text measurement and the approximate text layout used for bounds.

use crate::config::GeometryConfig;
use crate::elements::{ElementId, FontFamily, Text};
use crate::geometry::BoundingBox;
use std::collections::HashMap;
use std::sync::RwLock;

/// Measures the advance width of a single line of text.
pub trait TextMeasurer {
    /// Width of `text` in viewbox units at `font_size`.
    fn measure(&self, text: &str, font_size: f64, family: FontFamily) -> f64;
}

/// Character-count based measurement.
///
/// Used when no real font metrics are available (tests, headless hosts).
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl ApproximateMeasurer {
    /// Average character width as a fraction of the font size.
    pub fn char_width_factor(family: FontFamily) -> f64 {
        match family {
            FontFamily::HandDrawn => 0.55,
            FontFamily::Normal => 0.52,
            FontFamily::Monospace => 0.6,
        }
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, text: &str, font_size: f64, family: FontFamily) -> f64 {
        text.chars().count() as f64 * font_size * Self::char_width_factor(family)
    }
}

/// Cache key: font family plus the exact bits of the font size.
type FontKey = (FontFamily, u64);

/// Memoizing wrapper around another measurer.
///
/// Results are cached per `(family, size)` and then per string, so repeated
/// measurement during pointer moves only hits the inner measurer once.
#[derive(Debug, Default)]
pub struct CachedMeasurer<M> {
    inner: M,
    cache: RwLock<HashMap<FontKey, HashMap<String, f64>>>,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Number of cached measurements.
    pub fn len(&self) -> usize {
        self.cache
            .read()
            .map(|cache| cache.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached measurement (e.g. after fonts finish loading).
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure(&self, text: &str, font_size: f64, family: FontFamily) -> f64 {
        let key = (family, font_size.to_bits());
        if let Some(width) = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&key).and_then(|by_text| by_text.get(text).copied()))
        {
            return width;
        }

        let width = self.inner.measure(text, font_size, family);
        log::debug!("measured {:?} at {} {}: {}", text, family.name(), font_size, width);
        if let Ok(mut cache) = self.cache.write() {
            cache.entry(key).or_default().insert(text.to_string(), width);
        }
        width
    }
}

/// Bounds reported by the renderer after real layout, keyed by element.
pub type MeasuredBounds = HashMap<ElementId, BoundingBox>;

/// Everything needed to compute text bounds.
///
/// Measured bounds, when present for an element, take precedence over the
/// approximation.
#[derive(Clone, Copy)]
pub struct TextLayout<'a> {
    measurer: &'a dyn TextMeasurer,
    measured: Option<&'a MeasuredBounds>,
    line_height: f64,
}

impl<'a> TextLayout<'a> {
    /// Default line height as a multiple of font size.
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            measurer,
            measured: None,
            line_height: Self::DEFAULT_LINE_HEIGHT,
        }
    }

    pub fn from_config(measurer: &'a dyn TextMeasurer, config: &GeometryConfig) -> Self {
        Self::new(measurer).with_line_height(config.line_height)
    }

    pub fn with_measured_bounds(mut self, measured: &'a MeasuredBounds) -> Self {
        self.measured = Some(measured);
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn measure(&self, text: &str, font_size: f64, family: FontFamily) -> f64 {
        self.measurer.measure(text, font_size, family)
    }

    /// Renderer-measured bounds for an element, if any.
    pub fn measured_bounds(&self, id: ElementId) -> Option<BoundingBox> {
        self.measured.and_then(|m| m.get(&id).copied())
    }

    /// Split text into visual lines: explicit newlines, then greedy word
    /// wrapping at `wrap_width` when set. A word wider than the wrap width
    /// keeps a line to itself.
    pub fn wrap_lines(&self, text: &Text) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.content.split('\n') {
            let Some(wrap_width) = text.wrap_width else {
                lines.push(paragraph.to_string());
                continue;
            };

            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if current.is_empty() {
                    current.push_str(word);
                    continue;
                }
                let candidate = format!("{current} {word}");
                if self.measure(&candidate, text.font_size, text.font_family) <= wrap_width {
                    current = candidate;
                } else {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Bounds of a text element in local (unrotated) space.
    pub fn text_bounds(&self, text: &Text) -> BoundingBox {
        if let Some(bounds) = self.measured_bounds(text.id) {
            return bounds;
        }

        let lines = self.wrap_lines(text);
        let width = lines
            .iter()
            .map(|line| self.measure(line, text.font_size, text.font_family))
            .fold(0.0, f64::max);
        let height = text.font_size * self.line_height * lines.len().max(1) as f64;
        let x = text.position.x - width * text.text_align.anchor_fraction();

        BoundingBox::new(x, text.position.y, width, height)
    }
}
