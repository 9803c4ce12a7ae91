//! Tolerant scene import.
//!
//! Reads scenes written by older versions or other tools. The whole import
//! fails only for unreadable JSON or a missing `elements` array; anything
//! wrong inside a single element either falls back to a default or skips
//! that element.

use crate::elements::{
    Arrowhead, Binding, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, Element, ElementId,
    ElementStyle, FontFamily, FontSizePreset, Layer, Line, LineKind, Path, PathKind, Shape,
    ShapeKind, Text, TextAlign,
};
use crate::error::{ImportError, ImportResult};
use kurbo::Point;
use serde_json::Value;
use uuid::Uuid;

/// Parse every readable element of a scene document.
pub fn parse_elements(json: &str) -> ImportResult<Vec<Element>> {
    let data: Value = serde_json::from_str(json)?;
    let entries = data
        .get("elements")
        .and_then(|e| e.as_array())
        .ok_or(ImportError::MissingElements)?;

    let mut elements = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match parse_element(entry) {
            Ok(element) => elements.push(element),
            Err(reason) => log::warn!("Skipping element {index}: {reason}"),
        }
    }

    log::info!(
        "Imported {} elements ({} skipped)",
        elements.len(),
        entries.len() - elements.len()
    );
    Ok(elements)
}

/// SVG-style transform rotating by `degrees` around `center`.
pub fn rotation_transform(degrees: f64, center: Point) -> String {
    format!("rotate({} {} {})", degrees, center.x, center.y)
}

/// Angle of the first `rotate(...)` in an SVG-style transform string.
pub fn parse_rotation_transform(transform: &str) -> Option<f64> {
    let start = transform.find("rotate(")? + "rotate(".len();
    let rest = &transform[start..];
    let args = &rest[..rest.find(')')?];
    args.split(|c: char| c.is_whitespace() || c == ',')
        .find(|s| !s.is_empty())?
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
}

fn parse_element(entry: &Value) -> Result<Element, &'static str> {
    if !entry.is_object() {
        return Err("not an object");
    }
    let ty = entry.get("type").and_then(Value::as_str).ok_or("missing type")?;

    let mut element: Element = match ty {
        "shape" => {
            let kind = match entry.get("kind").and_then(Value::as_str) {
                None => ShapeKind::Rect,
                Some(name) => shape_kind(name).ok_or("unknown shape kind")?,
            };
            parse_shape(entry, kind).into()
        }
        "rect" | "rectangle" | "ellipse" | "diamond" => {
            parse_shape(entry, shape_kind(ty).ok_or("unknown shape kind")?).into()
        }
        "line" | "arrow" => parse_line(entry, ty == "arrow")?.into(),
        "path" => parse_path(entry)?.into(),
        "text" => parse_text(entry).into(),
        _ => return Err("unknown element type"),
    };

    if let Some(raw) = entry.get("id").and_then(Value::as_str) {
        set_id(&mut element, parse_id(raw));
    }
    if let Some(layer) = entry.get("layer").and_then(Value::as_str).and_then(Layer::from_name) {
        element.set_layer(layer);
    }
    *element.style_mut() = parse_style(entry);
    element.set_rotation(parse_rotation(entry));
    let created_at = number(entry.get("created_at")).map_or(0, |t| t.max(0.0) as u64);
    set_created_at(&mut element, created_at);
    Ok(element)
}

fn shape_kind(name: &str) -> Option<ShapeKind> {
    match name {
        "rect" | "rectangle" => Some(ShapeKind::Rect),
        "ellipse" => Some(ShapeKind::Ellipse),
        "diamond" => Some(ShapeKind::Diamond),
        _ => None,
    }
}

fn parse_shape(entry: &Value, kind: ShapeKind) -> Shape {
    let mut x = number(entry.get("x")).unwrap_or(0.0);
    let mut y = number(entry.get("y")).unwrap_or(0.0);
    let mut width = number(entry.get("width")).unwrap_or(0.0);
    let mut height = number(entry.get("height")).unwrap_or(0.0);
    // Boxes drawn right-to-left or bottom-to-top
    if width < 0.0 {
        x += width;
        width = -width;
    }
    if height < 0.0 {
        y += height;
        height = -height;
    }
    Shape::new(kind, x, y, width, height)
}

fn parse_line(entry: &Value, is_arrow: bool) -> Result<Line, &'static str> {
    let start = point(entry.get("start")).ok_or("line without start")?;
    let end = point(entry.get("end")).ok_or("line without end")?;

    let mut line = if is_arrow { Line::arrow(start, end) } else { Line::new(start, end) };
    match entry.get("kind").and_then(Value::as_str) {
        Some("arrow") => line.kind = LineKind::Arrow,
        Some("line") => line.kind = LineKind::Line,
        _ => {}
    }
    line.midpoint = point(entry.get("midpoint"));
    line.start_binding = binding(entry.get("start_binding"));
    line.end_binding = binding(entry.get("end_binding"));
    if let Some(head) = entry.get("start_arrowhead") {
        line.start_arrowhead = arrowhead(head);
    }
    if let Some(head) = entry.get("end_arrowhead") {
        line.end_arrowhead = arrowhead(head);
    }
    Ok(line)
}

fn parse_path(entry: &Value) -> Result<Path, &'static str> {
    let raw = entry
        .get("points")
        .and_then(Value::as_array)
        .ok_or("path without points")?;
    let points: Vec<Point> = raw.iter().filter_map(|p| point(Some(p))).collect();

    let mut path = Path::from_points(points);
    if entry.get("kind").and_then(Value::as_str) == Some("highlighter") {
        path.kind = PathKind::Highlighter;
    }
    Ok(path)
}

fn parse_text(entry: &Value) -> Text {
    let position = point(entry.get("position")).unwrap_or_else(|| {
        Point::new(
            number(entry.get("x")).unwrap_or(0.0),
            number(entry.get("y")).unwrap_or(0.0),
        )
    });
    let content = entry.get("content").and_then(Value::as_str).unwrap_or("");

    let font_size = match entry.get("font_size") {
        Some(Value::String(name)) => FontSizePreset::from_name(name).map(FontSizePreset::size),
        other => number(other),
    }
    .filter(|s| *s > 0.0)
    .unwrap_or_else(|| FontSizePreset::Medium.size());

    let mut text = Text::new(position, content).with_font_size(font_size);
    if let Some(family) = entry.get("font_family").and_then(Value::as_str).and_then(FontFamily::from_name) {
        text.font_family = family;
    }
    if let Some(align) = entry.get("text_align").and_then(Value::as_str).and_then(TextAlign::from_name) {
        text.text_align = align;
    }
    text.wrap_width = number(entry.get("wrap_width")).filter(|w| *w > 0.0);
    text
}

/// Style from the nested `style` object, or flat on the element.
fn parse_style(entry: &Value) -> ElementStyle {
    let source = entry.get("style").filter(|s| s.is_object()).unwrap_or(entry);
    ElementStyle {
        stroke_color: source
            .get("stroke_color")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_STROKE_COLOR)
            .to_string(),
        stroke_width: number(source.get("stroke_width"))
            .filter(|w| *w >= 0.0)
            .unwrap_or(DEFAULT_STROKE_WIDTH),
        dash_length: number(source.get("dash_length")).unwrap_or(0.0).max(0.0),
        dash_gap: number(source.get("dash_gap")).unwrap_or(0.0).max(0.0),
        fill_color: source.get("fill_color").and_then(Value::as_str).and_then(fill),
        opacity: number(source.get("opacity")).map_or(1.0, |o| o.clamp(0.0, 1.0)),
    }
}

fn fill(color: &str) -> Option<String> {
    match color.trim() {
        "" | "none" | "transparent" => None,
        c => Some(c.to_string()),
    }
}

fn parse_rotation(entry: &Value) -> f64 {
    number(entry.get("rotation"))
        .or_else(|| {
            entry
                .get("transform")
                .and_then(Value::as_str)
                .and_then(parse_rotation_transform)
        })
        .unwrap_or(0.0)
}

/// Identifiers that are not UUIDs map to a stable v5 UUID, so every
/// reference to the same raw id resolves to the same element.
fn parse_id(raw: &str) -> ElementId {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes()))
}

fn binding(value: Option<&Value>) -> Option<Binding> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    let raw_id = value.get("element_id").and_then(Value::as_str);
    let anchor = point(value.get("anchor"));
    match (raw_id, anchor) {
        (Some(raw_id), Some(anchor)) => Some(Binding::new(
            parse_id(raw_id),
            Point::new(anchor.x.clamp(0.0, 1.0), anchor.y.clamp(0.0, 1.0)),
        )),
        _ => {
            log::debug!("Dropping malformed binding {value}");
            None
        }
    }
}

fn arrowhead(value: &Value) -> Arrowhead {
    value
        .as_str()
        .and_then(Arrowhead::from_name)
        .unwrap_or(Arrowhead::None)
}

/// A finite number, given as a JSON number or a numeric string.
fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// `{"x": .., "y": ..}` or `[x, y]`.
fn point(value: Option<&Value>) -> Option<Point> {
    let value = value?;
    let (x, y) = match value {
        Value::Array(items) => (items.first(), items.get(1)),
        Value::Object(_) => (value.get("x"), value.get("y")),
        _ => return None,
    };
    Some(Point::new(number(x)?, number(y)?))
}

fn set_id(element: &mut Element, id: ElementId) {
    match element {
        Element::Path(e) => e.id = id,
        Element::Line(e) => e.id = id,
        Element::Shape(e) => e.id = id,
        Element::Text(e) => e.id = id,
    }
}

fn set_created_at(element: &mut Element, created_at: u64) {
    match element {
        Element::Path(e) => e.created_at = created_at,
        Element::Line(e) => e.created_at = created_at,
        Element::Shape(e) => e.created_at = created_at,
        Element::Text(e) => e.created_at = created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json() {
        match parse_elements("{not json") {
            Err(ImportError::InvalidJson(_)) => {}
            other => panic!("Expected InvalidJson, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_elements() {
        match parse_elements(r#"{"elements": {}}"#) {
            Err(ImportError::MissingElements) => {}
            other => panic!("Expected MissingElements, got {other:?}"),
        }
        assert!(matches!(parse_elements("{}"), Err(ImportError::MissingElements)));
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let json = r#"{"elements": [
            42,
            {"type": "hexagon"},
            {"type": "line", "start": {"x": 1}},
            {"type": "path", "points": "none"},
            {"type": "shape", "kind": "rect", "x": 1, "y": 2, "width": 3, "height": 4}
        ]}"#;
        let elements = parse_elements(json).unwrap();
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Shape(s) => {
                assert_eq!(s.kind, ShapeKind::Rect);
                assert!((s.height - 4.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected Shape"),
        }
    }

    #[test]
    fn test_numeric_strings_and_defaults() {
        let json = r#"{"elements": [
            {"type": "ellipse", "x": "10.5", "y": " 2 ", "width": "oops", "height": 4,
             "style": {"stroke_width": "bad", "opacity": "0.5", "fill_color": "transparent"}},
            {"type": "text", "position": [5, 6], "content": "hi", "font_size": "huge"}
        ]}"#;
        let elements = parse_elements(json).unwrap();
        match &elements[0] {
            Element::Shape(s) => {
                assert_eq!(s.kind, ShapeKind::Ellipse);
                assert!((s.x - 10.5).abs() < f64::EPSILON);
                assert!((s.y - 2.0).abs() < f64::EPSILON);
                assert!(s.width.abs() < f64::EPSILON);
                assert!((s.style.stroke_width - 2.0).abs() < f64::EPSILON);
                assert!((s.style.opacity - 0.5).abs() < f64::EPSILON);
                assert_eq!(s.style.fill_color, None);
            }
            _ => panic!("Expected Shape"),
        }
        match &elements[1] {
            Element::Text(t) => {
                assert_eq!(t.position, Point::new(5.0, 6.0));
                assert!((t.font_size - FontSizePreset::Medium.size()).abs() < f64::EPSILON);
            }
            _ => panic!("Expected Text"),
        }
    }

    #[test]
    fn test_flat_style_and_fill() {
        let json = r##"{"elements": [
            {"type": "shape", "kind": "diamond", "width": 2, "height": 2,
             "stroke_color": "#ff0000", "fill_color": "#00ff00"}
        ]}"##;
        let elements = parse_elements(json).unwrap();
        let style = elements[0].style();
        assert_eq!(style.stroke_color, "#ff0000");
        assert_eq!(style.fill_color.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_rotation_from_transform() {
        let json = r#"{"elements": [
            {"type": "shape", "width": 10, "height": 10, "transform": "rotate(30 5 5)"},
            {"type": "shape", "width": 10, "height": 10, "rotation": "45", "transform": "rotate(30 5 5)"}
        ]}"#;
        let elements = parse_elements(json).unwrap();
        assert!((elements[0].rotation() - 30.0).abs() < f64::EPSILON);
        assert!((elements[1].rotation() - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotation_transform_strings() {
        let transform = rotation_transform(37.5, Point::new(10.0, 20.0));
        assert_eq!(transform, "rotate(37.5 10 20)");
        assert_eq!(parse_rotation_transform(&transform), Some(37.5));
        assert_eq!(parse_rotation_transform("translate(1 2) rotate(-90,0,0)"), Some(-90.0));
        assert_eq!(parse_rotation_transform("scale(2)"), None);
        assert_eq!(parse_rotation_transform("rotate(abc)"), None);
    }

    #[test]
    fn test_non_uuid_ids_keep_bindings_connected() {
        let json = r#"{"elements": [
            {"type": "shape", "id": "box-1", "x": 10, "y": -2, "width": 4, "height": 4},
            {"type": "line", "id": "wire", "start": {"x": 0, "y": 0}, "end": {"x": 10, "y": 0},
             "end_binding": {"element_id": "box-1", "anchor": {"x": 0, "y": 0.5}},
             "start_binding": {"element_id": 7}}
        ]}"#;
        let elements = parse_elements(json).unwrap();
        assert_eq!(elements.len(), 2);
        let box_id = elements[0].id();
        assert_eq!(box_id, Uuid::new_v5(&Uuid::NAMESPACE_OID, b"box-1"));
        match &elements[1] {
            Element::Line(l) => {
                assert_eq!(l.end_binding, Some(Binding::new(box_id, Point::new(0.0, 0.5))));
                assert_eq!(l.start_binding, None);
                assert_eq!(l.end_arrowhead, Arrowhead::None);
            }
            _ => panic!("Expected Line"),
        }
    }

    #[test]
    fn test_uuid_ids_are_kept() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"elements": [{{"type": "path", "id": "{id}", "points": [[0, 0], {{"x": 1, "y": 1}}], "kind": "highlighter", "layer": "background"}}]}}"#);
        let elements = parse_elements(&json).unwrap();
        assert_eq!(elements[0].id(), id);
        assert_eq!(elements[0].layer(), Layer::Background);
        match &elements[0] {
            Element::Path(p) => {
                assert_eq!(p.kind, PathKind::Highlighter);
                assert_eq!(p.points.len(), 2);
            }
            _ => panic!("Expected Path"),
        }
    }

    #[test]
    fn test_serde_output_is_importable() {
        let line = Line::arrow(Point::new(0.0, 0.0), Point::new(5.0, 5.0)).with_midpoint(Point::new(1.0, 4.0));
        let elements = vec![Element::from(line)];
        let json = serde_json::json!({ "elements": &elements }).to_string();
        let imported = parse_elements(&json).unwrap();
        match &imported[0] {
            Element::Line(l) => {
                assert_eq!(l.kind, LineKind::Arrow);
                assert_eq!(l.midpoint, Some(Point::new(1.0, 4.0)));
                assert_eq!(l.end_arrowhead, Arrowhead::Arrow);
            }
            _ => panic!("Expected Line"),
        }
        assert_eq!(imported[0].id(), elements[0].id());
    }
}
