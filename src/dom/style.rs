//! Reading and writing the CSS positioning the map widget applies to panes.

use crate::core::geo::Point;
use crate::dom::Element;

/// Formats a pixel length the way the widget writes it (`"-20px"`)
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// `translate3d(Xpx, Ypx, 0px)`, the form the widget uses to position panes
pub fn translate3d(x: f64, y: f64) -> String {
    format!("translate3d({}, {}, 0px)", px(x), px(y))
}

/// Parses a CSS length such as `"-20px"` or `"12.5"`
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extracts the translation of a CSS transform.
///
/// Understands `translate3d(x, y, z)`, `translate(x, y)` and
/// `matrix(a, b, c, d, tx, ty)`.
pub fn parse_translation(transform: &str) -> Option<Point> {
    let transform = transform.trim();
    let open = transform.find('(')?;
    let close = transform.rfind(')')?;
    if close <= open {
        return None;
    }
    let function = transform[..open].trim();
    let args: Vec<&str> = transform[open + 1..close].split(',').collect();

    match function {
        "translate3d" | "translate" => {
            let x = parse_px(args.first()?)?;
            let y = match args.get(1) {
                Some(y) => parse_px(y)?,
                None => 0.0,
            };
            Some(Point::new(x, y))
        }
        "matrix" if args.len() == 6 => Some(Point::new(parse_px(args[4])?, parse_px(args[5])?)),
        _ => None,
    }
}

/// Current translation of `element`.
///
/// Prefers the `transform` property and falls back to `left`/`top` for hosts
/// that position with offsets. Missing or unparseable values read as zero.
pub fn read_translation(element: &Element) -> Point {
    if let Some(transform) = element.style("transform").filter(|t| !t.trim().is_empty()) {
        return match parse_translation(&transform) {
            Some(point) => point,
            None => {
                log::warn!("Unrecognised pane transform {:?}, reading as zero", transform);
                Point::default()
            }
        };
    }

    let axis = |property: &str| {
        element
            .style(property)
            .and_then(|v| parse_px(&v))
            .unwrap_or(0.0)
    };
    Point::new(axis("left"), axis("top"))
}

/// Positions `element` with `left`/`top`
pub fn set_position(element: &Element, position: Point) {
    element.set_style("left", px(position.x));
    element.set_style("top", px(position.y));
}
