//! SVG export of a [`Drawing`].
//!
//! A fixed frame of data space, or else the drawing's own bounds, is fitted
//! onto the page and every shape is written in page coordinates: polylines as
//! `<path>`, dots as `<circle>`. A drawing with no points is refused before any
//! extent math.

use gen_art_core::error::EngineError;
use gen_art_core::geometry::{Bounds, Drawing, Mark, Page, Placement};
use gen_art_core::DVec2;
use log::debug;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Title and description embedded in the document.
#[derive(Debug, Clone, Copy)]
pub struct SvgMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn coord(p: DVec2) -> String {
    format!("{:.3},{:.3}", p.x, p.y)
}

/// Renders `drawing` onto `page`, returning the document and the placement
/// used to map data space into page space.
///
/// `frame` is the region of data space that fills the page; `None` uses the
/// drawing's own bounds. Returns `EngineError::EmptyGeometry` if the drawing
/// has no points.
pub fn render_svg(
    drawing: &Drawing,
    frame: Option<Bounds>,
    page: Page,
    meta: SvgMeta<'_>,
) -> Result<(String, Placement), EngineError> {
    let placement = match frame {
        Some(_) if drawing.is_empty() => return Err(EngineError::EmptyGeometry),
        Some(frame) => Placement::fit(frame, page),
        None => Placement::fit_drawing(drawing, page)?,
    };
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = page.width,
        h = page.height
    );
    let _ = writeln!(out, "<title>{}</title>", escape(meta.title));
    let _ = writeln!(out, "<desc>{}</desc>", escape(meta.description));
    let _ = writeln!(
        out,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
        page.width, page.height
    );

    let width = drawing.stroke_width;
    for shape in &drawing.shapes {
        let color = shape.color.to_hex();
        let opacity = shape.color.opacity();
        match &shape.mark {
            Mark::Path(points) => {
                let mut d = String::new();
                for (k, p) in points.iter().enumerate() {
                    let cmd = if k == 0 { "M" } else { " L" };
                    let _ = write!(d, "{cmd}{}", coord(placement.apply(*p)));
                }
                if d.is_empty() {
                    continue;
                }
                let _ = writeln!(
                    out,
                    r#"<path d="{d}" fill="none" stroke="{color}" stroke-opacity="{opacity:.3}" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round"/>"#
                );
            }
            Mark::Dot(p) => {
                let c = placement.apply(*p);
                let _ = writeln!(
                    out,
                    r#"<circle cx="{:.3}" cy="{:.3}" r="{}" fill="{color}" fill-opacity="{opacity:.3}"/>"#,
                    c.x,
                    c.y,
                    width / 2.0
                );
            }
        }
    }
    out.push_str("</svg>\n");
    Ok((out, placement))
}

/// Renders and writes the document to `path`, creating missing parent
/// directories.
///
/// Returns `EngineError::EmptyGeometry` for an empty drawing (nothing is
/// written) and `EngineError::Io` on filesystem failure.
pub fn write_svg(
    drawing: &Drawing,
    frame: Option<Bounds>,
    page: Page,
    meta: SvgMeta<'_>,
    path: &Path,
) -> Result<Placement, EngineError> {
    let (svg, placement) = render_svg(drawing, frame, page, meta)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EngineError::Io(e.to_string()))?;
    }
    fs::write(path, svg).map_err(|e| EngineError::Io(e.to_string()))?;
    debug!(
        "wrote {} shapes to {} (scale {:.4})",
        drawing.shapes.len(),
        path.display(),
        placement.scale
    );
    Ok(placement)
}
