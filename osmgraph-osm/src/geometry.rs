//! Geometry helpers: WKT text with precision control, envelopes, convex
//! hulls, oriented bounding boxes, simplification.
//!
//! Coordinates are `(lon, lat)` doubles throughout, matching WKT axis
//! order.

use geo::algorithm::{Area as GeoArea, BoundingRect, ConvexHull, MinimumRotatedRect, Simplify};
use geo_types::{LineString, MultiPolygon, Point, Polygon, Rect};

/// Mean Earth radius in meters for the haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Render one coordinate with at most `precision` fractional digits,
/// trailing zeros trimmed (`7.8400000` → `7.84`, `47.0000000` → `47`).
pub fn format_coord(v: f64, precision: u16) -> String {
    let mut s = format!("{v:.prec$}", prec = precision as usize);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

fn push_coord(out: &mut String, x: f64, y: f64, precision: u16) {
    out.push_str(&format_coord(x, precision));
    out.push(' ');
    out.push_str(&format_coord(y, precision));
}

/// `POINT(x y)`
pub fn wkt_point(p: &Point<f64>, precision: u16) -> String {
    let mut out = String::from("POINT(");
    push_coord(&mut out, p.x(), p.y(), precision);
    out.push(')');
    out
}

fn ring_text(ls: &LineString<f64>, precision: u16) -> String {
    let mut out = String::new();
    for (i, c) in ls.coords().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_coord(&mut out, c.x, c.y, precision);
    }
    out
}

/// `LINESTRING(x y,x y,…)`
pub fn wkt_linestring(ls: &LineString<f64>, precision: u16) -> String {
    format!("LINESTRING({})", ring_text(ls, precision))
}

fn polygon_rings(poly: &Polygon<f64>, precision: u16) -> String {
    let mut out = String::new();
    out.push('(');
    out.push_str(&ring_text(poly.exterior(), precision));
    out.push(')');
    for interior in poly.interiors() {
        out.push_str(",(");
        out.push_str(&ring_text(interior, precision));
        out.push(')');
    }
    out
}

/// `POLYGON((x y,…),(hole…))`
pub fn wkt_polygon(poly: &Polygon<f64>, precision: u16) -> String {
    format!("POLYGON({})", polygon_rings(poly, precision))
}

/// `POLYGON(…)` for a single polygon, `MULTIPOLYGON((…),(…))` otherwise.
pub fn wkt_multipolygon(mp: &MultiPolygon<f64>, precision: u16) -> String {
    if mp.0.len() == 1 {
        return wkt_polygon(&mp.0[0], precision);
    }
    let mut out = String::from("MULTIPOLYGON(");
    for (i, poly) in mp.0.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('(');
        out.push_str(&polygon_rings(poly, precision));
        out.push(')');
    }
    out.push(')');
    out
}

/// An envelope rendered as its closed five-point polygon.
pub fn wkt_rect(r: &Rect<f64>, precision: u16) -> String {
    let (min, max) = (r.min(), r.max());
    let ring = LineString::from(vec![
        (min.x, min.y),
        (max.x, min.y),
        (max.x, max.y),
        (min.x, max.y),
        (min.x, min.y),
    ]);
    wkt_polygon(&Polygon::new(ring, vec![]), precision)
}

/// Axis-aligned envelope of a multipolygon.
pub fn envelope(mp: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    mp.bounding_rect()
}

/// Axis-aligned envelope of a linestring.
pub fn envelope_linestring(ls: &LineString<f64>) -> Option<Rect<f64>> {
    ls.bounding_rect()
}

/// Convex hull of a multipolygon.
pub fn convex_hull(mp: &MultiPolygon<f64>) -> Polygon<f64> {
    mp.convex_hull()
}

/// Convex hull of a linestring.
pub fn convex_hull_linestring(ls: &LineString<f64>) -> Polygon<f64> {
    ls.convex_hull()
}

/// Oriented (minimum rotated) bounding box.
pub fn oriented_bbox(mp: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    MinimumRotatedRect::minimum_rotated_rect(mp)
}

/// Oriented bounding box of a linestring.
pub fn oriented_bbox_linestring(ls: &LineString<f64>) -> Option<Polygon<f64>> {
    MinimumRotatedRect::minimum_rotated_rect(ls)
}

/// Ratio of the geometry's area to its envelope's area, in `(0, 1]`.
///
/// `None` when the envelope is degenerate (zero width or height).
pub fn envelope_ratio(mp: &MultiPolygon<f64>) -> Option<f64> {
    let env = envelope(mp)?;
    let env_area = env.width() * env.height();
    if env_area <= 0.0 {
        return None;
    }
    Some(mp.unsigned_area() / env_area)
}

/// Simplify a linestring with the Ramer-Douglas-Peucker deviation.
pub fn simplify_linestring(ls: &LineString<f64>, deviation: f64) -> LineString<f64> {
    ls.simplify(&deviation)
}

/// Simplify every ring of a multipolygon.
pub fn simplify_multipolygon(mp: &MultiPolygon<f64>, deviation: f64) -> MultiPolygon<f64> {
    MultiPolygon(mp.0.iter().map(|p| p.simplify(&deviation)).collect())
}

/// Haversine distance between two `(lon, lat)` points, in meters.
///
/// Spherical Earth approximation, accurate to ~0.3%.
pub fn haversine_distance_m(a: &Point<f64>, b: &Point<f64>) -> f64 {
    let (lng1, lat1) = (a.x().to_radians(), a.y().to_radians());
    let (lng2, lat2) = (b.x().to_radians(), b.y().to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
