//! Minimum enclosing circle of an image's foreground.
//!
//! Contours of the binarized foreground are reduced to their convex hull,
//! then fitted with the incremental Welzl construction. The hull is small
//! (hundreds of points for a glyph stack) so the cubic worst case of the
//! non-shuffled loop is never a concern.

use image::{GrayImage, RgbaImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use tracing::debug;

use crate::crop::foreground_mask;

/// Points closer than this to the boundary count as enclosed.
const EPSILON: f64 = 1e-7;

/// A circle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Whether `(px, py)` lies inside or on the circle.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let dist = (px - self.x).hypot(py - self.y);
        dist <= self.radius + EPSILON * self.radius.max(1.0)
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    /// Smallest circle through two points: the one with them as a diameter.
    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let x = (a.0 + b.0) / 2.0;
        let y = (a.1 + b.1) / 2.0;
        let radius = (a.0 - b.0).hypot(a.1 - b.1) / 2.0;
        Self { x, y, radius }
    }

    /// Circumcircle of three points. Falls back to the widest pair when the
    /// points are collinear.
    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let d = 2.0 * (bx * cy - by * cx);

        if d.abs() < EPSILON {
            return [
                Self::from_two(a, b),
                Self::from_two(a, c),
                Self::from_two(b, c),
            ]
            .into_iter()
            .fold(Self::new(a.0, a.1, 0.0), |best, circle| {
                if circle.radius > best.radius { circle } else { best }
            });
        }

        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            x: a.0 + ux,
            y: a.1 + uy,
            radius: ux.hypot(uy),
        }
    }
}

/// Smallest circle containing every point, or `None` for an empty slice.
pub fn min_enclosing_circle(points: &[(f64, f64)]) -> Option<Circle> {
    let (&first, rest) = points.split_first()?;
    let mut circle = Circle::new(first.0, first.1, 0.0);

    for (i, &p) in rest.iter().enumerate() {
        if circle.contains(p.0, p.1) {
            continue;
        }
        // p lies on the boundary of the circle enclosing points[..=i+1]
        circle = Circle::new(p.0, p.1, 0.0);
        for (j, &q) in points[..=i].iter().enumerate() {
            if circle.contains(q.0, q.1) {
                continue;
            }
            circle = Circle::from_two(p, q);
            for &r in &points[..j] {
                if !circle.contains(r.0, r.1) {
                    circle = Circle::from_three(p, q, r);
                }
            }
        }
    }

    Some(circle)
}

/// Minimum enclosing circle of the foreground pixels of `img`.
///
/// The circle covers whole pixels, not just pixel centers. Returns `None`
/// when the image has no foreground.
pub fn content_circle(img: &RgbaImage, thresh: u8) -> Option<Circle> {
    let mask = foreground_mask(img, thresh);

    // find_contours only starts an outer border past column 0, so the mask
    // gets a one pixel background frame and points are shifted back after.
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, &mask, 1, 1);
    let contours = find_contours::<i32>(&framed);

    let boundary: Vec<Point<i32>> = contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .flat_map(|c| c.points)
        .map(|p| Point::new(p.x - 1, p.y - 1))
        .collect();
    if boundary.is_empty() {
        return None;
    }

    let hull = convex_hull(boundary.as_slice());
    let centers: Vec<(f64, f64)> = hull
        .iter()
        .map(|p| (f64::from(p.x) + 0.5, f64::from(p.y) + 0.5))
        .collect();

    let mut circle = min_enclosing_circle(&centers)?;
    circle.radius += std::f64::consts::FRAC_1_SQRT_2;

    debug!(
        hull_points = centers.len(),
        x = circle.x,
        y = circle.y,
        radius = circle.radius,
        "Fitted enclosing circle"
    );
    Some(circle)
}
