//! Pan/zoom transform and the geometry around it.

use serde::Serialize;

use crate::cluster::Point;

/// Allowed zoom range for user gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl ScaleExtent {
    #[inline]
    pub fn clamp(self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

/// Zoom range of the cluster scene.
pub const SCALE_EXTENT: ScaleExtent = ScaleExtent { min: 0.3, max: 4.0 };

/// Translation plus uniform scale applied to the whole scene.
///
/// Maps a layout point `p` to the screen as `p * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };

    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Layout space to screen space.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Screen space to layout space.
    #[inline]
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.k)
    }

    /// Scale by `factor` keeping the screen point `anchor` fixed, with the
    /// resulting scale clamped to `extent`.
    pub fn scaled_about(&self, factor: f64, anchor: Point, extent: ScaleExtent) -> Self {
        let k = extent.clamp(self.k * factor);
        let ratio = k / self.k;
        Self::new(
            anchor.x - (anchor.x - self.x) * ratio,
            anchor.y - (anchor.y - self.y) * ratio,
            k,
        )
    }

    /// Transform that centers `bounds` in a `width` x `height` viewport,
    /// filling `fill` of it, with the scale clamped to `extent`.
    pub fn fit(bounds: &Bounds, width: f64, height: f64, fill: f64, extent: ScaleExtent) -> Self {
        let k = extent.clamp((fill * width / bounds.width()).min(fill * height / bounds.height()));
        let center = bounds.center();
        Self::new(width / 2.0 - k * center.x, height / 2.0 - k * center.y, k)
    }

    /// Linear interpolation, `t` in `[0, 1]`.
    pub fn lerp(&self, to: &ViewTransform, t: f64) -> Self {
        Self::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.k + (to.k - self.k) * t,
        )
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

/// Axis-aligned bounding box in layout space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Grow by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Self {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_apply_invert_inverse() {
        let t = ViewTransform::new(40.0, -25.0, 2.5);
        let p = Point::new(13.0, 7.0);
        let back = t.invert(t.apply(p));
        assert!(close(back.x, p.x) && close(back.y, p.y));
    }

    #[test]
    fn test_scale_about_keeps_anchor_fixed() {
        let t = ViewTransform::new(10.0, 20.0, 1.0);
        let anchor = Point::new(400.0, 300.0);
        let under = t.invert(anchor);
        let zoomed = t.scaled_about(1.5, anchor, SCALE_EXTENT);
        assert!(close(zoomed.k, 1.5));
        let still = zoomed.apply(under);
        assert!(close(still.x, anchor.x) && close(still.y, anchor.y));
    }

    #[test]
    fn test_scale_about_clamps() {
        let t = ViewTransform::new(0.0, 0.0, 3.0);
        assert_eq!(t.scaled_about(10.0, Point::default(), SCALE_EXTENT).k, 4.0);
        assert_eq!(t.scaled_about(0.01, Point::default(), SCALE_EXTENT).k, 0.3);
    }

    #[test]
    fn test_fit_centers_bounds() {
        let bounds = Bounds {
            min_x: 100.0,
            min_y: 50.0,
            max_x: 300.0,
            max_y: 150.0,
        };
        let focus = ScaleExtent { min: 0.3, max: 2.0 };
        let t = ViewTransform::fit(&bounds, 800.0, 600.0, 0.9, focus);
        // min(0.9 * 800 / 200, 0.9 * 600 / 100, 2) = min(3.6, 5.4, 2)
        assert!(close(t.k, 2.0));
        let c = t.apply(bounds.center());
        assert!(close(c.x, 400.0) && close(c.y, 300.0));

        let wide = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1600.0,
            max_y: 100.0,
        };
        let t = ViewTransform::fit(&wide, 800.0, 600.0, 0.9, focus);
        assert!(close(t.k, 0.45));

        // 0.9 * 800 / 4000 = 0.18, raised to the extent's floor
        let huge = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 4000.0,
            max_y: 100.0,
        };
        let t = ViewTransform::fit(&huge, 800.0, 600.0, 0.9, focus);
        assert!(close(t.k, 0.3));
        let c = t.apply(huge.center());
        assert!(close(c.x, 400.0) && close(c.y, 300.0));
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(Bounds::from_points(Vec::new()).is_none());
        let b = Bounds::from_points([Point::new(1.0, 5.0), Point::new(-3.0, 2.0)]).unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-3.0, 2.0, 1.0, 5.0));
        let p = b.padded(80.0);
        assert!(close(p.width(), 164.0));
        assert!(close(p.height(), 163.0));
        assert_eq!(p.center(), b.center());
    }

    #[test]
    fn test_lerp_and_svg() {
        let a = ViewTransform::IDENTITY;
        let b = ViewTransform::new(100.0, 50.0, 3.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), ViewTransform::new(50.0, 25.0, 2.0));
        assert_eq!(b.to_svg(), "translate(100,50) scale(3)");
    }
}
