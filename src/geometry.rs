//! Point and rectangle math for anchor selection and coordinate frames

/// A 2D point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Translate by an offset
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Translate the origin by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Midpoint of one of the four edges
    pub fn edge_midpoint(&self, edge: Edge) -> Point {
        match edge {
            Edge::Left => Point::new(self.x, self.y + self.height / 2.0),
            Edge::Right => Point::new(self.right(), self.y + self.height / 2.0),
            Edge::Top => Point::new(self.x + self.width / 2.0, self.y),
            Edge::Bottom => Point::new(self.x + self.width / 2.0, self.bottom()),
        }
    }
}

/// Edge of a rectangle where a connection may attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Horizontal edges first: when two candidate anchor pairs are equally
/// close, the horizontal pairing wins.
const EDGE_ORDER: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

/// Choose the pair of edge midpoints on `source` and `target` minimizing the
/// straight-line distance between them.
///
/// Ties resolve in favor of horizontal alignment (left/right edges).
pub fn closest_anchors(source: &Rect, target: &Rect) -> (Point, Point) {
    let mut best: Option<(Point, Point, f64)> = None;
    for source_edge in EDGE_ORDER {
        for target_edge in EDGE_ORDER {
            let a = source.edge_midpoint(source_edge);
            let b = target.edge_midpoint(target_edge);
            let dist = a.distance_to(b);
            if best.map_or(true, |(_, _, d)| dist < d) {
                best = Some((a, b, dist));
            }
        }
    }
    let (a, b, _) = best.expect("four edges always yield a candidate");
    (a, b)
}

/// Express an absolute point in a parent frame as [0..1] fractions.
///
/// Degenerate (zero-sized) frames map everything to the frame origin.
pub fn to_relative(p: Point, frame: &Rect) -> Point {
    let rx = if frame.width != 0.0 {
        (p.x - frame.x) / frame.width
    } else {
        0.0
    };
    let ry = if frame.height != 0.0 {
        (p.y - frame.y) / frame.height
    } else {
        0.0
    };
    Point::new(rx, ry)
}

/// Inverse of [`to_relative`]: map [0..1] fractions back to absolute
/// coordinates within the frame.
pub fn from_relative(p: Point, frame: &Rect) -> Point {
    Point::new(frame.x + p.x * frame.width, frame.y + p.y * frame.height)
}

/// Displacement applied to a degenerate (same-point) straight segment so it
/// stays visible.
pub const DEGENERATE_SEGMENT_NUDGE: f64 = 3.0;

/// Clamp a corner radius so two rounded corners never overlap on the
/// shorter side of the rectangle.
pub fn clamp_corner_radius(rect: &Rect, radius: f64) -> f64 {
    radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0)
}
