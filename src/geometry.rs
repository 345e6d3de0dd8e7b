/// Axis-aligned boxes and the direction math shared by every entity.

/// Field width in world units.
pub const FIELD_W: f32 = 1100.0;
/// Field height in world units.  y grows downward.
pub const FIELD_H: f32 = 650.0;

/// An axis-aligned box: top-left corner plus extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Rect {
        Rect {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn shift(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Strict overlap: boxes that merely touch along an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Per-axis containment test against the field extent.
///
/// Returns `(horizontal_ok, vertical_ok)`: each is true iff the box lies
/// fully inside the field along that axis.  Mobile entities use this to
/// self-expire on exit; the avatar uses it to revert a move.
pub fn check_bound(rect: &Rect) -> (bool, bool) {
    let horizontal = rect.left() >= 0.0 && rect.right() <= FIELD_W;
    let vertical = rect.top() >= 0.0 && rect.bottom() <= FIELD_H;
    (horizontal, vertical)
}

/// Unit vector from `org`'s center toward `dst`'s center.
///
/// Panics when the centers coincide.  Spawn geometry keeps the distance
/// strictly positive, so a zero norm is an internal-consistency fault.
pub fn direction_to(org: &Rect, dst: &Rect) -> (f32, f32) {
    let (ox, oy) = org.center();
    let (dx, dy) = dst.center();
    let (x_diff, y_diff) = (dx - ox, dy - oy);
    let norm = (x_diff * x_diff + y_diff * y_diff).sqrt();
    assert!(norm > 0.0, "direction_to: coincident centers");
    (x_diff / norm, y_diff / norm)
}

/// Bounding box of a `w` x `h` box rotated by `angle_deg`.
///
/// Beams and shields keep an axis-aligned collision box even when their
/// visual is oriented; this gives the tight AABB for any rotation.
pub fn rotated_extent(w: f32, h: f32, angle_deg: f32) -> (f32, f32) {
    let r = angle_deg.to_radians();
    let (sin, cos) = (r.sin().abs(), r.cos().abs());
    (w * cos + h * sin, w * sin + h * cos)
}
