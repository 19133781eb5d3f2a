//! Collision detection and response for boxes and circles
//!
//! Every detector is a pure function of its shapes. A `None` result means the
//! shapes do not collide; `Some` carries what the resolver needs to separate them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Edges closer than this are touching, not overlapping
pub const CONTACT_SLOP: f32 = 1e-3;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Zero-area rectangles never take part in collisions
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A circle given by its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Face of the second shape that the first shape touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// First shape rests on top of the second
    Top,
    /// First shape hit the second from below
    Bottom,
    /// First shape hit the second's left face
    Left,
    /// First shape hit the second's right face
    Right,
}

impl Side {
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Result of a rectangle/rectangle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectContact {
    /// Resolution side (axis of least embedding)
    pub side: Side,
    /// Signed per-axis penetration, positive when the second box lies towards +axis
    pub penetration: Vec2,
}

impl RectContact {
    /// Penetration depth along the resolved axis
    pub fn depth(&self) -> f32 {
        if self.side.is_vertical() {
            self.penetration.y.abs()
        } else {
            self.penetration.x.abs()
        }
    }
}

/// Where a circle touches a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleRectSide {
    Edge(Side),
    /// Circle centre is inside the rectangle
    Inside,
}

/// Result of a circle/rectangle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleRectContact {
    pub side: CircleRectSide,
    pub penetration: f32,
    pub distance: f32,
    /// Point of the rectangle nearest the circle centre
    pub closest: Vec2,
}

/// Result of a circle/circle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleContact {
    /// Unit vector from the first centre towards the second
    pub normal: Vec2,
    pub penetration: f32,
    pub distance: f32,
}

/// Signed overlap along one axis, zero when the spans are apart
fn axis_overlap(pos_a: f32, size_a: f32, pos_b: f32, size_b: f32) -> f32 {
    let diff = (pos_b + size_b / 2.0) - (pos_a + size_a / 2.0);
    let half_sum = (size_a + size_b) / 2.0;
    if diff.abs() >= half_sum {
        return 0.0;
    }
    if diff >= 0.0 {
        half_sum - diff
    } else {
        -half_sum - diff
    }
}

/// Check overlap between two rectangles (AABB)
///
/// The side is picked on the axis with the smaller absolute penetration, the
/// direction along which the boxes are least embedded. Ties go vertical.
pub fn rect_rect(a: &Rect, b: &Rect) -> Option<RectContact> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    let overlap_x = a.x < b.right() - CONTACT_SLOP && a.right() > b.x + CONTACT_SLOP;
    let overlap_y = a.y < b.bottom() - CONTACT_SLOP && a.bottom() > b.y + CONTACT_SLOP;
    if !overlap_x || !overlap_y {
        return None;
    }

    let pen_x = axis_overlap(a.x, a.width, b.x, b.width);
    let pen_y = axis_overlap(a.y, a.height, b.y, b.height);

    let side = if pen_x.abs() < pen_y.abs() {
        if pen_x >= 0.0 { Side::Left } else { Side::Right }
    } else if pen_y >= 0.0 {
        Side::Top
    } else {
        Side::Bottom
    };

    Some(RectContact {
        side,
        penetration: Vec2::new(pen_x, pen_y),
    })
}

/// Is `a` standing flush on the top face of `b`
///
/// Bottom within the contact slop of `b`'s top, with real horizontal overlap.
/// These are the touches `rect_rect` deliberately reports as misses.
pub fn rests_on(a: &Rect, b: &Rect) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    let overlap_x = a.x < b.right() - CONTACT_SLOP && a.right() > b.x + CONTACT_SLOP;
    overlap_x && (a.bottom() - b.y).abs() <= CONTACT_SLOP
}

/// Check overlap between a circle and a rectangle
pub fn circle_rect(circle: &Circle, rect: &Rect) -> Option<CircleRectContact> {
    let closest = Vec2::new(
        circle.center.x.clamp(rect.x, rect.right()),
        circle.center.y.clamp(rect.y, rect.bottom()),
    );
    let distance_sq = circle.center.distance_squared(closest);
    if distance_sq > circle.radius * circle.radius {
        return None;
    }

    let side = if closest.x == rect.x {
        CircleRectSide::Edge(Side::Left)
    } else if closest.x == rect.right() {
        CircleRectSide::Edge(Side::Right)
    } else if closest.y == rect.y {
        CircleRectSide::Edge(Side::Top)
    } else if closest.y == rect.bottom() {
        CircleRectSide::Edge(Side::Bottom)
    } else {
        CircleRectSide::Inside
    };

    let distance = distance_sq.sqrt();
    Some(CircleRectContact {
        side,
        penetration: circle.radius - distance,
        distance,
        closest,
    })
}

/// Check overlap between two circles
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<CircleContact> {
    let delta = b.center - a.center;
    let distance = delta.length();
    let radius_sum = a.radius + b.radius;
    if distance > radius_sum {
        return None;
    }

    // Coincident centres: any axis separates them
    let normal = if distance > 0.0 { delta / distance } else { Vec2::X };

    Some(CircleContact {
        normal,
        penetration: radius_sum - distance,
        distance,
    })
}

#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

#[inline]
pub fn point_in_circle(point: Vec2, circle: &Circle) -> bool {
    point.distance_squared(circle.center) <= circle.radius * circle.radius
}

/// Sample the segment at unit steps and report whether no obstacle blocks it
pub fn line_of_sight(from: Vec2, to: Vec2, obstacles: &[Rect]) -> bool {
    if obstacles.is_empty() {
        return true;
    }
    let delta = to - from;
    let length = delta.length();
    if length == 0.0 {
        return true;
    }

    let dir = delta / length;
    let steps = length.ceil() as u32;
    (0..steps).all(|i| {
        let sample = from + dir * i as f32;
        !obstacles.iter().any(|obstacle| point_in_rect(sample, obstacle))
    })
}

/// Push a box out of `other` along the contact's axis and kill the velocity into it
///
/// The box is snapped flush to the struck face, which removes exactly the signed
/// penetration without leaving rounding residue behind.
pub fn separate_rect(pos: &mut Vec2, size: Vec2, vel: &mut Vec2, other: &Rect, contact: &RectContact) {
    match contact.side {
        Side::Top => {
            pos.y = other.y - size.y;
            vel.y = 0.0;
        }
        Side::Bottom => {
            pos.y = other.bottom();
            vel.y = 0.0;
        }
        Side::Left => {
            pos.x = other.x - size.x;
            vel.x = 0.0;
        }
        Side::Right => {
            pos.x = other.right();
            vel.x = 0.0;
        }
    }
}

/// A circular body taking part in a pairwise collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleBody {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Default bounciness for circle pairs
pub const CIRCLE_RESTITUTION: f32 = 0.8;

/// Split the penetration between two circles and exchange impulse along the normal
///
/// Bodies already moving apart keep their velocities.
pub fn resolve_circle_pair(a: &mut CircleBody, b: &mut CircleBody, contact: &CircleContact, restitution: f32) {
    let half = contact.penetration / 2.0;
    a.pos -= contact.normal * half;
    b.pos += contact.normal * half;

    let relative = b.vel - a.vel;
    let along_normal = relative.dot(contact.normal);
    if along_normal > 0.0 {
        return;
    }

    let impulse = -(1.0 + restitution) * along_normal / 2.0;
    a.vel -= contact.normal * impulse;
    b.vel += contact.normal * impulse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_rect_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(rect_rect(&a, &b).is_none());
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(rect_rect(&a, &b).is_none());
    }

    #[test]
    fn test_rests_on_flush_and_sub_slop_sink() {
        let platform = Rect::new(50.0, 450.0, 200.0, 32.0);
        assert!(rests_on(&Rect::new(100.0, 386.0, 32.0, 64.0), &platform));
        // Sunk by less than the slop: no overlap, still resting
        let sunk = Rect::new(100.0, 386.0 + CONTACT_SLOP / 2.0, 32.0, 64.0);
        assert!(rect_rect(&sunk, &platform).is_none());
        assert!(rests_on(&sunk, &platform));

        assert!(!rests_on(&Rect::new(100.0, 380.0, 32.0, 64.0), &platform));
        // Only touching the corner
        assert!(!rests_on(&Rect::new(250.0, 386.0, 32.0, 64.0), &platform));
        assert!(!rests_on(&Rect::new(100.0, 386.0, 32.0, 64.0), &Rect::new(50.0, 450.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rect_rect_top_side() {
        // Avatar sinking slightly into a wide platform
        let avatar = Rect::new(100.0, 400.5, 32.0, 64.0);
        let platform = Rect::new(50.0, 450.0, 200.0, 32.0);
        let contact = rect_rect(&avatar, &platform).unwrap();
        assert_eq!(contact.side, Side::Top);
        assert!((contact.penetration.y - 14.5).abs() < 1e-4);
        assert!(contact.penetration.x > 0.0);
    }

    #[test]
    fn test_rect_rect_picks_least_embedded_axis() {
        // Deep vertical overlap, shallow horizontal: resolve sideways
        let a = Rect::new(0.0, 0.0, 10.0, 40.0);
        let b = Rect::new(8.0, 5.0, 40.0, 40.0);
        let contact = rect_rect(&a, &b).unwrap();
        assert_eq!(contact.side, Side::Left);
        assert!((contact.depth() - 2.0).abs() < 1e-4);

        let a = Rect::new(46.0, 0.0, 10.0, 40.0);
        assert_eq!(rect_rect(&a, &b).unwrap().side, Side::Right);
    }

    #[test]
    fn test_rect_rect_bottom_side() {
        // Head bump from below
        let avatar = Rect::new(10.0, 28.0, 32.0, 64.0);
        let ceiling = Rect::new(0.0, 0.0, 200.0, 32.0);
        assert_eq!(rect_rect(&avatar, &ceiling).unwrap().side, Side::Bottom);
    }

    #[test]
    fn test_degenerate_rect_never_collides() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let broken = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert!(rect_rect(&a, &broken).is_none());
    }

    #[test]
    fn test_circle_rect_sides() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);

        let left = circle_rect(&Circle::new(Vec2::new(-5.0, 10.0), 8.0), &rect).unwrap();
        assert_eq!(left.side, CircleRectSide::Edge(Side::Left));
        assert!((left.penetration - 3.0).abs() < 1e-4);

        let top = circle_rect(&Circle::new(Vec2::new(50.0, -4.0), 8.0), &rect).unwrap();
        assert_eq!(top.side, CircleRectSide::Edge(Side::Top));

        let inside = circle_rect(&Circle::new(Vec2::new(50.0, 10.0), 8.0), &rect).unwrap();
        assert_eq!(inside.side, CircleRectSide::Inside);
        assert_eq!(inside.distance, 0.0);

        assert!(circle_rect(&Circle::new(Vec2::new(50.0, -9.0), 8.0), &rect).is_none());
    }

    #[test]
    fn test_circle_circle() {
        let a = Circle::new(Vec2::ZERO, 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        let contact = circle_circle(&a, &b).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((contact.penetration - 5.0).abs() < 1e-4);

        let far = Circle::new(Vec2::new(25.0, 0.0), 4.0);
        assert!(circle_circle(&a, &far).is_none());
    }

    #[test]
    fn test_circle_circle_coincident_centres() {
        let a = Circle::new(Vec2::new(3.0, 3.0), 5.0);
        let contact = circle_circle(&a, &a).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!(contact.normal.is_finite());
        assert!((contact.penetration - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_queries() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(Vec2::new(10.0, 10.0), &rect));
        assert!(!point_in_rect(Vec2::new(10.1, 5.0), &rect));

        let circle = Circle::new(Vec2::ZERO, 2.0);
        assert!(point_in_circle(Vec2::new(0.0, 2.0), &circle));
        assert!(!point_in_circle(Vec2::new(1.5, 1.5), &circle));
    }

    #[test]
    fn test_line_of_sight() {
        let wall = Rect::new(40.0, -10.0, 5.0, 20.0);
        assert!(!line_of_sight(Vec2::ZERO, Vec2::new(100.0, 0.0), &[wall]));
        assert!(line_of_sight(Vec2::new(0.0, 50.0), Vec2::new(100.0, 50.0), &[wall]));
        assert!(line_of_sight(Vec2::ZERO, Vec2::new(100.0, 0.0), &[]));
        // Coincident endpoints are visible even inside an obstacle
        let p = Vec2::new(42.0, 0.0);
        assert!(line_of_sight(p, p, &[wall]));
    }

    #[test]
    fn test_circle_pair_impulse_exchange() {
        let mut a = CircleBody {
            pos: Vec2::ZERO,
            vel: Vec2::new(2.0, 0.0),
        };
        let mut b = CircleBody {
            pos: Vec2::new(15.0, 0.0),
            vel: Vec2::new(-2.0, 0.0),
        };
        let contact = circle_circle(&Circle::new(a.pos, 10.0), &Circle::new(b.pos, 10.0)).unwrap();
        resolve_circle_pair(&mut a, &mut b, &contact, CIRCLE_RESTITUTION);

        assert!((a.pos.x - (-2.5)).abs() < 1e-4);
        assert!((b.pos.x - 17.5).abs() < 1e-4);
        // Head-on: both bounce back with restitution
        assert!((a.vel.x - (-1.6)).abs() < 1e-4);
        assert!((b.vel.x - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_circle_pair_separating_keeps_velocity() {
        let mut a = CircleBody {
            pos: Vec2::ZERO,
            vel: Vec2::new(-1.0, 0.0),
        };
        let mut b = CircleBody {
            pos: Vec2::new(15.0, 0.0),
            vel: Vec2::new(1.0, 0.0),
        };
        let contact = circle_circle(&Circle::new(a.pos, 10.0), &Circle::new(b.pos, 10.0)).unwrap();
        resolve_circle_pair(&mut a, &mut b, &contact, CIRCLE_RESTITUTION);
        assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
    }

    proptest! {
        #[test]
        fn separated_box_no_longer_overlaps_on_resolved_axis(
            ax in -100.0f32..300.0,
            ay in -100.0f32..300.0,
            aw in 4.0f32..80.0,
            ah in 4.0f32..80.0,
            bx in 0.0f32..200.0,
            by in 0.0f32..200.0,
            bw in 4.0f32..200.0,
            bh in 4.0f32..60.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            if let Some(contact) = rect_rect(&a, &b) {
                let mut pos = Vec2::new(a.x, a.y);
                let mut vel = Vec2::new(3.0, 3.0);
                separate_rect(&mut pos, a.size(), &mut vel, &b, &contact);
                let moved = Rect::from_pos_size(pos, a.size());

                prop_assert!(rect_rect(&moved, &b).is_none());
                if contact.side.is_vertical() {
                    prop_assert_eq!(vel.y, 0.0);
                    prop_assert_eq!(moved.x, a.x);
                } else {
                    prop_assert_eq!(vel.x, 0.0);
                    prop_assert_eq!(moved.y, a.y);
                }
                // Correction never exceeds the reported depth
                prop_assert!((moved.center() - a.center()).length() <= contact.depth() + 1e-2);
            }
        }
    }
}
