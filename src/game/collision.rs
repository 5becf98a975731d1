//! Geometry & Collision
//!
//! Axis-aligned rectangles and platform resolution for moving bodies.
//!
//! Overlap is half-open: rectangles that only share an edge do NOT
//! intersect. A body standing on a platform therefore touches it without
//! overlapping, and is detected as supported by [`is_supported`].

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, from_int};
use crate::core::vec2::FixedVec2;
use crate::game::body::Body;

/// Axis-aligned rectangle anchored at its top-left corner (y grows down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: Fixed,
    /// Top edge
    pub y: Fixed,
    /// Width
    pub w: Fixed,
    /// Height
    pub h: Fixed,
}

impl Rect {
    /// Create from fixed-point components.
    pub const fn new(x: Fixed, y: Fixed, w: Fixed, h: Fixed) -> Self {
        Self { x, y, w, h }
    }

    /// Create from whole pixels.
    pub const fn from_ints(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(from_int(x), from_int(y), from_int(w), from_int(h))
    }

    /// Rectangle at `position` with `size`.
    pub const fn at(position: FixedVec2, size: FixedVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> Fixed {
        self.x
    }

    #[inline]
    pub fn right(&self) -> Fixed {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> Fixed {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> Fixed {
        self.y + self.h
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> FixedVec2 {
        FixedVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// True iff the rectangles overlap on both axes (touching edges excluded).
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right()
        && a.right() > b.left()
        && a.top() < b.bottom()
        && a.bottom() > b.top()
}

/// Platform category. Rendering only; collision is identical for all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Ground,
    Platform,
    Building,
}

/// Static level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Solid area
    pub rect: Rect,
    /// Category (presentation only)
    pub kind: PlatformKind,
}

impl Platform {
    /// Create a platform from whole pixels.
    pub const fn from_ints(x: i32, y: i32, w: i32, h: i32, kind: PlatformKind) -> Self {
        Self { rect: Rect::from_ints(x, y, w, h), kind }
    }
}

/// How a body was pushed out of a platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// No overlap
    None,
    /// Snapped onto the top surface
    Landed,
    /// Snapped below the bottom surface
    HeadBump,
    /// Stopped against the platform's left side while moving right
    BlockedRight,
    /// Stopped against the platform's right side while moving left
    BlockedLeft,
}

/// Resolve one body against one platform.
///
/// The penetration axis comes from the velocity sign and where the body
/// was before this tick's integration (`body.last_position`). A body
/// already embedded (no clean approach side) is pushed out along the
/// shallowest axis. Only a top resolution sets `on_ground`.
pub fn resolve_platform(body: &mut Body, platform: &Platform) -> Contact {
    let rect = body.rect();
    let p = &platform.rect;
    if !intersects(&rect, p) {
        return Contact::None;
    }

    let prev = Rect::at(body.last_position, body.size);

    if body.velocity.y >= 0 && prev.bottom() <= p.top() {
        land_on(body, p)
    } else if body.velocity.y < 0 && prev.top() >= p.bottom() {
        bump_under(body, p)
    } else if body.velocity.x > 0 && prev.right() <= p.left() {
        body.position.x = p.left() - body.size.x;
        body.velocity.x = 0;
        Contact::BlockedRight
    } else if body.velocity.x < 0 && prev.left() >= p.right() {
        body.position.x = p.right();
        body.velocity.x = 0;
        Contact::BlockedLeft
    } else {
        let from_top = rect.bottom() - p.top();
        let from_bottom = p.bottom() - rect.top();
        let from_left = rect.right() - p.left();
        let from_right = p.right() - rect.left();
        let shallowest = from_top.min(from_bottom).min(from_left).min(from_right);

        if shallowest == from_top {
            land_on(body, p)
        } else if shallowest == from_bottom {
            bump_under(body, p)
        } else if shallowest == from_left {
            body.position.x = p.left() - body.size.x;
            body.velocity.x = 0;
            Contact::BlockedRight
        } else {
            body.position.x = p.right();
            body.velocity.x = 0;
            Contact::BlockedLeft
        }
    }
}

fn land_on(body: &mut Body, p: &Rect) -> Contact {
    body.position.y = p.top() - body.size.y;
    body.velocity.y = 0;
    body.on_ground = true;
    Contact::Landed
}

fn bump_under(body: &mut Body, p: &Rect) -> Contact {
    body.position.y = p.bottom();
    body.velocity.y = 0;
    Contact::HeadBump
}

/// True iff the body rests exactly on the platform's top surface.
pub fn is_supported(body: &Body, platform: &Platform) -> bool {
    let rect = body.rect();
    let p = &platform.rect;
    body.velocity.y >= 0
        && rect.bottom() == p.top()
        && rect.left() < p.right()
        && rect.right() > p.left()
}

/// Resolve a body against every platform in list order, then refresh
/// `on_ground`. Later platforms win when two resolutions touch the same axis.
pub fn resolve_platforms(body: &mut Body, platforms: &[Platform]) {
    body.on_ground = false;
    for platform in platforms {
        resolve_platform(body, platform);
    }
    if !body.on_ground {
        body.on_ground = platforms.iter().any(|p| is_supported(body, p));
    }
}
