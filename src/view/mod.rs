//! Boundary to the camera and viewport.
//!
//! The engine never does projection math itself; it calls a
//! [`ViewTransform`] supplied by the host. [`OrthographicView`] is a small
//! implementation for headless use.

use tracing::trace;

use crate::math::intersect_3d::signed_distance_to_plane;
use crate::math::{Point2, Point3, Ray, Vector3};
use crate::selection::EntityRef;

/// World/screen mapping supplied by the host application.
pub trait ViewTransform {
    /// Projects a world point to `(x, y, normalized_depth)` in pixels.
    fn world_to_screen(&self, p: &Point3) -> Point3;

    /// World-space pick ray through a pixel.
    fn screen_to_ray(&self, x: f64, y: f64) -> Option<Ray>;

    /// `true` if a projected point lies inside the view frustum.
    fn point_visible_in_frustum(&self, device: &Point3) -> bool;

    /// Screen position of a world point, without depth.
    fn project(&self, p: &Point3) -> Point2 {
        let s = self.world_to_screen(p);
        Point2::new(s.x, s.y)
    }
}

/// Fire-and-forget redraw trigger.
pub trait RedrawHandle {
    fn request_redraw(&self);
}

/// Orthographic camera looking down the world −z axis.
///
/// Screen coordinates are in pixels with the origin at the bottom-left
/// corner and y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicView {
    /// World xy shown at the viewport center.
    pub center: Point2,
    /// Pixels per world unit.
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    /// World z of the eye plane; rays start here.
    pub eye_z: f64,
    /// World depth mapped to normalized depth `[0, 1]`.
    pub depth_range: f64,
}

impl OrthographicView {
    /// A view of `width × height` pixels centered on the world origin.
    #[must_use]
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            center: Point2::origin(),
            scale,
            width,
            height,
            eye_z: 100.0,
            depth_range: 200.0,
        }
    }

    /// Centers the view on a world xy position.
    #[must_use]
    pub fn centered_on(mut self, center: Point2) -> Self {
        self.center = center;
        self
    }
}

impl ViewTransform for OrthographicView {
    fn world_to_screen(&self, p: &Point3) -> Point3 {
        Point3::new(
            self.width * 0.5 + (p.x - self.center.x) * self.scale,
            self.height * 0.5 + (p.y - self.center.y) * self.scale,
            (self.eye_z - p.z) / self.depth_range,
        )
    }

    fn screen_to_ray(&self, x: f64, y: f64) -> Option<Ray> {
        let origin = Point3::new(
            self.center.x + (x - self.width * 0.5) / self.scale,
            self.center.y + (y - self.height * 0.5) / self.scale,
            self.eye_z,
        );
        Ray::new(origin, Vector3::new(0.0, 0.0, -1.0))
    }

    fn point_visible_in_frustum(&self, device: &Point3) -> bool {
        (0.0..=self.width).contains(&device.x)
            && (0.0..=self.height).contains(&device.y)
            && (0.0..=1.0).contains(&device.z)
    }
}

/// Clipping half-space `a·x + b·y + c·z + d ≥ 0` that stays visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCut {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl PlaneCut {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// `true` if the world point is on the kept side.
    #[must_use]
    pub fn keeps(&self, p: &Point3) -> bool {
        signed_distance_to_plane(p, &[self.a, self.b, self.c, self.d]) >= 0.0
    }
}

/// Returns `true` if `p` survives an optional plane cut.
#[must_use]
pub fn passes_cut(cut: Option<&PlaneCut>, p: &Point3) -> bool {
    cut.is_none_or(|c| c.keeps(p))
}

/// Per-view picking context: the camera, the active plane cut, the redraw
/// hook and the hover highlight.
///
/// A session is inert until a view is attached; picking against a detached
/// session finds nothing.
#[derive(Default)]
pub struct ViewSession {
    view: Option<Box<dyn ViewTransform>>,
    redraw: Option<Box<dyn RedrawHandle>>,
    plane_cut: Option<PlaneCut>,
    highlight: Option<EntityRef>,
}

impl std::fmt::Debug for ViewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSession")
            .field("attached", &self.view.is_some())
            .field("plane_cut", &self.plane_cut)
            .field("highlight", &self.highlight)
            .finish_non_exhaustive()
    }
}

impl ViewSession {
    /// Creates a detached session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a view transform. Any previous highlight is dropped.
    pub fn attach(&mut self, view: Box<dyn ViewTransform>) {
        trace!("view attached");
        self.view = Some(view);
        self.highlight = None;
    }

    /// Detaches the view and clears the highlight.
    pub fn detach(&mut self) {
        trace!("view detached");
        self.view = None;
        self.highlight = None;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.view.is_some()
    }

    /// The attached view, if any.
    #[must_use]
    pub fn view(&self) -> Option<&dyn ViewTransform> {
        self.view.as_deref()
    }

    /// Installs the redraw hook.
    pub fn set_redraw_handle(&mut self, handle: Box<dyn RedrawHandle>) {
        self.redraw = Some(handle);
    }

    /// Asks the host to redraw, if a hook is installed.
    pub fn request_redraw(&self) {
        if let Some(r) = &self.redraw {
            r.request_redraw();
        }
    }

    pub fn set_plane_cut(&mut self, cut: Option<PlaneCut>) {
        self.plane_cut = cut;
    }

    #[must_use]
    pub fn plane_cut(&self) -> Option<&PlaneCut> {
        self.plane_cut.as_ref()
    }

    #[must_use]
    pub fn highlight(&self) -> Option<EntityRef> {
        self.highlight
    }

    /// Replaces the highlight. Returns `true` if it changed.
    pub fn set_highlight(&mut self, entity: Option<EntityRef>) -> bool {
        let changed = self.highlight != entity;
        self.highlight = entity;
        changed
    }
}
