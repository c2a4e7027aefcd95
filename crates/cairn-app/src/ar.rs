//! Augmented-reality placement state.
//!
//! The XR session manager lives outside the core. It reports session start
//! and end, one optional hit-test pose per frame, and "select" presses; this
//! type turns those into rock visibility, reticle visibility, and a one-time
//! placement transform.

use cairn_render::Transform;
use glam::{Mat4, Vec3};

/// Uniform scale of the rock once placed in the real world.
pub const PLACED_SCALE: f32 = 0.15;

#[derive(Clone, Debug, Default)]
pub struct ArPlacement {
    in_session: bool,
    placed: bool,
    hit_pose: Option<Mat4>,
}

impl ArPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_session(&self) -> bool {
        self.in_session
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// A session began: the rock hides until placed.
    pub fn session_started(&mut self) {
        self.in_session = true;
        self.placed = false;
        self.hit_pose = None;
        tracing::info!("AR session started");
    }

    /// The session ended: the rock shows again in the regular scene.
    pub fn session_ended(&mut self) {
        self.in_session = false;
        self.placed = false;
        self.hit_pose = None;
        tracing::info!("AR session ended");
    }

    /// Record this frame's hit-test result. `None` when nothing was hit or
    /// hit testing is unavailable.
    pub fn update_hit(&mut self, pose: Option<Mat4>) {
        self.hit_pose = if self.in_session { pose } else { None };
    }

    /// Whether the rock mesh should be drawn.
    pub fn rock_visible(&self) -> bool {
        !self.in_session || self.placed
    }

    /// The reticle shows only while a surface is under it and nothing has
    /// been placed yet.
    pub fn reticle_visible(&self) -> bool {
        self.in_session && !self.placed && self.hit_pose.is_some()
    }

    /// The current reticle pose, if visible.
    pub fn reticle_pose(&self) -> Option<Mat4> {
        self.hit_pose.filter(|_| self.reticle_visible())
    }

    /// Handle a select press. Places the rock at most once per session and
    /// returns its new transform.
    pub fn select(&mut self) -> Option<Transform> {
        let pose = self.reticle_pose()?;
        self.placed = true;
        let mut transform = Transform::from_matrix(&pose);
        transform.rotation = glam::Quat::IDENTITY;
        transform.scale = Vec3::splat(PLACED_SCALE);
        tracing::info!(position = ?transform.translation, "Rock placed in AR");
        Some(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose() -> Mat4 {
        Mat4::from_translation(Vec3::new(0.5, -1.0, -2.0))
    }

    #[test]
    fn test_outside_session() {
        let mut ar = ArPlacement::new();
        ar.update_hit(Some(pose()));
        assert!(ar.rock_visible());
        assert!(!ar.reticle_visible());
        assert!(ar.select().is_none());
    }

    #[test]
    fn test_place_once_per_session() {
        let mut ar = ArPlacement::new();
        ar.session_started();
        assert!(!ar.rock_visible());

        ar.update_hit(None);
        assert!(!ar.reticle_visible());
        assert!(ar.select().is_none());

        ar.update_hit(Some(pose()));
        assert!(ar.reticle_visible());
        let t = ar.select().unwrap();
        assert_eq!(t.translation, Vec3::new(0.5, -1.0, -2.0));
        assert_eq!(t.scale, Vec3::splat(PLACED_SCALE));
        assert!(ar.rock_visible());
        assert!(!ar.reticle_visible());

        ar.update_hit(Some(Mat4::from_translation(Vec3::X)));
        assert!(ar.select().is_none());
    }

    #[test]
    fn test_session_end_resets() {
        let mut ar = ArPlacement::new();
        ar.session_started();
        ar.update_hit(Some(pose()));
        ar.select();
        ar.session_ended();
        assert!(ar.rock_visible());
        assert!(!ar.is_placed());

        ar.session_started();
        ar.update_hit(Some(pose()));
        assert!(ar.select().is_some());
    }
}
