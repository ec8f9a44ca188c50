//! Timed transform changes applied to scene graph nodes.

use cgmath::Vector3;

use super::node::{NodeId, SpatialNode};
use super::SceneError;

/// What an [`Animation`] does to its target each tick.
#[derive(Debug, Clone, Copy)]
enum AnimationKind {
    /// Offsets the target's position by `per_second * dt`.
    Translation { per_second: Vector3<f32> },
    /// Offsets the target's Euler angles by `per_second * dt`.
    Rotation { per_second: Vector3<f32> },
}

/// A single timed change to one node, applied incrementally.
///
/// The total change is converted to a per-second rate at construction and
/// the rate is applied scaled by each tick's `dt`. Progress therefore
/// compounds with whatever else moves the node; an animation never snaps
/// its target to an absolute pose.
#[derive(Debug, Clone)]
pub struct Animation {
    target: NodeId,
    duration: f32,
    elapsed: f32,
    kind: AnimationKind,
}

impl Animation {
    /// Moves `target` by `total` over `duration` seconds.
    ///
    /// Returns [`SceneError::InvalidDuration`] unless `duration` is
    /// strictly positive, since the rate divides by it.
    pub fn translation(
        target: NodeId,
        duration: f32,
        total: Vector3<f32>,
    ) -> Result<Self, SceneError> {
        Ok(Self {
            target,
            duration: Self::checked_duration(duration)?,
            elapsed: 0.0,
            kind: AnimationKind::Translation {
                per_second: total / duration,
            },
        })
    }

    /// Rotates `target` by `total` radians over `duration` seconds.
    pub fn rotation(
        target: NodeId,
        duration: f32,
        total: Vector3<f32>,
    ) -> Result<Self, SceneError> {
        Ok(Self {
            target,
            duration: Self::checked_duration(duration)?,
            elapsed: 0.0,
            kind: AnimationKind::Rotation {
                per_second: total / duration,
            },
        })
    }

    fn checked_duration(duration: f32) -> Result<f32, SceneError> {
        if duration > 0.0 {
            Ok(duration)
        } else {
            Err(SceneError::InvalidDuration(duration))
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// True once elapsed time has reached the duration. Terminal; a
    /// finished animation never runs again.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Applies one tick's worth of change to `target` and accrues `dt`.
    ///
    /// The full `dt` is applied even when it overshoots the duration; ticks
    /// are short enough that nobody has cared about the sliver of overrun.
    /// No-op once finished.
    pub(super) fn advance(&mut self, dt: f32, target: &mut SpatialNode) {
        if self.is_finished() {
            return;
        }
        debug_assert_eq!(target.id(), self.target);
        match self.kind {
            AnimationKind::Translation { per_second } => target.translate(per_second * dt),
            AnimationKind::Rotation { per_second } => target.rotate(per_second * dt),
        }
        self.elapsed += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshHandle;

    fn test_node() -> SpatialNode {
        SpatialNode::new(vec![MeshHandle(0)]).unwrap()
    }

    #[test]
    fn test_translation_applies_rate_times_dt() {
        let mut node = test_node();
        let mut animation =
            Animation::translation(node.id(), 2.0, Vector3::new(2.0, 0.0, -4.0)).unwrap();

        animation.advance(0.5, &mut node);

        assert_eq!(node.position(), Vector3::new(0.5, 0.0, -1.0));
        assert_eq!(animation.elapsed(), 0.5);
        assert!(!animation.is_finished());
    }

    #[test]
    fn test_rotation_applies_rate_times_dt() {
        let mut node = test_node();
        let mut animation =
            Animation::rotation(node.id(), 1.0, Vector3::new(0.0, 2.0, 0.0)).unwrap();

        animation.advance(0.25, &mut node);

        assert_eq!(node.orientation(), Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_overshooting_tick_finishes_animation() {
        let mut node = test_node();
        let mut animation =
            Animation::translation(node.id(), 1.0, Vector3::new(1.0, 0.0, 0.0)).unwrap();

        animation.advance(1.5, &mut node);

        // The whole tick lands, so the node overshoots the nominal total.
        assert_eq!(node.position().x, 1.5);
        assert!(animation.is_finished());

        animation.advance(1.0, &mut node);
        assert_eq!(node.position().x, 1.5);
    }

    #[test]
    fn test_duration_must_be_positive() {
        let node = test_node();
        assert!(matches!(
            Animation::translation(node.id(), 0.0, Vector3::new(1.0, 0.0, 0.0)),
            Err(SceneError::InvalidDuration(_))
        ));
        assert!(matches!(
            Animation::rotation(node.id(), -1.0, Vector3::new(1.0, 0.0, 0.0)),
            Err(SceneError::InvalidDuration(_))
        ));
    }
}
