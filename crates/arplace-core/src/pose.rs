//! Placement poses and model manipulation

use bevy_math::{EulerRot, Quat, Vec3};

/// Distance of one directional nudge, in meters
pub const MOVE_STEP: f32 = 0.05;

/// Angle of one rotate shortcut, in degrees
pub const ROTATE_STEP_DEGREES: f32 = 15.0;

/// Factor of one grow shortcut (shrink uses the reciprocal)
pub const SCALE_STEP: f32 = 1.1;

/// Position and orientation captured from a surface hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl PlacementPose {
    /// Origin with no rotation, used by the debug placement shortcut
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

/// World transform of the active model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl ModelTransform {
    /// Unit-scale transform anchored at a placement pose
    pub fn at_pose(pose: &PlacementPose) -> Self {
        Self {
            translation: pose.position,
            rotation: pose.rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }

    /// Rotate in world space by Euler angles in degrees.
    ///
    /// The increment is applied about Z, then X, then Y, and composed on the
    /// left of the current rotation so the axes stay world-aligned.
    pub fn rotate_world(&mut self, euler_degrees: Vec3) {
        let delta = Quat::from_euler(
            EulerRot::YXZ,
            euler_degrees.y.to_radians(),
            euler_degrees.x.to_radians(),
            euler_degrees.z.to_radians(),
        );
        self.rotation = (delta * self.rotation).normalize();
    }

    pub fn scale_uniform(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

/// Directional move shortcuts shown on the manipulation panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Left,
    Right,
    Up,
    Down,
    Forward,
    Back,
}

impl Nudge {
    pub const ALL: [Nudge; 6] = [
        Nudge::Left,
        Nudge::Right,
        Nudge::Up,
        Nudge::Down,
        Nudge::Forward,
        Nudge::Back,
    ];

    /// Displacement of this nudge (forward is -Z)
    pub fn delta(self) -> Vec3 {
        let axis = match self {
            Nudge::Left => Vec3::NEG_X,
            Nudge::Right => Vec3::X,
            Nudge::Up => Vec3::Y,
            Nudge::Down => Vec3::NEG_Y,
            Nudge::Forward => Vec3::NEG_Z,
            Nudge::Back => Vec3::Z,
        };
        axis * MOVE_STEP
    }

    pub fn label(self) -> &'static str {
        match self {
            Nudge::Left => "Left",
            Nudge::Right => "Right",
            Nudge::Up => "Up",
            Nudge::Down => "Down",
            Nudge::Forward => "Forward",
            Nudge::Back => "Back",
        }
    }
}

/// A single manipulation request against the active model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Manipulation {
    /// Add a world-space offset
    Move(Vec3),
    /// Incremental world-space rotation, Euler angles in degrees
    Rotate(Vec3),
    /// Multiply the scale on every axis
    Scale(f32),
}

impl Manipulation {
    pub fn nudge(direction: Nudge) -> Self {
        Manipulation::Move(direction.delta())
    }

    pub fn rotate_left() -> Self {
        Manipulation::Rotate(Vec3::new(0.0, -ROTATE_STEP_DEGREES, 0.0))
    }

    pub fn rotate_right() -> Self {
        Manipulation::Rotate(Vec3::new(0.0, ROTATE_STEP_DEGREES, 0.0))
    }

    pub fn grow() -> Self {
        Manipulation::Scale(SCALE_STEP)
    }

    pub fn shrink() -> Self {
        Manipulation::Scale(1.0 / SCALE_STEP)
    }
}
