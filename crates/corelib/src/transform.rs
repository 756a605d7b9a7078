use crate::{EulerRot, Mat4, Quat, Vec3};

/// Local node transform with non-uniform scale.
/// Composes as `T * R * S`; a child's world matrix is `parent * child`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Euler angles in radians (XYZ order).
    #[inline]
    pub fn from_euler(translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Self {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            rotation_euler.x,
            rotation_euler.y,
            rotation_euler.z,
        );
        Self::from_trs(translation, q, scale)
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Multiply the current scale component-wise.
    #[inline]
    pub fn scaled(mut self, factor: Vec3) -> Self {
        self.scale *= factor;
        self
    }

    /// Move in parent space.
    #[inline]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translation += offset;
        self
    }

    /// Rotate about `axis` in local space (after the current rotation).
    #[inline]
    pub fn rotated(mut self, axis: Vec3, angle_rad: f32) -> Self {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis.normalize(), angle_rad)).normalize();
        self
    }

    /// Rotate about local +Y.
    #[inline]
    pub fn yawed(self, angle_rad: f32) -> Self {
        self.rotated(Vec3::Y, angle_rad)
    }

    /// Rotate about local +X.
    #[inline]
    pub fn pitched(self, angle_rad: f32) -> Self {
        self.rotated(Vec3::X, angle_rad)
    }

    /// Rotate about local +Z.
    #[inline]
    pub fn rolled(self, angle_rad: f32) -> Self {
        self.rotated(Vec3::Z, angle_rad)
    }

    /// Build matrix = T * R * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * p)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
