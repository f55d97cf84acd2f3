//! Collision shape abstractions
//!
//! Shapes are stored in model space; scale and placement come from the body.

use std::rc::Rc;

use crate::foundation::math::Vec3;
use super::mesh::TriangleMesh;

/// Kind of collision shape a body is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned box fitted to the model bounds
    Box,
    /// Sphere fitted to the model bounds
    Sphere,
    /// Triangle mesh built from the model geometry
    Mesh,
}

impl ShapeKind {
    /// Byte used for this kind in entity records
    pub fn code(self) -> u8 {
        match self {
            Self::Box => 1,
            Self::Sphere => 2,
            Self::Mesh => 3,
        }
    }

    /// Kind for a record byte; unknown bytes mean "no physics"
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Box),
            2 => Some(Self::Sphere),
            3 => Some(Self::Mesh),
            _ => None,
        }
    }
}

/// Collision geometry in model space
#[derive(Debug, Clone)]
pub enum CollisionShape {
    /// Box with half extents, centered at `offset`
    Box {
        /// Half size along each axis
        half_extents: Vec3,
        /// Center relative to the body origin
        offset: Vec3,
    },
    /// Sphere centered at `offset`
    Sphere {
        /// Sphere radius
        radius: f32,
        /// Center relative to the body origin
        offset: Vec3,
    },
    /// Shared triangle mesh
    Mesh(Rc<TriangleMesh>),
}

impl CollisionShape {
    /// Box covering `bb_min..bb_max`
    pub fn fitted_box(bb_min: Vec3, bb_max: Vec3) -> Self {
        Self::Box {
            half_extents: (bb_max - bb_min) * 0.5,
            offset: (bb_min + bb_max) * 0.5,
        }
    }

    /// Sphere sized from the bounds
    ///
    /// The radius is half the extent of the first axis (x, then y) that is
    /// strictly larger than both others; otherwise the z extent is used.
    pub fn fitted_sphere(bb_min: Vec3, bb_max: Vec3) -> Self {
        let dx = bb_max.x - bb_min.x;
        let dy = bb_max.y - bb_min.y;
        let dz = bb_max.z - bb_min.z;

        let extent = if dx > dy && dx > dz {
            dx
        } else if dy > dx && dy > dz {
            dy
        } else {
            dz
        };

        Self::Sphere {
            radius: extent * 0.5,
            offset: (bb_min + bb_max) * 0.5,
        }
    }

    /// Kind of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Box { .. } => ShapeKind::Box,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Mesh(_) => ShapeKind::Mesh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shape_codes() {
        for kind in [ShapeKind::Box, ShapeKind::Sphere, ShapeKind::Mesh] {
            assert_eq!(ShapeKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ShapeKind::from_code(0), None);
        assert_eq!(ShapeKind::from_code(4), None);
    }

    #[test]
    fn test_fitted_box() {
        let shape = CollisionShape::fitted_box(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 4.0, 2.0));
        match shape {
            CollisionShape::Box { half_extents, offset } => {
                assert_relative_eq!(half_extents, Vec3::new(1.0, 2.0, 2.0));
                assert_relative_eq!(offset, Vec3::new(0.0, 2.0, 0.0));
            }
            other => panic!("expected box, got {:?}", other),
        }
    }

    #[test]
    fn test_sphere_radius_prefers_strictly_largest_axis() {
        let radius = |min: Vec3, max: Vec3| match CollisionShape::fitted_sphere(min, max) {
            CollisionShape::Sphere { radius, .. } => radius,
            other => panic!("expected sphere, got {:?}", other),
        };

        assert_relative_eq!(radius(Vec3::zeros(), Vec3::new(4.0, 2.0, 1.0)), 2.0);
        assert_relative_eq!(radius(Vec3::zeros(), Vec3::new(1.0, 6.0, 2.0)), 3.0);
        // x and y tie, so neither is strictly largest and z wins
        assert_relative_eq!(radius(Vec3::zeros(), Vec3::new(4.0, 4.0, 1.0)), 0.5);
    }
}
