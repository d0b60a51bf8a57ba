//! Strahl- und Bounding-Box-Geometrie für das Picking.

use glam::{Mat4, Vec3};

/// Strahl im Render-Space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Startpunkt
    pub origin: Vec3,
    /// Normierte Richtung
    pub direction: Vec3,
}

impl Ray {
    /// Erstellt einen Strahl; die Richtung wird normiert.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Punkt bei Strahlparameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Schnitt mit einer lokalen AABB, die per `transform` in die Welt gelegt ist.
    ///
    /// Der Strahl wird in den lokalen Raum der Box gebracht (Slab-Test). Das
    /// zurückgegebene `t` bezieht sich auf den Welt-Strahl. Nur Treffer mit
    /// `t > 0` zählen; startet der Strahl in der Box, zählt der Austrittspunkt.
    pub fn intersect_oriented_box(&self, bounds: &Aabb, transform: &Mat4) -> Option<f32> {
        let inverse = transform.inverse();
        if !inverse.is_finite() {
            return None;
        }
        let local_origin = inverse.transform_point3(self.origin);
        let local_dir = inverse.transform_vector3(self.direction);

        let (t_near, t_far) = slab_interval(local_origin, local_dir, bounds)?;
        if t_far <= 0.0 {
            return None;
        }
        // local_dir ist nicht normiert, aber t ist affin invariant
        Some(if t_near > 0.0 { t_near } else { t_far })
    }
}

/// Achsenparallele Bounding-Box im lokalen Mesh-Raum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Erstellt eine Box aus zwei Ecken.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Würfel mit halber Kantenlänge `half_extent` um den Nullpunkt.
    pub fn cube(half_extent: f32) -> Self {
        Self::new(Vec3::splat(-half_extent), Vec3::splat(half_extent))
    }
}

fn slab_interval(origin: Vec3, dir: Vec3, bounds: &Aabb) -> Option<(f32, f32)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < f32::EPSILON {
            // Parallel zur Slab-Ebene: Ursprung muss innerhalb liegen
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - o) * inv;
        let mut t1 = (hi - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    Some((t_near, t_far))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hits_box_in_front_of_ray() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let transform = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let t = ray
            .intersect_oriented_box(&Aabb::cube(1.0), &transform)
            .expect("Treffer erwartet");
        assert_relative_eq!(t, 7.0, epsilon = 1e-4);
    }

    #[test]
    fn misses_box_behind_ray() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        let transform = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        assert!(ray
            .intersect_oriented_box(&Aabb::cube(1.0), &transform)
            .is_none());
    }

    #[test]
    fn misses_box_beside_ray() {
        let ray = Ray::new(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y);
        assert!(ray
            .intersect_oriented_box(&Aabb::cube(1.0), &Mat4::IDENTITY)
            .is_none());
    }

    #[test]
    fn rotated_box_uses_local_bounds() {
        // Lange, flache Box entlang lokalem X, um 90° um Y gedreht → liegt entlang Z
        let bounds = Aabb::new(Vec3::new(-5.0, -0.5, -0.5), Vec3::new(5.0, 0.5, 0.5));
        let transform = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let along_z = Ray::new(Vec3::new(0.0, 10.0, 4.0), Vec3::NEG_Y);
        let along_x = Ray::new(Vec3::new(4.0, 10.0, 0.0), Vec3::NEG_Y);
        assert!(along_z.intersect_oriented_box(&bounds, &transform).is_some());
        assert!(along_x.intersect_oriented_box(&bounds, &transform).is_none());
    }

    #[test]
    fn origin_inside_box_yields_exit_distance() {
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::X);
        let t = ray
            .intersect_oriented_box(&Aabb::cube(1.0), &Mat4::IDENTITY)
            .expect("Austritt erwartet");
        assert_relative_eq!(t, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn surrounding_box_loses_against_box_ahead() {
        // Strahl startet in einer großen Box; die kleine Box davor ist näher
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        let large = ray
            .intersect_oriented_box(&Aabb::cube(50.0), &Mat4::IDENTITY)
            .expect("Austritt erwartet");
        let small = ray
            .intersect_oriented_box(
                &Aabb::cube(1.0),
                &Mat4::from_translation(Vec3::new(0.0, -10.0, 0.0)),
            )
            .expect("Treffer erwartet");
        assert!(small < large);
    }
}
