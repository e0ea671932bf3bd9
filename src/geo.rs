//! Coordinate math for the globe: lat/long to 3D vectors, great-circle
//! arcs, and equirectangular pixel mapping.
//!
//! Longitude is negated before conversion so that positions line up with
//! the globe texture orientation (longitude increases westward here).

use glam::Vec3;

/// Below this interpolation angle two arc endpoints are treated as the
/// same point, so the arc collapses to its origin instead of dividing
/// by a vanishing sin.
const MIN_ARC_ANGLE: f32 = 1e-6;

/// Convert latitude/longitude in degrees to a point on a sphere of the
/// given radius.
pub fn to_vector(lat: f32, lng: f32, radius: f32) -> Vec3 {
    let lat_rad = lat.to_radians();
    let lon_rad = (-lng).to_radians();
    Vec3::new(
        lat_rad.cos() * lon_rad.cos() * radius,
        lat_rad.sin() * radius,
        lat_rad.cos() * lon_rad.sin() * radius,
    )
}

/// Inverse of [`to_vector`]: recover (lat, lng) in degrees from a point
/// on (or near) the sphere.
#[allow(dead_code)] // picking/hover support lives in the rendering layer, the inverse mapping stays with the forward one
pub fn to_lat_lng(vector: Vec3) -> (f32, f32) {
    let n = vector.normalize();
    let lat = 90.0 - n.y.clamp(-1.0, 1.0).acos().to_degrees();
    let lng = -n.z.atan2(n.x).to_degrees();
    (lat, lng)
}

/// Equirectangular projection of (lat, lng) into image pixel
/// coordinates, floored to integers.
#[allow(dead_code)] // consumed by the texture mapping path, kept with the rest of the geo math
pub fn lat_long_to_pixel(lat: f32, lng: f32, width: u32, height: u32) -> (u32, u32) {
    let x = ((lng + 180.0) / 360.0 * width as f32).floor();
    let y = ((90.0 - lat) / 180.0 * height as f32).floor();
    (x.max(0.0) as u32, y.max(0.0) as u32)
}

/// Great-circle interpolation curve between two points on a sphere.
///
/// `point(t)` for t in [0, 1] walks the shorter arc from origin to
/// destination at constant angular speed.
#[derive(Clone, Copy, Debug)]
pub struct SphereArc {
    origin: Vec3,
    dest: Vec3,
}

impl SphereArc {
    /// Arc between two (lat, lng) pairs on a sphere of the given radius.
    #[allow(dead_code)] // geometry building works from resolved globe vectors; this is the lat/lng entry point
    pub fn new(origin: (f32, f32), dest: (f32, f32), radius: f32) -> Self {
        Self {
            origin: to_vector(origin.0, origin.1, radius),
            dest: to_vector(dest.0, dest.1, radius),
        }
    }

    /// Arc between two points already in sphere space. The points carry
    /// the radius implicitly.
    pub fn between(origin: Vec3, dest: Vec3) -> Self {
        Self { origin, dest }
    }

    pub fn point(&self, t: f32) -> Vec3 {
        let theta = self.origin.angle_between(self.dest);
        let sin_theta = theta.sin();
        if sin_theta.abs() < MIN_ARC_ANGLE {
            // Identical (or antipodal) endpoints: collapse to the origin
            // rather than propagating NaN.
            return self.origin;
        }
        (self.origin * ((1.0 - t) * theta).sin() + self.dest * (t * theta).sin()) / sin_theta
    }
}

#[cfg(test)]
mod tests {
    use super::{lat_long_to_pixel, to_lat_lng, to_vector, SphereArc};
    use glam::Vec3;

    const EPS: f32 = 1e-4;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn prime_meridian_equator_points_along_x() {
        assert!(close(to_vector(0.0, 0.0, 100.0), Vec3::new(100.0, 0.0, 0.0)));
    }

    #[test]
    fn ninety_east_points_along_negative_z() {
        assert!(close(to_vector(0.0, 90.0, 100.0), Vec3::new(0.0, 0.0, -100.0)));
    }

    #[test]
    fn north_pole_points_along_y() {
        assert!(close(to_vector(90.0, 0.0, 50.0), Vec3::new(0.0, 50.0, 0.0)));
    }

    #[test]
    fn round_trip_lat_lng() {
        let samples = [
            (0.0f32, 0.0f32),
            (48.9, 2.3),
            (-33.9, 151.2),
            (35.7, 139.7),
            (40.7, -74.0),
            (-55.0, -70.0),
            (12.5, 170.0),
        ];
        for (lat, lng) in samples {
            let (lat2, lng2) = to_lat_lng(to_vector(lat, lng, 100.0));
            assert!((lat - lat2).abs() < EPS, "lat {lat} -> {lat2}");
            assert!((lng - lng2).abs() < EPS, "lng {lng} -> {lng2}");
        }
    }

    #[test]
    fn arc_hits_both_endpoints() {
        let a = (48.9f32, 2.3f32);
        let b = (35.7f32, 139.7f32);
        let arc = SphereArc::new(a, b, 100.0);
        assert!(close(arc.point(0.0), to_vector(a.0, a.1, 100.0)));
        assert!(close(arc.point(1.0), to_vector(b.0, b.1, 100.0)));
    }

    #[test]
    fn arc_midpoint_bisects() {
        let arc = SphereArc::new((0.0, 0.0), (0.0, 90.0), 100.0);
        let expected = (Vec3::new(1.0, 0.0, 0.0) + Vec3::new(0.0, 0.0, -1.0)).normalize() * 100.0;
        assert!(close(arc.point(0.5), expected));
    }

    #[test]
    fn arc_midpoint_stays_on_sphere() {
        let arc = SphereArc::new((40.7, -74.0), (51.5, -0.1), 100.0);
        assert!((arc.point(0.5).length() - 100.0).abs() < 1e-2);
    }

    #[test]
    fn degenerate_arc_collapses_to_origin() {
        let arc = SphereArc::new((10.0, 20.0), (10.0, 20.0), 100.0);
        let origin = to_vector(10.0, 20.0, 100.0);
        for t in [0.0, 0.25, 0.5, 1.0] {
            let p = arc.point(t);
            assert!(p.is_finite());
            assert!(close(p, origin));
        }
    }

    #[test]
    fn pixel_mapping_floors() {
        assert_eq!(lat_long_to_pixel(0.0, 0.0, 360, 180), (180, 90));
        assert_eq!(lat_long_to_pixel(90.0, -180.0, 360, 180), (0, 0));
        assert_eq!(lat_long_to_pixel(-89.9, 179.9, 360, 180), (359, 179));
    }
}
