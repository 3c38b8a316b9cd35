//! Great-circle bearings and beam deviations
//!
//! All angles are degrees. Queries between positions on different bodies
//! return `INVALID_BEARING` for bearings and 0 for deviations. So do
//! queries with no defined direction: a receiver straight above or below
//! the station, or a station at a pole where north is undefined.

use nalgebra::Vector3;

use crate::geo::GeoPosition;

pub const INVALID_BEARING: f64 = -999.0;

/// Half-angle of the cone above a VOR where bearings are unreliable
pub const ZONE_OF_CONFUSION_DEG: f64 = 45.0;

/// Sine below which two directions count as parallel
const PARALLEL_SINE: f64 = 1e-12;

/// Normal of the meridian through `vertical`, i.e. of the great circle
/// heading due north from it. None on the polar axis.
fn local_north(vertical: &Vector3<f64>) -> Option<Vector3<f64>> {
    Vector3::new(vertical.y, -vertical.x, 0.0).try_normalize(PARALLEL_SINE * vertical.norm())
}

/// Clockwise angle from `north` to the great circle with normal `circle`
fn angle_from_north(circle: &Vector3<f64>, north: &Vector3<f64>) -> f64 {
    let dot = (circle.x * north.x + circle.y * north.y).clamp(-1.0, 1.0);
    let angle = dot.acos().to_degrees();
    if circle.z >= 0.0 {
        angle
    } else {
        360.0 - angle
    }
}

fn bearing(station: &GeoPosition, receiver: &GeoPosition, north_at: &Vector3<f64>) -> f64 {
    if !station.same_body(receiver) {
        return INVALID_BEARING;
    }
    let (a, b) = (station.vector(), receiver.vector());
    let circle = a.cross(b).try_normalize(PARALLEL_SINE * a.norm() * b.norm());
    match (circle, local_north(north_at)) {
        (Some(circle), Some(north)) => angle_from_north(&circle, &north),
        _ => INVALID_BEARING,
    }
}

/// Bearing of the receiver from the station, true north at the station
pub fn bearing_from(station: &GeoPosition, receiver: &GeoPosition) -> f64 {
    bearing(station, receiver, station.vector())
}

/// Same great circle measured against true north at the receiver
pub fn bearing_to(station: &GeoPosition, receiver: &GeoPosition) -> f64 {
    bearing(station, receiver, receiver.vector())
}

/// Angle (deg) between the station's local vertical and the line to the receiver
pub fn zenith_angle(station: &GeoPosition, receiver: &GeoPosition) -> f64 {
    let vertical = station.vector();
    let offset = receiver.vector() - vertical;
    if offset.norm() == 0.0 {
        return 0.0;
    }
    let cos = vertical.dot(&offset) / (vertical.norm() * offset.norm());
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Receiver inside the overhead cone of a VOR
pub fn in_zone_of_confusion(station: &GeoPosition, receiver: &GeoPosition) -> bool {
    station.same_body(receiver) && zenith_angle(station, receiver) < ZONE_OF_CONFUSION_DEG
}

/// Wrap an angle into (-180, 180]
pub fn normalize_signed(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Wrap an angle into [0, 360)
pub fn normalize_heading(angle_deg: f64) -> f64 {
    angle_deg.rem_euclid(360.0)
}

/// Radial broadcast by a VOR; a test station always reads 0
pub fn vor_radial(station: &GeoPosition, receiver: &GeoPosition, radial_offset_deg: f64, test_station: bool) -> f64 {
    if test_station {
        return 0.0;
    }
    let from = bearing_from(station, receiver);
    if from == INVALID_BEARING {
        return INVALID_BEARING;
    }
    from + radial_offset_deg
}

/// Localizer needle in beam half-widths, positive right of course.
/// Behind the antenna (back course) the sense reverses.
pub fn localizer_deviation(
    station: &GeoPosition,
    receiver: &GeoPosition,
    beam_bearing_deg: f64,
    beam_half_width_deg: f64,
) -> f64 {
    let from = bearing_from(station, receiver);
    if from == INVALID_BEARING {
        return 0.0;
    }
    let relative = normalize_signed(from - beam_bearing_deg);
    let deviation = relative.to_radians().sin() / beam_half_width_deg.to_radians().sin();
    if relative.abs() > 90.0 {
        -deviation
    } else {
        deviation
    }
}

/// Glideslope needle in beam half-widths, positive above the path
pub fn glideslope_deviation(
    station: &GeoPosition,
    receiver: &GeoPosition,
    glidepath_angle_deg: f64,
    beam_half_width_deg: f64,
) -> f64 {
    if !station.same_body(receiver) {
        return 0.0;
    }
    let elevation_angle = 90.0 - zenith_angle(station, receiver);
    (elevation_angle - glidepath_angle_deg) / beam_half_width_deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CelestialBody;

    fn kerbin_at(lat: f64, lon: f64, elev: f64) -> GeoPosition {
        GeoPosition::at(CelestialBody::kerbin(), lat, lon, elev)
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_cardinal_bearings() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        assert!(close(bearing_from(&station, &kerbin_at(1.0, 0.0, 0.0)), 0.0, 1e-6));
        assert!(close(bearing_from(&station, &kerbin_at(0.0, 1.0, 0.0)), 90.0, 1e-6));
        assert!(close(bearing_from(&station, &kerbin_at(-1.0, 0.0, 0.0)), 180.0, 1e-6));
        assert!(close(bearing_from(&station, &kerbin_at(0.0, -1.0, 0.0)), 270.0, 1e-6));
    }

    #[test]
    fn test_bearing_to_uses_receiver_north() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        let receiver = kerbin_at(0.0, 1.0, 0.0);
        // Along the equator north is the same everywhere
        assert!(close(bearing_to(&station, &receiver), 90.0, 1e-6));
    }

    #[test]
    fn test_cross_body_sentinel() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        let receiver = GeoPosition::at(CelestialBody::mun(), 1.0, 0.0, 0.0);
        assert_eq!(bearing_from(&station, &receiver), INVALID_BEARING);
        assert_eq!(bearing_to(&station, &receiver), INVALID_BEARING);
        assert_eq!(vor_radial(&station, &receiver, 5.0, false), INVALID_BEARING);
        assert_eq!(localizer_deviation(&station, &receiver, 0.0, 5.0), 0.0);
        assert_eq!(glideslope_deviation(&station, &receiver, 3.0, 1.5), 0.0);
        assert!(!in_zone_of_confusion(&station, &receiver));
    }

    #[test]
    fn test_vor_radial() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        let receiver = kerbin_at(0.0, 1.0, 0.0);
        assert!(close(vor_radial(&station, &receiver, -5.0, false), 85.0, 1e-6));
        assert_eq!(vor_radial(&station, &receiver, -5.0, true), 0.0);
    }

    #[test]
    fn test_zone_of_confusion() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        assert!(in_zone_of_confusion(&station, &kerbin_at(0.001, 0.0, 1000.0)));
        assert!(!in_zone_of_confusion(&station, &kerbin_at(0.5, 0.0, 1000.0)));
    }

    #[test]
    fn test_localizer_deviation() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        let on_course = kerbin_at(0.1, 0.0, 300.0);
        assert!(close(localizer_deviation(&station, &on_course, 0.0, 5.0), 0.0, 1e-6));

        // 5 degrees right of a north course is one full half-width
        let right = kerbin_at(0.1, 0.1 * 5f64.to_radians().tan(), 0.0);
        assert!(close(localizer_deviation(&station, &right, 0.0, 5.0), 1.0, 1e-3));

        // Back course: same side reads reversed
        let behind_right = kerbin_at(-0.1, 0.1 * 5f64.to_radians().tan(), 0.0);
        assert!(close(localizer_deviation(&station, &behind_right, 0.0, 5.0), -1.0, 1e-3));
    }

    #[test]
    fn test_glideslope_deviation() {
        let station = kerbin_at(0.0, 0.0, 0.0);
        let ground_range = 10_000.0;
        let lon = (ground_range / 600_000.0f64).to_degrees();
        // Horizontal at the station tilts away with the curvature of the body
        let on_path = kerbin_at(0.0, lon, 0.0);
        let dev = glideslope_deviation(&station, &on_path, 3.0, 1.5);
        assert!(dev < -1.5);

        let overhead = kerbin_at(0.0, 0.0, 1000.0);
        assert!(close(glideslope_deviation(&station, &overhead, 3.0, 1.5), 58.0, 1e-6));
    }

    #[test]
    fn test_overhead_has_no_bearing() {
        let station = kerbin_at(10.0, 20.0, 0.0);
        let overhead = kerbin_at(10.0, 20.0, 3000.0);
        assert_eq!(bearing_from(&station, &overhead), INVALID_BEARING);
        assert_eq!(bearing_to(&station, &overhead), INVALID_BEARING);
        assert_eq!(vor_radial(&station, &overhead, 0.0, false), INVALID_BEARING);
        assert_eq!(localizer_deviation(&station, &overhead, 90.0, 5.0), 0.0);
        assert_eq!(zenith_angle(&station, &station), 0.0);
    }

    #[test]
    fn test_polar_station_has_no_bearing() {
        let pole = kerbin_at(90.0, 0.0, 0.0);
        let receiver = kerbin_at(89.0, 45.0, 0.0);
        assert_eq!(bearing_from(&pole, &receiver), INVALID_BEARING);
        assert_eq!(localizer_deviation(&pole, &receiver, 0.0, 5.0), 0.0);
        // North is still defined at the receiver
        let to = bearing_to(&pole, &receiver);
        assert!((0.0..=360.0).contains(&to));
    }

    #[test]
    fn test_normalize_signed() {
        assert_eq!(normalize_signed(180.0), 180.0);
        assert_eq!(normalize_signed(-180.0), 180.0);
        assert_eq!(normalize_signed(190.0), -170.0);
        assert_eq!(normalize_signed(-10.0), -10.0);
        assert_eq!(normalize_heading(-10.0), 350.0);
    }
}
