use eps::cosmic::{
    dcm_ecef_to_eci, ecef_to_eci, ecef_to_eci_with_velocity, eci_to_ecef, julian_century,
    julian_date_validity_ceiling, julian_date_validity_floor, EARTH_EQUATORIAL_RADIUS_KM,
    EARTH_ROTATION_RATE_RAD_S,
};
use eps::linalg::Vector3;
use eps::time::{Epoch, Unit};
use eps::utils::is_orthonormal;
use eps::FrameError;
use rstest::*;

#[fixture]
fn ground_station() -> Vector3<f64> {
    // Roughly Vancouver, on the Earth's surface
    Vector3::new(-2_277.0, -3_490.0, 4_811.0)
}

#[rstest]
#[case(Epoch::from_gregorian_utc_hms(1900, 3, 1, 0, 0, 0))]
#[case(Epoch::from_gregorian_utc_hms(2000, 1, 1, 12, 0, 0))]
#[case(Epoch::from_gregorian_utc_hms(2024, 3, 15, 18, 30, 0))]
#[case(Epoch::from_gregorian_utc_hms(2051, 11, 30, 6, 45, 12))]
fn transform_is_a_rotation(ground_station: Vector3<f64>, #[case] epoch: Epoch) {
    let _ = pretty_env_logger::try_init();

    let dcm = dcm_ecef_to_eci(julian_century(epoch).unwrap());
    assert!(is_orthonormal(&dcm, 1e-9), "{epoch}: {dcm}");
    assert!((dcm.determinant() - 1.0).abs() < 1e-9);

    let eci = ecef_to_eci(&ground_station, epoch).unwrap();
    assert!((eci.norm() - ground_station.norm()).abs() < 1e-9 * ground_station.norm());

    let ecef = eci_to_ecef(&eci, epoch).unwrap();
    assert!(
        (ecef - ground_station).norm() < 1e-6 * ground_station.norm(),
        "round trip error {}",
        (ecef - ground_station).norm()
    );
}

#[rstest]
fn pole_is_nearly_invariant(#[values(0, 3, 6, 9, 12, 18)] hours: i64) {
    // Earth rotation spins about the pole, which only drifts through precession and nutation
    let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 6, 21) + hours * Unit::Hour;
    let pole = Vector3::new(0.0, 0.0, EARTH_EQUATORIAL_RADIUS_KM);
    let eci = ecef_to_eci(&pole, epoch).unwrap();
    let tilt = (eci.z / eci.norm()).acos();
    // Less than half a degree after a quarter century of precession
    assert!(tilt.to_degrees() < 0.5, "{tilt} rad");
}

#[test]
fn sidereal_day() {
    let epoch = Epoch::from_gregorian_utc_hms(2024, 1, 1, 0, 0, 0);
    let station = Vector3::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0, 0.0);
    let start = ecef_to_eci(&station, epoch).unwrap();
    // 23h 56m 4.0905s later, the station is back in the same inertial direction
    let end = ecef_to_eci(&station, epoch + 86_164.0905 * Unit::Second).unwrap();
    let angle = start.angle(&end);
    assert!(angle < 1e-4, "{angle} rad");

    let half = ecef_to_eci(&station, epoch + 43_082.045 * Unit::Second).unwrap();
    assert!((start.angle(&half) - std::f64::consts::PI).abs() < 1e-4);
}

#[rstest]
fn ground_velocity(ground_station: Vector3<f64>) {
    let epoch = Epoch::from_gregorian_utc_hms(2024, 3, 15, 18, 30, 0);
    let (eci, eci_vel) =
        ecef_to_eci_with_velocity(&ground_station, &Vector3::zeros(), epoch).unwrap();
    // A point at rest on the ground moves at ω⊕ times its distance to the spin axis
    let axis_distance = ground_station.xy().norm();
    assert!((eci_vel.norm() - EARTH_ROTATION_RATE_RAD_S * axis_distance).abs() < 1e-6);
    assert!(eci_vel.dot(&eci).abs() < 1e-6);
}

#[test]
fn before_validity_floor() {
    let floor = julian_date_validity_floor();
    let epoch = floor - 1 * Unit::Day;
    assert_eq!(
        ecef_to_eci(&Vector3::new(7000.0, 0.0, 0.0), epoch),
        Err(FrameError::BeforeValidityFloor { epoch })
    );
}

#[test]
fn after_validity_ceiling() {
    let station = Vector3::new(7000.0, 0.0, 0.0);
    let last_valid = julian_date_validity_ceiling() - 1 * Unit::Second;
    assert!(ecef_to_eci(&station, last_valid).is_ok());

    let epoch = Epoch::from_gregorian_utc_at_midnight(2100, 3, 1);
    assert_eq!(
        ecef_to_eci(&station, epoch),
        Err(FrameError::AfterValidityCeiling { epoch })
    );
}
