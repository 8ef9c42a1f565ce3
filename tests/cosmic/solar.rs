use eps::cosmic::eclipse::sun_position_km;
use eps::cosmic::{
    eci_to_ecef, julian_date_validity_floor, utc_to_julian_date, CylindricalShadow, FullSun,
    SolarPowerPredictor, AU,
};
use eps::linalg::Vector3;
use eps::time::{Epoch, Unit};
use eps::FrameError;
use rstest::*;

#[fixture]
fn predictor() -> SolarPowerPredictor<CylindricalShadow> {
    SolarPowerPredictor::new(
        0.28,
        CylindricalShadow::builder().array_area_m2(0.06).build(),
    )
}

/// ECEF position of a spacecraft at 7000 km from the Earth's center, along or against the Sun.
fn along_sun(epoch: Epoch, sign: f64) -> Vector3<f64> {
    let sun = sun_position_km(utc_to_julian_date(epoch).unwrap());
    eci_to_ecef(&(sign * 7000.0 * sun.normalize()), epoch).unwrap()
}

#[rstest]
#[case(Epoch::from_gregorian_utc_at_midnight(2024, 1, 3))]
#[case(Epoch::from_gregorian_utc_hms(2024, 7, 5, 12, 0, 0))]
fn sunlit_and_eclipsed(predictor: SolarPowerPredictor<CylindricalShadow>, #[case] epoch: Epoch) {
    let _ = pretty_env_logger::try_init();

    let lit = predictor.predict(&along_sun(epoch, 1.0), epoch).unwrap();
    // 0.28 * 0.06 m^2 * 1361 W/m^2, within the seasonal inverse square variation
    let nominal = 0.28 * 0.06 * 1361.0;
    assert!(
        (lit - nominal).abs() < 0.05 * nominal,
        "{epoch}: {lit} W vs {nominal} W"
    );

    let dark = predictor.predict(&along_sun(epoch, -1.0), epoch).unwrap();
    assert_eq!(dark, 0.0, "{epoch}: eclipsed spacecraft generates {dark} W");
}

#[test]
fn sun_distance() {
    for (month, day) in [(1, 3), (4, 1), (7, 4), (10, 1)] {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, month, day);
        let distance_au = sun_position_km(utc_to_julian_date(epoch).unwrap()).norm() / AU;
        assert!(
            (0.98..=1.02).contains(&distance_au),
            "{epoch}: {distance_au} AU"
        );
    }
}

#[test]
fn samples_are_ready_for_ingestion() {
    let epoch = Epoch::from_gregorian_utc_hms(2024, 3, 15, 18, 30, 0);
    let predictor = SolarPowerPredictor::new(0.3, FullSun { irradiance_w: 60.0 });
    let sample = predictor
        .sample(&Vector3::new(7000.0, 0.0, 0.0), epoch)
        .unwrap();
    assert_eq!(sample.epoch, epoch);
    assert!((sample.power_w - 18.0).abs() < 1e-12);

    let too_early = julian_date_validity_floor() - 1 * Unit::Second;
    assert_eq!(
        predictor.sample(&Vector3::new(7000.0, 0.0, 0.0), too_early),
        Err(FrameError::BeforeValidityFloor { epoch: too_early })
    );
}
