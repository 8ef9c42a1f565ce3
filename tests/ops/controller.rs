use crate::{generation, test_config};
use approx::assert_relative_eq;
use eps::ops::{ModeController, ModeError, ModeEvent};
use eps::power::{Action, OperatingMode, Subsystem};
use eps::time::Unit;
use rstest::*;
use std::sync::Arc;

/// Controller booted and recovered into Idle, with a healthy generation.
fn idle_controller(battery_wh: f64) -> ModeController {
    let mut config = test_config();
    config.initial_level_wh = Some(battery_wh);
    let mut ctrl = ModeController::from_config(Arc::new(config)).unwrap();
    ctrl.ingest(generation(18.0));

    ctrl.execute(ModeEvent::BootComplete, 0 * Unit::Second)
        .unwrap();
    assert_eq!(ctrl.mode(), OperatingMode::Safe);
    ctrl.execute(
        ModeEvent::Recovered {
            antenna_deployed: true,
            fault_cleared: true,
        },
        0 * Unit::Second,
    )
    .unwrap();
    assert_eq!(ctrl.mode(), OperatingMode::Idle);
    ctrl
}

#[test]
fn picture_demoted_on_empty_battery() {
    let _ = pretty_env_logger::try_init();

    let mut ctrl = idle_controller(0.05);
    let level_wh = ctrl.engine().battery().level_wh();

    let err = ctrl
        .execute(ModeEvent::PictureCommand, 60 * Unit::Second)
        .unwrap_err();
    match &err {
        ModeError::InsufficientPower { report, demoted_to } => {
            assert_eq!(*demoted_to, Some(OperatingMode::LowPower));
            assert!(report.energy_wh > level_wh);
        }
        other => panic!("unexpected {other}"),
    }
    println!("{err}");

    assert_eq!(ctrl.mode(), OperatingMode::LowPower);
    assert_eq!(ctrl.engine().battery().level_wh(), level_wh);
    assert_eq!(
        ctrl.last_report().map(|report| report.mode),
        Some(OperatingMode::Camera)
    );
}

#[test]
fn picture_reports_capture() {
    let mut ctrl = idle_controller(40.0);
    ctrl.execute(ModeEvent::PictureCommand, 0 * Unit::Second)
        .unwrap();
    assert_eq!(ctrl.mode(), OperatingMode::Camera);
    assert_eq!(
        ctrl.tracker().get(Subsystem::Camera),
        Some(Action::CAM_CAPTURE)
    );
    assert_eq!(ctrl.tracker().get(Subsystem::Adcs), Some(Action::ADCS_IDLE));

    ctrl.execute(ModeEvent::CaptureComplete, 0 * Unit::Second)
        .unwrap();
    assert_eq!(ctrl.tracker().get(Subsystem::Camera), Some(Action::CAM_OFF));
}

#[test]
fn orientation_and_back() {
    let _ = pretty_env_logger::try_init();

    let mut ctrl = idle_controller(40.0);
    let before_wh = ctrl.engine().battery().level_wh();

    let report = ctrl
        .execute(ModeEvent::OrientationCommand, 100 * Unit::Second)
        .unwrap();
    // ADCS_IDLE 79.04%, ADCS_ACTUATE 0.962%, COMMS_TX, EPS_IDLE and OBC_IDLE throughout
    let expected_wh =
        (0.7904 * 0.3044 + 0.00962 * 2.0 + 3.5632 + 0.075 + 0.63) * 100.0 / 3600.0;
    assert_relative_eq!(report.energy_wh, expected_wh, epsilon = 1e-6);
    assert_eq!(ctrl.mode(), OperatingMode::Detumbling);
    assert_relative_eq!(
        ctrl.engine().battery().level_wh(),
        before_wh - expected_wh,
        epsilon = 1e-9
    );
    assert_eq!(
        ctrl.tracker().get(Subsystem::Comms),
        Some(Action::COMMS_TX)
    );
    // Magnetorquers only actuate about 1% of the time while detumbling
    assert_eq!(ctrl.tracker().get(Subsystem::Adcs), Some(Action::ADCS_IDLE));

    ctrl.execute(ModeEvent::ManeuverComplete, 10 * Unit::Minute)
        .unwrap();
    assert_eq!(ctrl.mode(), OperatingMode::Idle);
    assert_eq!(
        ctrl.tracker().get(Subsystem::Comms),
        Some(Action::COMMS_TX_BEACON)
    );

    let snapshot = ctrl.snapshot();
    assert_eq!(snapshot.mode, OperatingMode::Idle);
    assert_eq!(snapshot.subsystems, ctrl.tracker().state());
    println!("{snapshot}");
}

#[rstest]
#[case(ModeEvent::OrientationCommand, ModeEvent::ManeuverComplete, OperatingMode::Detumbling)]
#[case(ModeEvent::PictureCommand, ModeEvent::CaptureComplete, OperatingMode::Camera)]
#[case(ModeEvent::CentrifugeCommand, ModeEvent::SpinComplete, OperatingMode::Centrifuge)]
#[case(ModeEvent::StartTransmission, ModeEvent::PassComplete, OperatingMode::GroundPass)]
#[case(
    ModeEvent::CriticalStateOfCharge,
    ModeEvent::StateOfChargeNominal,
    OperatingMode::LowPower
)]
fn mission_modes(
    #[case] enter: ModeEvent,
    #[case] leave: ModeEvent,
    #[case] mode: OperatingMode,
) {
    let mut ctrl = idle_controller(40.0);
    ctrl.execute(enter, 5 * Unit::Minute).unwrap();
    assert_eq!(ctrl.mode(), mode);

    // The completion event of another mode is rejected without side effects
    let level_wh = ctrl.engine().battery().level_wh();
    let wrong = if leave == ModeEvent::PassComplete {
        ModeEvent::SpinComplete
    } else {
        ModeEvent::PassComplete
    };
    assert_eq!(
        ctrl.execute(wrong, 5 * Unit::Minute),
        Err(ModeError::InvalidTransition {
            from: mode,
            event: wrong
        })
    );
    assert_eq!(ctrl.engine().battery().level_wh(), level_wh);

    ctrl.execute(leave, 5 * Unit::Minute).unwrap();
    assert_eq!(ctrl.mode(), OperatingMode::Idle);
}

#[test]
fn fault_goes_to_safe() {
    let mut ctrl = idle_controller(40.0);
    ctrl.execute(ModeEvent::StartTransmission, 8 * Unit::Minute)
        .unwrap();
    ctrl.execute(ModeEvent::Fault, 1 * Unit::Minute).unwrap();
    assert_eq!(ctrl.mode(), OperatingMode::Safe);

    // Safe mode is only left once the antenna is deployed and the fault cleared
    assert!(ctrl
        .execute(
            ModeEvent::Recovered {
                antenna_deployed: true,
                fault_cleared: false,
            },
            1 * Unit::Minute,
        )
        .is_err());
    assert_eq!(ctrl.mode(), OperatingMode::Safe);
}

#[test]
fn no_generation_reading() {
    let mut config = test_config();
    config.initial_level_wh = Some(40.0);
    let mut ctrl = ModeController::from_config(Arc::new(config)).unwrap();
    assert!(matches!(
        ctrl.execute(ModeEvent::BootComplete, 1 * Unit::Minute),
        Err(ModeError::InsufficientPower {
            demoted_to: None,
            ..
        })
    ));
    assert_eq!(ctrl.mode(), OperatingMode::InitialBoot);
}
