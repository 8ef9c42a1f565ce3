use crate::{generation, test_config_arcd};
use approx::assert_relative_eq;
use enum_iterator::all;
use eps::power::{OperatingMode, PowerBudgetEngine};
use eps::time::Unit;
use rstest::*;

#[fixture]
fn engine() -> PowerBudgetEngine {
    let mut engine = PowerBudgetEngine::new(test_config_arcd()).unwrap();
    engine.ingest(generation(18.0));
    engine
}

#[rstest]
fn battery_never_goes_negative(mut engine: PowerBudgetEngine) {
    let _ = pretty_env_logger::try_init();

    let capacity_wh = engine.battery().capacity_wh();
    let mut drawn_wh = 0.0;
    // Cycle through every mode until the battery can no longer pay for any of them
    for orbit in 0..200 {
        for mode in all::<OperatingMode>() {
            let before_wh = engine.battery().level_wh();
            let report = engine.apply(mode, 30 * Unit::Minute);
            let after_wh = engine.battery().level_wh();

            assert!(after_wh >= 0.0 && after_wh <= capacity_wh);
            assert_eq!(report.battery_level_wh, after_wh);
            if report.feasible {
                assert_relative_eq!(before_wh - after_wh, report.energy_wh, epsilon = 1e-12);
                drawn_wh += report.energy_wh;
            } else {
                assert_eq!(before_wh, after_wh, "orbit {orbit}: {mode} changed the battery");
                assert!(report.energy_wh > before_wh);
            }
        }
    }
    assert_relative_eq!(
        engine.battery().level_wh(),
        capacity_wh - drawn_wh,
        epsilon = 1e-9
    );
    // Drained down to below the cheapest mode
    for mode in all::<OperatingMode>() {
        assert!(!engine.is_feasible(mode, 30 * Unit::Minute, 18.0), "{mode}");
    }
}

#[rstest]
fn detumbling_energy(engine: PowerBudgetEngine) {
    let report = engine.evaluate(OperatingMode::Detumbling, 100 * Unit::Second);
    let expected_wh = (0.7904 * 0.3044 + 0.00962 * 2.0 + 3.5632 + 0.075 + 0.63) * 100.0 / 3600.0;
    assert_relative_eq!(report.energy_wh, expected_wh, epsilon = 1e-9);
    assert!(report.feasible);
    assert_eq!(report.breakdown.len(), 6);
}

#[rstest]
fn generation_gate(mut engine: PowerBudgetEngine) {
    let average_w = engine.average_consumption_w();
    assert_relative_eq!(average_w, 16.8877, epsilon = 1e-9);

    engine.ingest(generation(average_w - 0.01));
    let report = engine.apply(OperatingMode::LowPower, 1 * Unit::Minute);
    assert!(report.battery_ok);
    assert!(!report.generation_ok);
    assert!(!report.feasible);
    assert_eq!(engine.battery().level_wh(), engine.battery().capacity_wh());

    engine.ingest(generation(average_w));
    assert!(engine.apply(OperatingMode::LowPower, 1 * Unit::Minute).feasible);
}
