use crate::{data_path, test_config};
use eps::io::{CsvTelemetry, TelemetrySource};
use eps::power::{Action, DutyCycleProfile, EpsConfig, OperatingMode};
use eps::time::Epoch;
use eps::{ConfigError, ConfigRepr};
use enum_iterator::all;

#[test]
fn data_file_matches_defaults() {
    let _ = pretty_env_logger::try_init();

    let config = test_config();
    config.validate().unwrap();
    assert_eq!(config, EpsConfig::cubesat());

    for mode in all::<OperatingMode>() {
        assert!(config.profile(mode).is_some(), "no profile for {mode}");
    }
    assert!(matches!(
        config.profile(OperatingMode::Camera),
        Some(DutyCycleProfile::Absolute(_))
    ));
    assert_eq!(config.power_w(Action::COMMS_TX_BEACON), 3.562);
}

#[test]
fn invalid_files() {
    assert!(matches!(
        EpsConfig::load(data_path("does_not_exist.yaml")),
        Err(ConfigError::ReadError { .. })
    ));

    assert!(matches!(
        EpsConfig::loads("battery_capacity_wh: [1, 2]"),
        Err(ConfigError::ParseError { .. })
    ));

    // Missing entries are caught when loading, whatever the loader
    assert!(matches!(
        EpsConfig::loads("battery_capacity_wh: 10.0\npower_draw_w: {}\nprofiles: {}\n"),
        Err(ConfigError::MissingProfile {
            mode: OperatingMode::InitialBoot
        })
    ));
}

#[test]
fn profile_without_power_draw() {
    // Every mode has a profile, but the downlink draw is missing from the power table
    let yaml = std::fs::read_to_string(data_path("eps_cubesat.yaml"))
        .unwrap()
        .replace("  COMMS_TX: 3.5632\n", "");
    let config: EpsConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config.profiles.len(), 10);
    assert!(!config.power_draw_w.contains_key(&Action::COMMS_TX));

    // Detumbling is the first mode, in declaration order, to downlink
    assert!(matches!(
        EpsConfig::loads(&yaml),
        Err(ConfigError::MissingPower {
            mode: OperatingMode::Detumbling,
            action: Action::COMMS_TX
        })
    ));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingPower {
            mode: OperatingMode::Detumbling,
            action: Action::COMMS_TX
        })
    ));
}

#[test]
fn generation_export() {
    let mut source = CsvTelemetry::from_path(data_path("generation.csv")).unwrap();
    let mut samples = Vec::new();
    while let Some(sample) = source.next_sample() {
        samples.push(sample.unwrap());
    }

    // The `nan` row is skipped
    assert_eq!(samples.len(), 4);
    assert_eq!(
        samples[0].epoch,
        Epoch::from_gregorian_utc_at_midnight(2024, 1, 1)
    );
    assert_eq!(samples[0].power_w, 18.412);
    assert_eq!(samples[2].power_w, 0.0);
    assert_eq!(
        samples[3].epoch,
        Epoch::from_gregorian_utc_hms(2024, 1, 1, 0, 4, 0)
    );
}
