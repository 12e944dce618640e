//! End-to-end flow from a YAML configuration to written output files.

use std::collections::HashSet;
use std::path::PathBuf;

use breakup::config::BreakupConfig;
use breakup::error::BreakupError;
use breakup::input::read_satellites;
use breakup::output::build_output_targets;
use breakup::simulation::builder::{BreakupBuilder, SimulationKind};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("breakup-e2e").join(name);
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

const SATELLITES_YAML: &str = "\
satellites:
  - id: 24946
    name: \"Iridium 33\"
    satType: SPACECRAFT
    mass: 560.0
    velocity: [11700.0, 0.0, 0.0]
    position: [6900000.0, 0.0, 0.0]
  - id: 22675
    name: \"Kosmos 2251\"
    satType: SPACECRAFT
    mass: 950.0
    velocity: [0.0, 0.0, 0.0]
    position: [6900000.0, 0.0, 0.0]
";

#[test]
fn configured_collision_runs_and_writes_outputs() {
    let dir = temp_dir("collision");
    let data_path = dir.join("satellites.yaml");
    let config_path = dir.join("config.yaml");
    let result_csv = dir.join("result.csv");
    let result_vtu = dir.join("result.vtu");

    std::fs::write(&data_path, SATELLITES_YAML).expect("write data");
    let config_yaml = format!(
        "simulation:\n  \
           minimalCharacteristicLength: 0.05\n  \
           simulationType: COLLISION\n  \
           inputSource: [\"{}\"]\n\
         resultOutput:\n  \
           target: [\"{}\", \"{}\"]\n  \
           kepler: true\n",
        data_path.display(),
        result_csv.display(),
        result_vtu.display()
    );
    std::fs::write(&config_path, config_yaml).expect("write config");

    let config = BreakupConfig::load(&config_path).expect("load config");
    let satellites = read_satellites(&config.simulation.input_source).expect("read satellites");
    assert_eq!(satellites.len(), 2);

    let mut simulation = BreakupBuilder::new(
        config
            .minimal_characteristic_length()
            .expect("required tag"),
    )
    .simulation_kind(config.simulation_kind())
    .current_max_id(config.simulation.current_max_id)
    .id_filter(config.id_filter())
    .enforce_mass_conservation(config.simulation.enforce_mass_conservation)
    .satellites(satellites)
    .build()
    .expect("build simulation");

    simulation.set_seed(Some(1234)).set_sequential(true);
    simulation.run();
    assert_eq!(simulation.result_soa().len(), 4064);

    let section = config.result_output.as_ref().expect("result output");
    let result = simulation.result();
    for target in build_output_targets(section).expect("writers") {
        target.write(&result).expect("write output");
    }

    let csv = std::fs::read_to_string(&result_csv).expect("read csv");
    // Header plus one row per fragment.
    assert_eq!(csv.lines().count(), 4065);
    assert!(csv.lines().next().is_some_and(|header| header.ends_with("Mean Anomaly [rad]")));

    let vtu = std::fs::read_to_string(&result_vtu).expect("read vtu");
    assert!(vtu.contains(r#"NumberOfPoints="4064""#));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn declared_explosion_with_two_parents_is_a_cardinality_error() {
    let dir = temp_dir("cardinality");
    let data_path = dir.join("satellites.yaml");
    std::fs::write(&data_path, SATELLITES_YAML).expect("write data");

    let satellites = read_satellites(&[data_path]).expect("read satellites");
    let result = BreakupBuilder::new(0.05)
        .simulation_kind(SimulationKind::Explosion)
        .satellites(satellites)
        .build();
    assert!(matches!(
        result,
        Err(BreakupError::InputCardinality { actual: 2, .. })
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_kind_with_two_parents_becomes_a_collision() {
    let dir = temp_dir("derived");
    let data_path = dir.join("satellites.yaml");
    std::fs::write(&data_path, SATELLITES_YAML).expect("write data");

    let satellites = read_satellites(&[data_path]).expect("read satellites");
    let simulation = BreakupBuilder::new(0.05)
        .simulation_kind(SimulationKind::Unknown)
        .satellites(satellites)
        .build()
        .expect("derived collision");
    assert!(simulation.is_catastrophic().is_some());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn id_filter_reduces_the_parent_set() {
    let dir = temp_dir("filter");
    let data_path = dir.join("satellites.yaml");
    std::fs::write(&data_path, SATELLITES_YAML).expect("write data");

    let satellites = read_satellites(&[data_path]).expect("read satellites");
    let filter: HashSet<u64> = [24946].into_iter().collect();
    let simulation = BreakupBuilder::new(0.05)
        .simulation_kind(SimulationKind::Explosion)
        .id_filter(Some(filter))
        .satellites(satellites)
        .build()
        .expect("explosion after filtering");
    // The max id still derives from the unfiltered input list.
    assert_eq!(simulation.current_max_id(), 24946);
    assert_eq!(simulation.input().len(), 1);
    assert_eq!(simulation.input()[0].id(), 24946);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unsupported_output_extension_is_a_configuration_error() {
    let config = BreakupConfig::from_yaml(
        "simulation:\n  minimalCharacteristicLength: 0.05\nresultOutput:\n  target: [\"out.json\"]\n",
    )
    .expect("parse config");
    let section = config.result_output.as_ref().expect("section");
    assert!(matches!(
        build_output_targets(section),
        Err(BreakupError::Config { .. })
    ));
}
