use galsim::{Scenario, ScenarioConfig, SnapshotPublisher};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::thread;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "galaxy.yaml")]
    file_name: String,
}

// load here to keep main clean
fn load_scenario_from_yaml() -> Result<ScenarioConfig> {
    let args = Args::parse();
    let file_name = args.file_name;

    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(&file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();

    let scenario_cfg = load_scenario_from_yaml()?;
    // configuration errors are fatal before any simulation output
    scenario_cfg.validate()?;

    let scenario = Scenario::build_scenario(scenario_cfg)?;
    let reference_distance = scenario.parameters.reference_distance;

    // channels standing in for the external renderer transport
    let (frame_tx, frame_rx) = crossbeam_channel::unbounded();
    let (control_tx, control_rx) = crossbeam_channel::unbounded();
    let publisher = SnapshotPublisher::new(frame_tx, control_rx, reference_distance);

    let coordinator = thread::spawn(move || scenario.run(publisher));

    // drain frames the way an attached renderer would
    let mut frames: u64 = 0;
    while let Ok(frame) = frame_rx.recv() {
        frames += 1;
        log::trace!("frame {frames}: t = {}, {} bodies", frame.t, frame.bodies.len());
    }

    let ticks = coordinator
        .join()
        .expect("coordinator thread panicked")?;
    log::info!("run finished: {ticks} ticks, {frames} frames");
    drop(control_tx);

    //galsim::bench_forces();
    //galsim::bench_tick();

    Ok(())
}
