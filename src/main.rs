use granuflow::{Scenario, ScenarioConfig};
use granuflow::run_3d;
use granuflow::{bench_passes, bench_step_curve};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "settling.yaml")]
    file_name: String,

    /// Run to t_end without the viewer
    #[arg(long)]
    headless: bool,

    /// Run the timing benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_passes();
        bench_step_curve();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    if args.headless {
        scenario.run_headless()?;
        println!(
            "headless run finished at t = {} with {} granules",
            scenario.ensemble.t,
            scenario.ensemble.granules.len()
        );
    } else {
        run_3d(scenario);
    }

    Ok(())
}
