use std::process::ExitCode;

use gravsim::{CollisionPolicy, FrameScheduler, Scenario, Simulation};

const USAGE: &str = "usage: gravsim [--timer] [--loose] [--empty]

  --timer   pace frames with a fixed 60 Hz timer instead of vsync
  --loose   use the loose collision test
  --empty   start without the solar system

Set RUST_LOG=debug for per-second FPS and input logging.";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sim = Simulation::new();
    for arg in std::env::args().skip(1) {
        sim = match arg.as_str() {
            "--timer" => sim.with_scheduler(FrameScheduler::fixed_60hz()),
            "--loose" => sim.with_collision_policy(CollisionPolicy::Loose),
            "--empty" => sim.with_scenario(Scenario::Empty),
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unknown argument: {other}\n\n{USAGE}");
                return ExitCode::FAILURE;
            }
        };
    }

    match sim.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
