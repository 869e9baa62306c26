use std::env;
use std::process::ExitCode;

use log::{error, LevelFilter};

use tunnel_euler2d::{CoarseTable, RunParams, SolverResult, TunnelSolver};

fn run() -> SolverResult<f64> {
    let params = match env::args().nth(1) {
        Some(path) => RunParams::from_file(path)?,
        None => RunParams::default(),
    };
    let table = CoarseTable::builtin()?;
    let mut solver = TunnelSolver::new(&table, params)?;
    solver.run()
}

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .ok();

    match run() {
        Ok(rms) => {
            println!("rms pressure change: {rms:.17}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
