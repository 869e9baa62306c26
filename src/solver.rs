use log::{debug, info};
use ndarray::Array2;

use crate::disc::{boundary, dissipation, flux, residual, timestep};
use crate::error::SolverResult;
use crate::io::params::RunParams;
use crate::io::table::CoarseTable;
use crate::mesh::TunnelGrid;
use crate::physics::{
    FarField, GasProperties, FOURTH_ORDER_NORMALIZER, SECOND_ORDER_NORMALIZER,
};
use crate::state::{FlowField, StateVector};

/// Runge-Kutta stage weights of the three predictor stages; the final
/// stage applies the full timestep. The truncated third weight is part
/// of the calibrated scheme.
const STAGE_WEIGHTS: [f64; 3] = [0.25, 0.33333, 0.5];

/// Explicit time-marching driver. Owns the mesh, the flow field, and
/// all per-step work buffers; one instance runs one case.
pub struct TunnelSolver {
    params: RunParams,
    gas: GasProperties,
    far: FarField,
    grid: TunnelGrid,
    /// Committed state, advanced once per [`step`](Self::step)
    field: FlowField,
    /// Predictor state rebuilt by the first three Runge-Kutta stages
    stage: FlowField,
    opg: Array2<f64>,
    deltat: Array2<f64>,
    sxi: Array2<f64>,
    seta: Array2<f64>,
    d: Array2<StateVector>,
    f: Array2<StateVector>,
    g: Array2<StateVector>,
    r: Array2<StateVector>,
    rms_error: f64,
    iteration: usize,
}

impl TunnelSolver {
    pub fn new(table: &CoarseTable, params: RunParams) -> SolverResult<Self> {
        params.validate()?;
        let gas = GasProperties::AIR;
        let far = FarField::new(&gas, params.mach_number);
        let (grid, field) = TunnelGrid::build(table, params.scale, &gas)?;
        let (imax, jmax) = (grid.imax, grid.jmax);
        info!(
            "initialized {imax} x {jmax} node grid (scale {}, mach {})",
            params.scale, params.mach_number
        );

        let dims = (imax + 2, jmax + 2);
        Ok(TunnelSolver {
            params,
            gas,
            far,
            grid,
            field,
            stage: FlowField::new(imax, jmax),
            opg: Array2::zeros(dims),
            deltat: Array2::zeros(dims),
            sxi: Array2::zeros(dims),
            seta: Array2::zeros(dims),
            d: Array2::from_elem(dims, StateVector::ZERO),
            f: Array2::from_elem(dims, StateVector::ZERO),
            g: Array2::from_elem(dims, StateVector::ZERO),
            r: Array2::from_elem(dims, StateVector::ZERO),
            rms_error: 0.0,
            iteration: 0,
        })
    }

    /// RMS pressure change of the last completed step.
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn grid(&self) -> &TunnelGrid {
        &self.grid
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// Advance the committed state by one timestep with the four-stage
    /// scheme. The timestep field and the dissipation are computed once
    /// from the pre-step state and held frozen across the stages; every
    /// stage restarts from the committed state.
    pub fn step(&mut self) -> SolverResult<f64> {
        let (imax, jmax) = (self.grid.imax, self.grid.jmax);

        for i in 1..imax {
            for j in 1..jmax {
                self.opg[[i, j]] = self.field.pg[[i, j]];
            }
        }

        boundary::apply(&self.grid, &self.gas, &self.far, &mut self.field)?;
        timestep::compute(
            &self.grid,
            &self.field,
            &self.gas,
            self.params.time_accurate,
            &mut self.deltat,
        );

        let nu2 = self.params.second_order_damping * SECOND_ORDER_NORMALIZER;
        let nu4 = self.params.fourth_order_damping * FOURTH_ORDER_NORMALIZER;
        dissipation::compute(
            &self.grid,
            &self.deltat,
            &self.field,
            nu2,
            nu4,
            &mut self.sxi,
            &mut self.seta,
            &mut self.d,
        );

        // First stage works from the committed state; the halo was just
        // refreshed above
        flux::compute_f(&self.field, &self.gas, &mut self.f);
        flux::compute_g(&self.field, &self.gas, &mut self.g);
        residual::assemble(&self.grid, &self.f, &self.g, &mut self.r);
        self.accumulate_stage(STAGE_WEIGHTS[0]);
        self.stage.derive_state_vars(&self.gas);

        for &weight in &STAGE_WEIGHTS[1..] {
            boundary::apply(&self.grid, &self.gas, &self.far, &mut self.stage)?;
            flux::compute_f(&self.stage, &self.gas, &mut self.f);
            flux::compute_g(&self.stage, &self.gas, &mut self.g);
            residual::assemble(&self.grid, &self.f, &self.g, &mut self.r);
            self.accumulate_stage(weight);
            self.stage.derive_state_vars(&self.gas);
        }

        // Final stage commits
        boundary::apply(&self.grid, &self.gas, &self.far, &mut self.stage)?;
        flux::compute_f(&self.stage, &self.gas, &mut self.f);
        flux::compute_g(&self.stage, &self.gas, &mut self.g);
        residual::assemble(&self.grid, &self.f, &self.g, &mut self.r);
        for i in 1..imax {
            for j in 1..jmax {
                let update = (self.r[[i, j]] - self.d[[i, j]])
                    * (self.deltat[[i, j]] / self.grid.area[[i, j]]);
                self.field.ug[[i, j]] = self.field.ug[[i, j]] - update;
            }
        }
        self.field.derive_state_vars(&self.gas);

        let mut error = 0.0;
        for i in 1..imax {
            for j in 1..jmax {
                let scrap = self.field.pg[[i, j]] - self.opg[[i, j]];
                error += scrap * scrap;
            }
        }
        self.rms_error = (error / ((imax - 1) * (jmax - 1)) as f64).sqrt();
        self.iteration += 1;
        Ok(self.rms_error)
    }

    /// Run the configured number of iterations and return the RMS
    /// pressure change of the last one.
    pub fn run(&mut self) -> SolverResult<f64> {
        for _ in 0..self.params.iterations {
            let error = self.step()?;
            debug!("iteration {}: rms pressure change {error:e}", self.iteration);
        }
        info!(
            "completed {} iterations, rms pressure change {:e}",
            self.iteration, self.rms_error
        );
        Ok(self.rms_error)
    }

    fn accumulate_stage(&mut self, weight: f64) {
        for i in 1..self.grid.imax {
            for j in 1..self.grid.jmax {
                let update = (self.r[[i, j]] - self.d[[i, j]])
                    * (weight * self.deltat[[i, j]] / self.grid.area[[i, j]]);
                self.stage.ug[[i, j]] = self.field.ug[[i, j]] - update;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::mesh::freestream_channel_table;

    fn channel_params() -> RunParams {
        RunParams::with_scale(8).unwrap()
    }

    #[test]
    fn free_stream_is_a_steady_state() {
        let table = freestream_channel_table(4, 3, 0.7);
        let mut solver = TunnelSolver::new(&table, channel_params()).unwrap();
        let ff = solver.far.state(&solver.gas);
        for _ in 0..5 {
            let error = solver.step().unwrap();
            assert!(error < 1e-12, "rms pressure change {error}");
        }
        for i in 1..solver.grid.imax {
            for j in 1..solver.grid.jmax {
                let ug = solver.field.ug[[i, j]];
                assert!((ug.a - ff.a).abs() < 1e-10);
                assert!((ug.b - ff.b).abs() < 1e-10);
                assert!((ug.c - ff.c).abs() < 1e-10);
                assert!((ug.d - ff.d).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn steps_are_deterministic() {
        let table = CoarseTable::builtin().unwrap();
        let mut first = TunnelSolver::new(&table, channel_params()).unwrap();
        let mut second = TunnelSolver::new(&table, channel_params()).unwrap();
        for _ in 0..3 {
            let a = first.step().unwrap();
            let b = second.step().unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(first.field.ug[[7, 5]], second.field.ug[[7, 5]]);
        assert_eq!(first.field.pg[[11, 3]], second.field.pg[[11, 3]]);
    }

    #[test]
    fn reversed_inflow_aborts_the_step() {
        let table = freestream_channel_table(4, 3, -0.7);
        let mut solver = TunnelSolver::new(&table, channel_params()).unwrap();
        let err = solver.step().unwrap_err();
        assert!(matches!(
            err,
            SolverError::InvalidBoundaryRegime {
                boundary: "inlet",
                ..
            }
        ));
    }

    #[test]
    fn converged_rms_pressure_error_at_scale_8() {
        let table = CoarseTable::builtin().unwrap();
        let mut solver = TunnelSolver::new(&table, channel_params()).unwrap();
        let error = solver.run().unwrap();
        assert_eq!(solver.iteration(), 100);
        assert!(
            (error - 0.0033831416599344965).abs() <= 1.0e-12,
            "rms pressure error {error:.17}"
        );
    }

    #[test]
    fn converged_rms_pressure_error_at_scale_12() {
        let table = CoarseTable::builtin().unwrap();
        let params = RunParams::with_scale(12).unwrap();
        let mut solver = TunnelSolver::new(&table, params).unwrap();
        let error = solver.run().unwrap();
        assert!(
            (error - 0.006812543658280322).abs() <= 1.0e-12,
            "rms pressure error {error:.17}"
        );
    }
}
