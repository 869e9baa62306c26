use ndarray::Array2;

use crate::mesh::TunnelGrid;
use crate::physics::GasProperties;
use crate::state::FlowField;

const SAFETY_FACTOR: f64 = 0.7;
const METRIC_FACTOR: f64 = 2.8284;

/// Per-cell CFL timestep from the local metric terms and sound speed.
/// With `time_accurate` the field collapses to its global minimum so
/// every cell advances the same physical time.
pub fn compute(
    grid: &TunnelGrid,
    field: &FlowField,
    gas: &GasProperties,
    time_accurate: bool,
    deltat: &mut Array2<f64>,
) {
    let (imax, jmax) = (grid.imax, grid.jmax);
    let (x, y) = (&grid.xnode, &grid.ynode);
    for i in 1..imax {
        for j in 1..jmax {
            let xxi =
                (x[[i, j]] - x[[i - 1, j]] + x[[i, j - 1]] - x[[i - 1, j - 1]]) * 0.5;
            let yxi =
                (y[[i, j]] - y[[i - 1, j]] + y[[i, j - 1]] - y[[i - 1, j - 1]]) * 0.5;
            let xeta =
                (x[[i, j]] - x[[i, j - 1]] + x[[i - 1, j]] - x[[i - 1, j - 1]]) * 0.5;
            let yeta =
                (y[[i, j]] - y[[i, j - 1]] + y[[i - 1, j]] - y[[i - 1, j - 1]]) * 0.5;

            let ug = field.ug[[i, j]];
            let q = yeta * ug.b - xeta * ug.c;
            let r = -yxi * ug.b + xxi * ug.c;
            let c = gas.sound_speed(field.tg[[i, j]]);

            deltat[[i, j]] = SAFETY_FACTOR * METRIC_FACTOR * grid.area[[i, j]]
                / ((q.abs() + r.abs()) / ug.a
                    + c * (xxi * xxi
                        + yxi * yxi
                        + xeta * xeta
                        + yeta * yeta
                        + 2.0 * (xeta * xxi + yeta * yxi).abs())
                        .sqrt());
        }
    }

    if time_accurate {
        let mut mint = 100000.0;
        for i in 1..imax {
            for j in 1..jmax {
                if deltat[[i, j]] < mint {
                    mint = deltat[[i, j]];
                }
            }
        }
        for i in 1..imax {
            for j in 1..jmax {
                deltat[[i, j]] = mint;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{TunnelGrid, freestream_channel_table};

    fn channel() -> (TunnelGrid, FlowField) {
        let gas = GasProperties::AIR;
        let table = freestream_channel_table(5, 4, 0.7);
        TunnelGrid::build(&table, 2, &gas).unwrap()
    }

    #[test]
    fn uniform_channel_has_a_uniform_timestep() {
        let (grid, field) = channel();
        let mut deltat = Array2::zeros((grid.imax + 2, grid.jmax + 2));
        compute(&grid, &field, &GasProperties::AIR, false, &mut deltat);
        let reference = deltat[[1, 1]];
        assert!(reference > 0.0 && reference.is_finite());
        for i in 1..grid.imax {
            for j in 1..grid.jmax {
                assert!((deltat[[i, j]] - reference).abs() < 1e-15 * reference);
            }
        }
    }

    #[test]
    fn time_accurate_mode_collapses_to_the_minimum() {
        let (grid, mut field) = channel();
        // a hot cell lowers the local timestep through the sound speed
        field.tg[[2, 2]] *= 4.0;
        let gas = GasProperties::AIR;
        let mut local = Array2::zeros((grid.imax + 2, grid.jmax + 2));
        compute(&grid, &field, &gas, false, &mut local);
        let mut global = Array2::zeros((grid.imax + 2, grid.jmax + 2));
        compute(&grid, &field, &gas, true, &mut global);

        let mut mint = f64::MAX;
        for i in 1..grid.imax {
            for j in 1..grid.jmax {
                mint = mint.min(local[[i, j]]);
            }
        }
        for i in 1..grid.imax {
            for j in 1..grid.jmax {
                assert_eq!(global[[i, j]], mint);
            }
        }
        assert!(global[[1, 1]] < local[[1, 1]]);
    }
}
