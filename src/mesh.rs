use ndarray::{Array2, Array3};

use crate::error::{SolverError, SolverResult};
use crate::io::table::{CoarseTable, NFIELDS};
use crate::physics::GasProperties;
use crate::state::{FlowField, StateVector};

/// Node coordinates and cell areas of the refined computational mesh.
/// Immutable after construction.
pub struct TunnelGrid {
    /// Number of nodes in the x direction
    pub imax: usize,
    /// Number of nodes in the y direction
    pub jmax: usize,
    pub xnode: Array2<f64>,
    pub ynode: Array2<f64>,
    /// Cell areas; cell `(i, j)` spans nodes `(i-1..i, j-1..j)`, so the
    /// valid range is `1..imax` x `1..jmax`.
    pub area: Array2<f64>,
}

impl TunnelGrid {
    /// Refine the coarse sample table by `scale` through bilinear
    /// interpolation and build the mesh together with the initial flow
    /// field. The raw interpolated samples are discarded afterwards.
    pub fn build(
        table: &CoarseTable,
        scale: usize,
        gas: &GasProperties,
    ) -> SolverResult<(TunnelGrid, FlowField)> {
        if scale == 0 {
            return Err(SolverError::config("refinement scale must be at least 1"));
        }
        let imaxin = table.imaxin;
        let jmaxin = table.jmaxin;

        // Copy the samples into a zero-padded array so edge nodes can
        // interpolate with zero-weight phantom neighbors.
        let mut oldval = Array3::zeros((NFIELDS, imaxin + 1, jmaxin + 1));
        for k in 0..NFIELDS {
            for i in 0..imaxin {
                for j in 0..jmaxin {
                    oldval[[k, i, j]] = table.values[[k, i, j]];
                }
            }
        }

        // Interpolate onto the finer grid
        let imax = (imaxin - 1) * scale + 1;
        let jmax = (jmaxin - 1) * scale + 1;
        let mut newval = Array3::zeros((NFIELDS, imax, jmax));
        for k in 0..NFIELDS {
            for i in 0..imax {
                for j in 0..jmax {
                    let iold = i / scale;
                    let jold = j / scale;
                    let xf = (i % scale) as f64 / scale as f64;
                    let yf = (j % scale) as f64 / scale as f64;
                    newval[[k, i, j]] = (1.0 - xf) * (1.0 - yf) * oldval[[k, iold, jold]]
                        + (1.0 - xf) * yf * oldval[[k, iold, jold + 1]]
                        + xf * (1.0 - yf) * oldval[[k, iold + 1, jold]]
                        + xf * yf * oldval[[k, iold + 1, jold + 1]];
                }
            }
        }

        let mut xnode = Array2::zeros((imax, jmax));
        let mut ynode = Array2::zeros((imax, jmax));
        let mut field = FlowField::new(imax, jmax);
        for i in 0..imax {
            for j in 0..jmax {
                xnode[[i, j]] = newval[[0, i, j]];
                ynode[[i, j]] = newval[[1, i, j]];
                let ug = StateVector::new(
                    newval[[2, i, j]],
                    newval[[3, i, j]],
                    newval[[4, i, j]],
                    newval[[5, i, j]],
                );
                field.ug[[i + 1, j + 1]] = ug;

                let scrap = ug.c / ug.a;
                let scrap2 = ug.b / ug.a;
                let mut t = ug.d / ug.a - (0.5 * (scrap * scrap + scrap2 * scrap2));
                t = t / gas.cv;
                field.tg[[i + 1, j + 1]] = t;
                field.pg[[i + 1, j + 1]] = gas.rgas * ug.a * t;
            }
        }

        // Cell areas from the quadrilateral cross-product formula
        let mut area = Array2::zeros((imax, jmax));
        for i in 1..imax {
            for j in 1..jmax {
                area[[i, j]] = 0.5
                    * ((xnode[[i, j]] - xnode[[i - 1, j - 1]])
                        * (ynode[[i - 1, j]] - ynode[[i, j - 1]])
                        - (ynode[[i, j]] - ynode[[i - 1, j - 1]])
                            * (xnode[[i - 1, j]] - xnode[[i, j - 1]]));
            }
        }

        let grid = TunnelGrid {
            imax,
            jmax,
            xnode,
            ynode,
            area,
        };
        Ok((grid, field))
    }
}

/// Synthetic straight rectangular channel filled with the free stream,
/// for regression checks that need exactly uniform flow and axis-aligned
/// walls. Spacings are powers of two so node geometry stays exact.
#[cfg(test)]
pub(crate) fn freestream_channel_table(imaxin: usize, jmaxin: usize, mach: f64) -> CoarseTable {
    use crate::physics::FarField;

    let gas = GasProperties::AIR;
    let ff = FarField::new(&gas, mach);
    let energy = ff.rho * (gas.cv * ff.t + 0.5 * (ff.u * ff.u + ff.v * ff.v));
    let mut values = Array3::zeros((NFIELDS, imaxin, jmaxin));
    for i in 0..imaxin {
        for j in 0..jmaxin {
            values[[0, i, j]] = i as f64 * 0.5;
            values[[1, i, j]] = j as f64 * 0.25;
            values[[2, i, j]] = ff.rho;
            values[[3, i, j]] = ff.rho * ff.u;
            values[[4, i, j]] = ff.rho * ff.v;
            values[[5, i, j]] = energy;
        }
    }
    CoarseTable {
        imaxin,
        jmaxin,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refinement_dimensions() {
        let gas = GasProperties::AIR;
        let table = freestream_channel_table(5, 3, 0.7);
        let (grid, _) = TunnelGrid::build(&table, 4, &gas).unwrap();
        assert_eq!(grid.imax, 17);
        assert_eq!(grid.jmax, 9);
    }

    #[test]
    fn interpolation_preserves_sample_nodes() {
        let gas = GasProperties::AIR;
        let table = CoarseTable::builtin().unwrap();
        let scale = 4;
        let (grid, field) = TunnelGrid::build(&table, scale, &gas).unwrap();
        for i in 0..table.imaxin {
            for j in 0..table.jmaxin {
                assert_eq!(grid.xnode[[i * scale, j * scale]], table.values[[0, i, j]]);
                assert_eq!(grid.ynode[[i * scale, j * scale]], table.values[[1, i, j]]);
                assert_eq!(
                    field.ug[[i * scale + 1, j * scale + 1]].a,
                    table.values[[2, i, j]]
                );
            }
        }
    }

    #[test]
    fn cell_areas_of_a_uniform_channel() {
        let gas = GasProperties::AIR;
        let table = freestream_channel_table(4, 3, 0.7);
        let (grid, _) = TunnelGrid::build(&table, 2, &gas).unwrap();
        // coarse spacing 0.5 x 0.25, refined by 2 -> 0.25 x 0.125
        for i in 1..grid.imax {
            for j in 1..grid.jmax {
                assert!((grid.area[[i, j]] - 0.25 * 0.125).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn initial_scalars_match_equation_of_state() {
        let gas = GasProperties::AIR;
        let table = CoarseTable::builtin().unwrap();
        let (grid, field) = TunnelGrid::build(&table, 2, &gas).unwrap();
        for i in 1..=grid.imax {
            for j in 1..=grid.jmax {
                let ug = field.ug[[i, j]];
                let p = field.pg[[i, j]];
                let t = field.tg[[i, j]];
                assert!(ug.a > 0.0);
                assert!(t > 0.0);
                assert!((p - gas.rgas * ug.a * t).abs() < 1e-12 * p.abs());
            }
        }
    }

    #[test]
    fn zero_scale_is_rejected() {
        let gas = GasProperties::AIR;
        let table = freestream_channel_table(4, 3, 0.7);
        assert!(TunnelGrid::build(&table, 0, &gas).is_err());
    }
}
