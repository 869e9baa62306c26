use ndarray::Array2;

use crate::mesh::TunnelGrid;
use crate::state::{FlowField, StateVector};

/// Blended second/fourth-order artificial dissipation with pressure
/// switches, accumulated over the four faces of every interior cell.
///
/// `nu2` and `nu4` are the damping multipliers already scaled by their
/// normalizers. The result is written into `d`; `sxi` and `seta` are
/// the per-cell pressure switch buffers, overwritten on every call.
///
/// The fourth-order face terms feed the density difference of the wide
/// stencil into all four equations. The sweep also shares one scratch
/// vector between consecutive cells: unless an interior face rebuilt
/// it, the next cell's east-face write lands in the same storage and
/// retargets every cell still holding it, so the first interior column
/// ends up with `d[i, 1] = d[i, 2]` at both ends of the channel. Both
/// behaviors are load-bearing: the converged reference values depend on
/// them.
pub fn compute(
    grid: &TunnelGrid,
    deltat: &Array2<f64>,
    field: &FlowField,
    nu2: f64,
    nu4: f64,
    sxi: &mut Array2<f64>,
    seta: &mut Array2<f64>,
    d: &mut Array2<StateVector>,
) {
    let (imax, jmax) = (grid.imax, grid.jmax);
    let area = &grid.area;
    let ug = &field.ug;
    let pg = &field.pg;

    // Pressure switches
    for i in 1..imax {
        for j in 1..jmax {
            sxi[[i, j]] =
                (pg[[i + 1, j]] - 2.0 * pg[[i, j]] + pg[[i - 1, j]]).abs() / pg[[i, j]];
            seta[[i, j]] =
                (pg[[i, j + 1]] - 2.0 * pg[[i, j]] + pg[[i, j - 1]]).abs() / pg[[i, j]];
        }
    }

    // Cells whose stored value still aliases the scratch vector.
    let mut shared: Vec<(usize, usize)> = Vec::new();
    for i in 1..imax {
        for j in 1..jmax {
            let scratch_rebuilt_i = i > 1 && i < imax - 1;
            let scratch_rebuilt_j = j > 1 && j < jmax - 1;
            if scratch_rebuilt_i {
                shared.clear();
            }

            // East face
            let (adt, sbar) = if i > 1 && i < imax - 1 {
                (
                    (area[[i, j]] + area[[i + 1, j]]) / (deltat[[i, j]] + deltat[[i + 1, j]]),
                    (sxi[[i + 1, j]] + sxi[[i, j]]) * 0.5,
                )
            } else {
                (area[[i, j]] / deltat[[i, j]], sxi[[i, j]])
            };
            let scrap2 = (ug[[i + 1, j]] - ug[[i, j]]) * (nu2 * sbar * adt);
            let scrap4 = if i > 1 && i < imax - 1 {
                let diff = ug[[i + 2, j]] - ug[[i - 1, j]];
                let near = (ug[[i, j]] - ug[[i + 1, j]]) * 3.0;
                fourth_order_term(-nu4 * adt, diff, near)
            } else {
                StateVector::ZERO
            };
            let mut cell = scrap2 + scrap4;

            // West face
            let (adt, sbar) = if i > 1 && i < imax - 1 {
                (
                    (area[[i, j]] + area[[i - 1, j]]) / (deltat[[i, j]] + deltat[[i - 1, j]]),
                    (sxi[[i, j]] + sxi[[i - 1, j]]) * 0.5,
                )
            } else {
                (area[[i, j]] / deltat[[i, j]], sxi[[i, j]])
            };
            let scrap2 = (ug[[i, j]] - ug[[i - 1, j]]) * (-nu2 * sbar * adt);
            let scrap4 = if i > 1 && i < imax - 1 {
                let diff = ug[[i + 1, j]] - ug[[i - 2, j]];
                let near = (ug[[i - 1, j]] - ug[[i, j]]) * 3.0;
                fourth_order_term(nu4 * adt, diff, near)
            } else {
                StateVector::ZERO
            };
            cell = cell + (scrap2 + scrap4);

            // North face
            let (adt, sbar) = if j > 1 && j < jmax - 1 {
                (
                    (area[[i, j]] + area[[i, j + 1]]) / (deltat[[i, j]] + deltat[[i, j + 1]]),
                    (seta[[i, j]] + seta[[i, j + 1]]) * 0.5,
                )
            } else {
                (area[[i, j]] / deltat[[i, j]], seta[[i, j]])
            };
            let scrap2 = (ug[[i, j + 1]] - ug[[i, j]]) * (nu2 * sbar * adt);
            let scrap4 = if j > 1 && j < jmax - 1 {
                let diff = ug[[i, j + 2]] - ug[[i, j - 1]];
                let near = (ug[[i, j]] - ug[[i, j + 1]]) * 3.0;
                fourth_order_term(-nu4 * adt, diff, near)
            } else {
                StateVector::ZERO
            };
            cell = cell + (scrap2 + scrap4);

            // South face
            let (adt, sbar) = if j > 1 && j < jmax - 1 {
                (
                    (area[[i, j]] + area[[i, j - 1]]) / (deltat[[i, j]] + deltat[[i, j - 1]]),
                    (seta[[i, j]] + seta[[i, j - 1]]) * 0.5,
                )
            } else {
                (area[[i, j]] / deltat[[i, j]], seta[[i, j]])
            };
            let scrap2 = (ug[[i, j]] - ug[[i, j - 1]]) * (-nu2 * sbar * adt);
            let scrap4 = if j > 1 && j < jmax - 1 {
                let diff = ug[[i, j + 1]] - ug[[i, j - 2]];
                let near = (ug[[i, j - 1]] - ug[[i, j]]) * 3.0;
                fourth_order_term(nu4 * adt, diff, near)
            } else {
                StateVector::ZERO
            };
            cell = cell + (scrap2 + scrap4);

            d[[i, j]] = cell;
            for &(pi, pj) in &shared {
                d[[pi, pj]] = cell;
            }
            if scratch_rebuilt_i || scratch_rebuilt_j {
                shared.clear();
            } else {
                shared.push((i, j));
            }
        }
    }
}

/// Fourth-order face contribution. The density component of the wide
/// difference enters every equation.
fn fourth_order_term(k4: f64, diff: StateVector, near: StateVector) -> StateVector {
    StateVector {
        a: k4 * (diff.a + near.a),
        b: k4 * (diff.a + near.b),
        c: k4 * (diff.a + near.c),
        d: k4 * (diff.a + near.d),
    }
}
