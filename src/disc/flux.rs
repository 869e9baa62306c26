use ndarray::Array2;

use crate::physics::GasProperties;
use crate::state::{FlowField, StateVector};

/// Inviscid x-direction flux for every cell including the halo, from the
/// (state, pressure, temperature) trio. Pure function of the field;
/// recomputed every Runge-Kutta stage.
pub fn compute_f(field: &FlowField, gas: &GasProperties, f: &mut Array2<StateVector>) {
    for i in 0..=field.imax {
        for j in 0..=field.jmax {
            let ug = field.ug[[i, j]];
            let u = ug.b / ug.a;
            let temp1 = ug.b * ug.b;
            let temp2 = ug.c * ug.c;
            let temp3 = ug.a * ug.a;
            f[[i, j]] = StateVector {
                a: ug.b,
                b: ug.b * u + field.pg[[i, j]],
                c: ug.c * u,
                d: ug.b * (gas.cp * field.tg[[i, j]] + (0.5 * (temp1 + temp2) / temp3)),
            };
        }
    }
}

/// Inviscid y-direction flux, same contract as [`compute_f`].
pub fn compute_g(field: &FlowField, gas: &GasProperties, g: &mut Array2<StateVector>) {
    for i in 0..=field.imax {
        for j in 0..=field.jmax {
            let ug = field.ug[[i, j]];
            let v = ug.c / ug.a;
            let temp1 = ug.b * ug.b;
            let temp2 = ug.c * ug.c;
            let temp3 = ug.a * ug.a;
            g[[i, j]] = StateVector {
                a: ug.c,
                b: ug.b * v,
                c: ug.c * v + field.pg[[i, j]],
                d: ug.c * (gas.cp * field.tg[[i, j]] + (0.5 * (temp1 + temp2) / temp3)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_field(rho: f64, u: f64, v: f64, t: f64) -> FlowField {
        let gas = GasProperties::AIR;
        let mut field = FlowField::new(2, 2);
        for i in 0..=2 {
            for j in 0..=2 {
                field.ug[[i, j]] = StateVector::new(
                    rho,
                    rho * u,
                    rho * v,
                    rho * (gas.cv * t + 0.5 * (u * u + v * v)),
                );
                field.tg[[i, j]] = t;
                field.pg[[i, j]] = rho * gas.rgas * t;
            }
        }
        field
    }

    #[test]
    fn flux_components_of_a_known_state() {
        let gas = GasProperties::AIR;
        let (rho, u, v, t) = (1.1, 0.6, -0.2, 0.0018);
        let field = uniform_field(rho, u, v, t);
        let mut f = Array2::from_elem((4, 4), StateVector::ZERO);
        let mut g = Array2::from_elem((4, 4), StateVector::ZERO);
        compute_f(&field, &gas, &mut f);
        compute_g(&field, &gas, &mut g);

        let p = rho * gas.rgas * t;
        let h = gas.cp * t + 0.5 * (u * u + v * v);
        let fv = f[[1, 1]];
        assert_relative_eq!(fv.a, rho * u, epsilon = 1e-14);
        assert_relative_eq!(fv.b, rho * u * u + p, epsilon = 1e-13);
        assert_relative_eq!(fv.c, rho * u * v, epsilon = 1e-13);
        assert_relative_eq!(fv.d, rho * u * h, epsilon = 1e-13);
        let gv = g[[1, 1]];
        assert_relative_eq!(gv.a, rho * v, epsilon = 1e-14);
        assert_relative_eq!(gv.b, rho * u * v, epsilon = 1e-13);
        assert_relative_eq!(gv.c, rho * v * v + p, epsilon = 1e-13);
        assert_relative_eq!(gv.d, rho * v * h, epsilon = 1e-13);
    }
}
