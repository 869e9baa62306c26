use ndarray::Array2;
use std::ops::{Add, Mul, Sub};

use crate::physics::GasProperties;

/// Conserved variables of one finite-volume cell: density, x-momentum
/// density, y-momentum density and total energy density.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateVector {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl StateVector {
    pub const ZERO: StateVector = StateVector {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        StateVector { a, b, c, d }
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector {
            a: self.a + rhs.a,
            b: self.b + rhs.b,
            c: self.c + rhs.c,
            d: self.d + rhs.d,
        }
    }
}

impl Sub for StateVector {
    type Output = StateVector;

    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector {
            a: self.a - rhs.a,
            b: self.b - rhs.b,
            c: self.c - rhs.c,
            d: self.d - rhs.d,
        }
    }
}

impl Mul<f64> for StateVector {
    type Output = StateVector;

    fn mul(self, m: f64) -> StateVector {
        StateVector {
            a: m * self.a,
            b: m * self.b,
            c: m * self.c,
            d: m * self.d,
        }
    }
}

/// Conserved state over the padded cell grid together with the pressure
/// and temperature fields derived from it. The three arrays are always
/// read and written as a trio: every downstream computation needs the
/// consistent triple, never the conserved state alone.
///
/// Arrays span `(imax + 2) x (jmax + 2)` cells: the interior occupies
/// indices `1..imax` in each direction, surrounded by a one-cell halo
/// written only by the boundary-condition sweep.
pub struct FlowField {
    pub imax: usize,
    pub jmax: usize,
    pub ug: Array2<StateVector>,
    pub pg: Array2<f64>,
    pub tg: Array2<f64>,
}

impl FlowField {
    pub fn new(imax: usize, jmax: usize) -> Self {
        FlowField {
            imax,
            jmax,
            ug: Array2::from_elem((imax + 2, jmax + 2), StateVector::ZERO),
            pg: Array2::zeros((imax + 2, jmax + 2)),
            tg: Array2::zeros((imax + 2, jmax + 2)),
        }
    }

    /// Recompute pressure and temperature for the interior cells from
    /// the conserved state, keeping the trio consistent after a state
    /// update.
    pub fn derive_state_vars(&mut self, gas: &GasProperties) {
        for i in 1..self.imax {
            for j in 1..self.jmax {
                let u = self.ug[[i, j]];
                let temp = u.b;
                let temp2 = u.c;
                let mut t = u.d / u.a - 0.5 * (temp * temp + temp2 * temp2) / (u.a * u.a);
                t = t / gas.cv;
                self.tg[[i, j]] = t;
                self.pg[[i, j]] = u.a * gas.rgas * t;
            }
        }
    }
}
