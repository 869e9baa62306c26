use crate::error::{SolverError, SolverResult};
use crate::mesh::TunnelGrid;
use crate::physics::{FarField, GasProperties};
use crate::state::{FlowField, StateVector};

/// Characteristic regime of the flow crossing an open boundary face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryRegime {
    SupersonicInflow,
    SubsonicInflow,
    SupersonicOutflow,
    SubsonicOutflow,
}

/// Classify a face from the velocity component along the outward-facing
/// x direction and the local sound speed. The boundaries between
/// regimes (`uprime` of exactly `0`, `c` or `-c` for outflow) return
/// `None`; callers treat that, like a regime the boundary cannot
/// accept, as a fatal condition.
pub fn classify(uprime: f64, c: f64) -> Option<BoundaryRegime> {
    if uprime < -c {
        Some(BoundaryRegime::SupersonicInflow)
    } else if uprime < 0.0 {
        Some(BoundaryRegime::SubsonicInflow)
    } else if uprime > c {
        Some(BoundaryRegime::SupersonicOutflow)
    } else if uprime > 0.0 && uprime < c {
        Some(BoundaryRegime::SubsonicOutflow)
    } else {
        None
    }
}

#[derive(Clone, Copy)]
struct Vec2 {
    ihat: f64,
    jhat: f64,
}

impl Vec2 {
    fn magnitude(self) -> f64 {
        (self.ihat * self.ihat + self.jhat * self.jhat).sqrt()
    }

    fn dot(self, other: Vec2) -> f64 {
        self.ihat * other.ihat + self.jhat * other.jhat
    }

    fn normalized(self) -> Vec2 {
        let m = self.magnitude();
        Vec2 {
            ihat: self.ihat / m,
            jhat: self.jhat / m,
        }
    }
}

/// Fill the halo cells from the interior state: solid-wall tangency
/// along the bottom and top, Riemann-invariant characteristic
/// conditions at the inlet and outlet, and plain copies into the four
/// corners so the flux pass never divides by an empty density.
///
/// Inflow at the outlet or outflow at the inlet cannot be absorbed by
/// the characteristic treatment and aborts the run.
pub fn apply(
    grid: &TunnelGrid,
    gas: &GasProperties,
    far: &FarField,
    field: &mut FlowField,
) -> SolverResult<()> {
    let (imax, jmax) = (grid.imax, grid.jmax);
    let (x, y) = (&grid.xnode, &grid.ynode);
    let gm1 = gas.gamma - 1.0;

    for i in 1..imax {
        // Bottom wall: mirror the velocity of the first interior cell
        // about the wall tangent
        let tan = Vec2 {
            ihat: x[[i, 0]] - x[[i - 1, 0]],
            jhat: y[[i, 0]] - y[[i - 1, 0]],
        }
        .normalized();
        let norm = Vec2 {
            ihat: -(y[[i, 0]] - y[[i - 1, 0]]),
            jhat: x[[i, 0]] - x[[i - 1, 0]],
        }
        .normalized();

        let rho = field.ug[[i, 1]].a;
        field.tg[[i, 0]] = field.tg[[i, 1]];
        let u1 = Vec2 {
            ihat: field.ug[[i, 1]].b / rho,
            jhat: field.ug[[i, 1]].c / rho,
        };
        let mut u = u1.dot(tan) + u1.dot(norm) * tan.jhat / norm.jhat;
        u = u / (tan.ihat - (norm.ihat * tan.jhat / norm.jhat));
        let v = -(u1.dot(norm) + u * norm.ihat) / norm.jhat;

        field.ug[[i, 0]] = StateVector {
            a: rho,
            b: rho * u,
            c: rho * v,
            d: rho * (gas.cv * field.tg[[i, 0]] + 0.5 * (u * u + v * v)),
        };
        field.pg[[i, 0]] = field.pg[[i, 1]];

        // Top wall, same construction with the normal flipped inward
        let tan = Vec2 {
            ihat: x[[i, jmax - 1]] - x[[i - 1, jmax - 1]],
            jhat: y[[i, jmax - 1]] - y[[i - 1, jmax - 1]],
        }
        .normalized();
        let norm = Vec2 {
            ihat: y[[i, jmax - 1]] - y[[i - 1, jmax - 1]],
            jhat: -(x[[i, jmax - 1]] - x[[i - 1, jmax - 1]]),
        }
        .normalized();

        let rho = field.ug[[i, jmax - 1]].a;
        let temp = field.tg[[i, jmax - 1]];
        let u1 = Vec2 {
            ihat: field.ug[[i, jmax - 1]].b / rho,
            jhat: field.ug[[i, jmax - 1]].c / rho,
        };
        let mut u = u1.dot(tan) + u1.dot(norm) * tan.jhat / norm.jhat;
        u = u / (tan.ihat - (norm.ihat * tan.jhat / norm.jhat));
        let v = -(u1.dot(norm) + u * norm.ihat) / norm.jhat;

        field.ug[[i, jmax]] = StateVector {
            a: rho,
            b: rho * u,
            c: rho * v,
            d: rho * (gas.cv * temp + 0.5 * (u * u + v * v)),
        };
        field.tg[[i, jmax]] = temp;
        field.pg[[i, jmax]] = field.pg[[i, jmax - 1]];
    }

    for j in 1..jmax {
        // Inlet
        let dx = x[[0, j]] - x[[0, j - 1]];
        let dy = y[[0, j - 1]] - y[[0, j]];
        let theta = (dy / (dx * dx + dy * dy).sqrt()).acos();

        let u1_ihat = field.ug[[1, j]].b / field.ug[[1, j]].a;
        let uprime = u1_ihat * theta.cos();
        let c = gas.sound_speed(field.tg[[1, j]]);

        match classify(uprime, c) {
            Some(BoundaryRegime::SupersonicInflow) => {
                field.ug[[0, j]] = far.state(gas);
                field.tg[[0, j]] = far.t;
                field.pg[[0, j]] = far.p;
            }
            Some(BoundaryRegime::SubsonicInflow) => {
                let jminus = u1_ihat - 2.0 / gm1 * c;
                let s = far.p.ln() - gas.gamma * far.rho.ln();
                let v = far.v;

                let u = (far.jplus + jminus) / 2.0;
                let scrap = (far.jplus - u) * gm1 * 0.5;
                let t = (1.0 / (gas.gamma * gas.rgas)) * scrap * scrap;
                let p = (s.exp() / (gas.rgas * t).powf(gas.gamma)).powf(1.0 / (1.0 - gas.gamma));
                field.tg[[0, j]] = t;
                field.pg[[0, j]] = p;

                let rho = p / (gas.rgas * t);
                // the energy deliberately carries the far-field
                // temperature, as calibrated
                field.ug[[0, j]] = StateVector {
                    a: rho,
                    b: rho * u,
                    c: rho * v,
                    d: rho * (gas.cv * far.t + 0.5 * (u * u + v * v)),
                };
            }
            other => {
                return Err(SolverError::InvalidBoundaryRegime {
                    boundary: "inlet",
                    j,
                    detail: if other.is_some() {
                        "outflow"
                    } else {
                        "stagnant or sonic normal velocity"
                    },
                    normal_velocity: uprime,
                    sound_speed: c,
                });
            }
        }

        // Outlet; the face angle comes from the inlet node column, as
        // calibrated
        let dx = x[[0, j - 1]] - x[[0, j]];
        let dy = y[[0, j]] - y[[0, j - 1]];
        let theta = (dy / (dx * dx + dy * dy).sqrt()).acos();

        let u1_ihat = field.ug[[imax - 1, j]].b / field.ug[[imax - 1, j]].a;
        let uprime = u1_ihat * theta.cos();
        let c = gas.sound_speed(field.tg[[imax - 1, j]]);

        match classify(uprime, c) {
            Some(BoundaryRegime::SupersonicOutflow) => {
                // second-order backward extrapolation
                field.ug[[imax, j]] =
                    field.ug[[imax - 1, j]] * 2.0 - field.ug[[imax - 2, j]];
                field.pg[[imax, j]] =
                    2.0 * field.pg[[imax - 1, j]] - field.pg[[imax - 2, j]];
                field.tg[[imax, j]] =
                    2.0 * field.tg[[imax - 1, j]] - field.tg[[imax - 2, j]];
            }
            Some(BoundaryRegime::SubsonicOutflow) => {
                let jplus = u1_ihat + 2.0 / gm1 * c;
                let v = field.ug[[imax - 1, j]].c / field.ug[[imax - 1, j]].a;
                let s = field.pg[[imax - 1, j]].ln()
                    - gas.gamma * field.ug[[imax - 1, j]].a.ln();

                let u = (jplus + far.jminus) / 2.0;
                let scrap = (jplus - u) * gm1 * 0.5;
                let t = (1.0 / (gas.gamma * gas.rgas)) * scrap * scrap;
                let p = (s.exp() / (gas.rgas * t).powf(gas.gamma)).powf(1.0 / (1.0 - gas.gamma));
                field.tg[[imax, j]] = t;
                field.pg[[imax, j]] = p;

                let rho = p / (gas.rgas * t);
                field.ug[[imax, j]] = StateVector {
                    a: rho,
                    b: rho * u,
                    c: rho * v,
                    d: rho * (gas.cv * t + 0.5 * (u * u + v * v)),
                };
            }
            other => {
                return Err(SolverError::InvalidBoundaryRegime {
                    boundary: "outlet",
                    j,
                    detail: if other.is_some() {
                        "inflow"
                    } else {
                        "stagnant or sonic normal velocity"
                    },
                    normal_velocity: uprime,
                    sound_speed: c,
                });
            }
        }
    }

    // Corner cells only need a nonzero state for the flux pass
    field.ug[[0, 0]] = field.ug[[1, 0]];
    field.ug[[imax, 0]] = field.ug[[imax, 1]];
    field.ug[[0, jmax]] = field.ug[[1, jmax]];
    field.ug[[imax, jmax]] = field.ug[[imax, jmax - 1]];

    Ok(())
}
