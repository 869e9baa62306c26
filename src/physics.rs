use crate::state::StateVector;

/// Damping coefficient normalizers of the blended dissipation model.
pub const SECOND_ORDER_NORMALIZER: f64 = 0.02;
pub const FOURTH_ORDER_NORMALIZER: f64 = 0.02;

/// Properties of a calorically perfect working fluid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasProperties {
    /// Specific heat at constant pressure
    pub cp: f64,
    /// Specific heat at constant volume
    pub cv: f64,
    /// Ratio of specific heats
    pub gamma: f64,
    /// Gas constant
    pub rgas: f64,
}

impl GasProperties {
    pub const AIR: GasProperties = GasProperties {
        cp: 1004.5,
        cv: 717.5,
        gamma: 1.4,
        rgas: 287.0,
    };

    /// Local sound speed at temperature `t`.
    pub fn sound_speed(&self, t: f64) -> f64 {
        (self.gamma * self.rgas * t).sqrt()
    }
}

impl Default for GasProperties {
    fn default() -> Self {
        GasProperties::AIR
    }
}

/// Free-stream reference state in normalized units (unit density and
/// sound speed), with the Riemann invariants carried by the incoming
/// and outgoing characteristics along the tunnel axis.
#[derive(Clone, Copy, Debug)]
pub struct FarField {
    pub mach: f64,
    pub c: f64,
    pub u: f64,
    pub v: f64,
    pub p: f64,
    pub rho: f64,
    pub t: f64,
    pub jplus: f64,
    pub jminus: f64,
}

impl FarField {
    pub fn new(gas: &GasProperties, mach: f64) -> Self {
        let c = 1.0;
        let v = 0.0;
        let p = 1.0 / gas.gamma;
        let rho = 1.0;
        let t = p / (rho * gas.rgas);
        let u = mach * c;
        FarField {
            mach,
            c,
            u,
            v,
            p,
            rho,
            t,
            jplus: u + 2.0 / (gas.gamma - 1.0) * c,
            jminus: u - 2.0 / (gas.gamma - 1.0) * c,
        }
    }

    /// Conserved state of the free stream.
    pub fn state(&self, gas: &GasProperties) -> StateVector {
        StateVector {
            a: self.rho,
            b: self.rho * self.u,
            c: self.rho * self.v,
            d: self.rho * (gas.cv * self.t + 0.5 * (self.u * self.u + self.v * self.v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn farfield_satisfies_equation_of_state() {
        let gas = GasProperties::AIR;
        let ff = FarField::new(&gas, 0.7);
        assert_relative_eq!(ff.p, ff.rho * gas.rgas * ff.t, epsilon = 1e-15);
        // normalized units: unit sound speed
        assert_relative_eq!(gas.sound_speed(ff.t), 1.0, epsilon = 1e-15);
        assert_eq!(ff.u, 0.7);
    }

    #[test]
    fn farfield_invariants_bracket_velocity() {
        let gas = GasProperties::AIR;
        let ff = FarField::new(&gas, 0.7);
        assert_relative_eq!(ff.jplus, 5.7, epsilon = 1e-12);
        assert_relative_eq!(ff.jminus, -4.3, epsilon = 1e-12);
    }
}
