//! Two-dimensional structured-grid finite-volume solver for the
//! compressible Euler equations over a wind-tunnel domain.
//!
//! The kernel refines an embedded coarse sample grid, then marches the
//! conserved state with a 4-stage explicit Runge-Kutta scheme stabilized
//! by blended second/fourth-order artificial dissipation. Boundary halo
//! cells carry solid-wall tangency conditions on the top and bottom and
//! Riemann-invariant inflow/outflow conditions on the left and right.
//! The externally observable output is the RMS pressure change of the
//! last completed step.

pub mod disc;
pub mod error;
pub mod io;
pub mod mesh;
pub mod physics;
pub mod solver;
pub mod state;

pub use error::{SolverError, SolverResult};
pub use io::params::RunParams;
pub use io::table::CoarseTable;
pub use solver::TunnelSolver;
