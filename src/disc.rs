pub mod boundary;
pub mod dissipation;
pub mod flux;
pub mod residual;
pub mod timestep;
