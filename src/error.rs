use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

/// Fatal conditions of the kernel. There is no recoverable path: a
/// configuration error aborts before the first iteration, a boundary
/// regime violation aborts mid-run because the flow has left the
/// physically modeled regime.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error(
        "{detail} at the {boundary} boundary, halo column j = {j} \
         (normal velocity = {normal_velocity:.6e}, sound speed = {sound_speed:.6e})"
    )]
    InvalidBoundaryRegime {
        boundary: &'static str,
        j: usize,
        detail: &'static str,
        normal_velocity: f64,
        sound_speed: f64,
    },
}

impl SolverError {
    pub fn config(message: impl Into<String>) -> Self {
        SolverError::Config {
            message: message.into(),
        }
    }
}
