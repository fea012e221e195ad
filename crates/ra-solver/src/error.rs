use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solution length {got} does not match flow count {expected}")]
    SolutionLengthMismatch { expected: usize, got: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;
