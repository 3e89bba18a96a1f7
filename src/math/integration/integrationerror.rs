use thiserror::Error;

/// Failure raised by a host-side callable while evaluating an integrand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostCallError {
    message: String
}

impl HostCallError {
    pub fn new(message: impl Into<String>) -> HostCallError {
        HostCallError { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Hard failures of an integration call.
///
/// Numerical trouble (non-convergence, round-off) is never reported here;
/// it travels in [`IntegrationStatus`](super::integrator::IntegrationStatus).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrationError {
    #[error("integrand must return a vector of the same length of x (expected {expected}, got {actual})")]
    ArityMismatch {
        expected: usize,
        actual: usize
    },
    #[error("host integrand call failed: {0}")]
    HostCall(#[from] HostCallError)
}
