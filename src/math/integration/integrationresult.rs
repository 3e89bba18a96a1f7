use serde::Serialize;

use super::integrator::IntegrationStatus;

/// Estimate of a definite integral and its diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegrationResult {
    value: f64,
    error_estimate: f64,
    status: IntegrationStatus,
    evaluations: usize,
    subintervals: usize
}

impl IntegrationResult {
    pub fn new(value: f64,
               error_estimate: f64,
               status: IntegrationStatus,
               evaluations: usize,
               subintervals: usize) -> IntegrationResult {
        IntegrationResult { value, error_estimate, status, evaluations, subintervals }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Upper bound on |exact integral - value| as estimated by the engine.
    pub fn error_estimate(&self) -> f64 {
        self.error_estimate
    }

    pub fn status(&self) -> IntegrationStatus {
        self.status
    }

    pub fn status_code(&self) -> i32 {
        self.status.code()
    }

    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Number of integrand points evaluated.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn subintervals(&self) -> usize {
        self.subintervals
    }
}
