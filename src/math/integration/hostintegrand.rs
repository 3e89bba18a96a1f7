use nalgebra::DVector;
use tracing::trace;

use super::integrand::Integrand;
use super::integrationerror::{
    HostCallError,
    IntegrationError
};

/// Numeric vector in the representation a host runtime exchanges with us.
pub type HostVector = DVector<f64>;

// ─────────────────────────────────────────────────────────────────────────────
// HostFunction
// ─────────────────────────────────────────────────────────────────────────────

/// A callable living on the other side of a language boundary.
///
/// It receives a vector of abscissae plus an opaque argument payload and
/// must answer with a vector of the same length. Errors raised inside the
/// host come back as [`HostCallError`].
///
/// Bridges that are not reentrant must not be driven from several threads
/// at once; `HostIntegrand` is only `Sync` when both the function and the
/// payload are.
pub trait HostFunction<A: ?Sized> {
    fn call(&self, x: &HostVector, args: &A) -> Result<HostVector, HostCallError>;
}

impl<A, F> HostFunction<A> for F where
    A: ?Sized,
    F: Fn(&HostVector, &A) -> Result<HostVector, HostCallError> {
    fn call(&self, x: &HostVector, args: &A) -> Result<HostVector, HostCallError> {
        self(x, args)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HostIntegrand
// ─────────────────────────────────────────────────────────────────────────────

/// Adapts a [`HostFunction`] and its payload to [`Integrand`].
///
/// Every evaluation crosses the boundary, so the batch path is the one the
/// integrator uses: one crossing per quadrature-rule application.
pub struct HostIntegrand<'a, H: ?Sized, A: ?Sized> {
    function: &'a H,
    args: &'a A
}

impl<'a, H, A> HostIntegrand<'a, H, A> where
    H: HostFunction<A> + ?Sized,
    A: ?Sized {
    pub fn new(function: &'a H, args: &'a A) -> HostIntegrand<'a, H, A> {
        HostIntegrand { function, args }
    }

    pub fn args(&self) -> &A {
        self.args
    }
}

impl<H, A> Integrand for HostIntegrand<'_, H, A> where
    H: HostFunction<A> + ?Sized,
    A: ?Sized {
    fn evaluate(&self, x: f64) -> Result<f64, IntegrationError> {
        let xv = HostVector::from_element(1, x);
        let res = self.function.call(&xv, self.args)?;
        if res.len() != 1 {
            return Err(IntegrationError::ArityMismatch { expected: 1, actual: res.len() });
        }
        Ok(res[0])
    }

    fn evaluate_batch(&self, xs: &mut [f64]) -> Result<(), IntegrationError> {
        trace!(points = xs.len(), "host integrand batch call");
        let xv = HostVector::from_column_slice(xs);
        let res = self.function.call(&xv, self.args)?;
        if res.len() != xs.len() {
            return Err(IntegrationError::ArityMismatch { expected: xs.len(), actual: res.len() });
        }
        xs.copy_from_slice(res.as_slice());
        Ok(())
    }
}
