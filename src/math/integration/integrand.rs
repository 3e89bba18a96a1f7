use super::integrationerror::IntegrationError;

// ─────────────────────────────────────────────────────────────────────────────
// Integrand
// ─────────────────────────────────────────────────────────────────────────────

/// A real function of one real variable as seen by the integrator.
///
/// The integrator may evaluate points in any order and in batches of any
/// size, repeatedly across subdivisions, so implementations must not depend
/// on call order.
pub trait Integrand {
    fn evaluate(&self, x: f64) -> Result<f64, IntegrationError>;

    /// Replaces every abscissa in `xs` with the function value at that point.
    ///
    /// The default applies [`Integrand::evaluate`] element by element;
    /// override it when one call over the whole batch is cheaper.
    fn evaluate_batch(&self, xs: &mut [f64]) -> Result<(), IntegrationError> {
        for x in xs.iter_mut() {
            *x = self.evaluate(*x)?;
        }
        Ok(())
    }
}

impl<T> Integrand for &T where
    T: Integrand + ?Sized {
    fn evaluate(&self, x: f64) -> Result<f64, IntegrationError> {
        (**self).evaluate(x)
    }

    fn evaluate_batch(&self, xs: &mut [f64]) -> Result<(), IntegrationError> {
        (**self).evaluate_batch(xs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NativeIntegrand
// ─────────────────────────────────────────────────────────────────────────────

/// Adapter for a plain Rust closure or function pointer.
#[derive(Clone, Copy)]
pub struct NativeIntegrand<F> {
    function: F
}

impl<F> NativeIntegrand<F> where
    F: Fn(f64) -> f64 {
    pub fn new(function: F) -> NativeIntegrand<F> {
        NativeIntegrand { function }
    }

    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F> Integrand for NativeIntegrand<F> where
    F: Fn(f64) -> f64 {
    fn evaluate(&self, x: f64) -> Result<f64, IntegrationError> {
        Ok((self.function)(x))
    }

    fn evaluate_batch(&self, xs: &mut [f64]) -> Result<(), IntegrationError> {
        xs.iter_mut().for_each(|x| *x = (self.function)(*x));
        Ok(())
    }
}
