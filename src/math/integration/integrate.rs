use tracing::debug;

use super::hostintegrand::{
    HostFunction,
    HostIntegrand
};
use super::integrand::{
    Integrand,
    NativeIntegrand
};
use super::integrationerror::IntegrationError;
use super::integrationrequest::OrientedInterval;
use super::integrationresult::IntegrationResult;
use super::integrationsettings::IntegrationSettings;
use super::integrator::Integrator;

/// Integrates `f` from `lower` to `upper`.
///
/// Bounds may come in either order: reversed bounds are integrated over the
/// swapped interval and the value is negated, while the error estimate and
/// status are reported unchanged. A fresh [`Integrator`] is built for every
/// call, so calls share no state.
///
/// Non-convergence is reported through [`IntegrationResult::status`]; only a
/// failing integrand produces `Err`.
pub fn integrate_integrand<I>(f: &I,
                              lower: f64,
                              upper: f64,
                              settings: &IntegrationSettings) -> Result<IntegrationResult, IntegrationError> where
    I: Integrand + ?Sized {
    let interval = OrientedInterval::new(lower, upper);
    debug!(
        lower,
        upper,
        sign_flip = interval.sign_flip(),
        rule = ?settings.rule(),
        max_subdivisions = settings.max_subdivisions(),
        "integrating"
    );

    let mut integrator = Integrator::new(settings.max_subdivisions());
    let value = integrator.quadrature_adaptive(
        f,
        interval.lower(),
        interval.upper(),
        settings.absolute_tolerance(),
        settings.relative_tolerance(),
        settings.rule()
    )?;

    let result = IntegrationResult::new(
        interval.orient(value),
        integrator.estimated_error(),
        integrator.status(),
        integrator.evaluations(),
        integrator.subintervals()
    );
    if !result.is_converged() {
        debug!(
            lower,
            upper,
            status = %result.status(),
            error_estimate = result.error_estimate(),
            "integration did not converge"
        );
    }
    Ok(result)
}

/// Integrates a native Rust function.
pub fn integrate<F>(f: F,
                    lower: f64,
                    upper: f64,
                    settings: &IntegrationSettings) -> Result<IntegrationResult, IntegrationError> where
    F: Fn(f64) -> f64 {
    integrate_integrand(&NativeIntegrand::new(f), lower, upper, settings)
}

/// Integrates a host-side function, passing `args` along on every call.
pub fn integrate_host<H, A>(f: &H,
                            args: &A,
                            lower: f64,
                            upper: f64,
                            settings: &IntegrationSettings) -> Result<IntegrationResult, IntegrationError> where
    H: HostFunction<A> + ?Sized,
    A: ?Sized {
    integrate_integrand(&HostIntegrand::new(f, args), lower, upper, settings)
}
