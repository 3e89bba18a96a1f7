use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Display;

use serde::Serialize;
use tracing::{
    debug,
    trace
};

use super::integrand::Integrand;
use super::integrationerror::IntegrationError;
use super::quadraturerule::{
    GaussKronrodRule,
    QuadratureRule
};

// ─────────────────────────────────────────────────────────────────────────────
// IntegrationStatus
// ─────────────────────────────────────────────────────────────────────────────

/// Diagnostic outcome of an adaptive integration.
///
/// The numeric codes follow the QUADPACK `ier` convention so callers that
/// already branch on those integers keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegrationStatus {
    /// The requested accuracy was reached.
    Converged = 0,
    /// The subdivision budget ran out before the accuracy was reached.
    MaxSubdivisionsReached = 1,
    /// Round-off prevents the requested accuracy; the estimate is the best
    /// obtainable.
    RoundoffDetected = 2,
    /// A subinterval became too small to bisect, typically near a
    /// non-integrable singularity.
    BadIntegrandBehavior = 3,
    /// Bounds, tolerances or the subdivision budget are unusable.
    InvalidInput = 6
}

impl IntegrationStatus {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn is_converged(&self) -> bool {
        *self == IntegrationStatus::Converged
    }

    pub fn from_code(code: i32) -> Option<IntegrationStatus> {
        match code {
            0 => Some(IntegrationStatus::Converged),
            1 => Some(IntegrationStatus::MaxSubdivisionsReached),
            2 => Some(IntegrationStatus::RoundoffDetected),
            3 => Some(IntegrationStatus::BadIntegrandBehavior),
            6 => Some(IntegrationStatus::InvalidInput),
            _ => None
        }
    }
}

impl Display for IntegrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationStatus::Converged => write!(f, "converged"),
            IntegrationStatus::MaxSubdivisionsReached => write!(f, "maximum number of subdivisions reached"),
            IntegrationStatus::RoundoffDetected => write!(f, "roundoff error detected"),
            IntegrationStatus::BadIntegrandBehavior => write!(f, "extremely bad integrand behavior"),
            IntegrationStatus::InvalidInput => write!(f, "invalid input")
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subinterval
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Subinterval {
    lower: f64,
    upper: f64,
    result: f64,
    error: f64
}

impl Subinterval {
    fn priority(&self) -> f64 {
        if self.error.is_nan() { f64::NEG_INFINITY } else { self.error }
    }
}

impl PartialEq for Subinterval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Subinterval {}

impl PartialOrd for Subinterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Subinterval {
    fn cmp(&self, other: &Self) -> Ordering {
        // largest error on top; NaN errors rank below -inf
        self.priority().total_cmp(&other.priority())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Integrator
// ─────────────────────────────────────────────────────────────────────────────

const INITIAL_HEAP_CAPACITY: usize = 1024;

/// Globally adaptive Gauss-Kronrod integrator (QUADPACK QAG strategy).
///
/// The subinterval with the largest error estimate is bisected until the
/// total error meets `max(abs_tol, rel_tol * |I|)` or `max_subdivisions`
/// subintervals exist. After [`Integrator::quadrature_adaptive`] returns, the
/// error estimate and status of that run are available from the accessors.
pub struct Integrator {
    max_subdivisions: usize,
    estimated_error: f64,
    status: IntegrationStatus,
    evaluations: usize,
    subintervals: usize
}

impl Integrator {
    pub fn new(max_subdivisions: usize) -> Integrator {
        Integrator {
            max_subdivisions,
            estimated_error: 0.0,
            status: IntegrationStatus::Converged,
            evaluations: 0,
            subintervals: 0
        }
    }

    pub fn max_subdivisions(&self) -> usize {
        self.max_subdivisions
    }

    pub fn estimated_error(&self) -> f64 {
        self.estimated_error
    }

    pub fn status(&self) -> IntegrationStatus {
        self.status
    }

    pub fn error_code(&self) -> i32 {
        self.status.code()
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn subintervals(&self) -> usize {
        self.subintervals
    }

    /// Integrates `f` over [lower, upper] with `lower <= upper`.
    ///
    /// Only integrand failures are returned as `Err`; every numerical
    /// outcome is reported through [`Integrator::status`].
    pub fn quadrature_adaptive<I>(&mut self,
                                  f: &I,
                                  lower: f64,
                                  upper: f64,
                                  abs_tol: f64,
                                  rel_tol: f64,
                                  rule: QuadratureRule) -> Result<f64, IntegrationError> where
        I: Integrand + ?Sized {
        self.estimated_error = 0.0;
        self.status = IntegrationStatus::Converged;
        self.evaluations = 0;
        self.subintervals = 0;

        if !self.is_valid_input(lower, upper, abs_tol, rel_tol) {
            self.status = IntegrationStatus::InvalidInput;
            debug!(lower, upper, abs_tol, rel_tol, max_subdivisions = self.max_subdivisions, "rejected integration input");
            return Ok(0.0);
        }
        if lower == upper {
            return Ok(0.0);
        }

        let gk = GaussKronrodRule::new(rule);
        let points = gk.kronrod_points();

        let first = gk.apply(f, lower, upper)?;
        self.evaluations = points;
        self.subintervals = 1;

        if !first.result.is_finite() || !first.abserr.is_finite() {
            self.status = IntegrationStatus::BadIntegrandBehavior;
            self.estimated_error = Self::reported_error(first.abserr);
            debug!(lower, upper, result = first.result, abserr = first.abserr, "non-finite rule estimate");
            return Ok(first.result);
        }

        let mut errbnd = abs_tol.max(rel_tol * first.result.abs());
        if first.abserr <= 50.0 * f64::EPSILON * first.resabs && first.abserr > errbnd {
            self.status = IntegrationStatus::RoundoffDetected;
        }
        let converged = (first.abserr <= errbnd && first.abserr != first.resasc) || first.abserr == 0.0;
        if self.max_subdivisions == 1 && !converged {
            self.status = IntegrationStatus::MaxSubdivisionsReached;
        }
        if self.status != IntegrationStatus::Converged || converged {
            self.estimated_error = first.abserr;
            return Ok(first.result);
        }

        let mut heap = BinaryHeap::with_capacity(self.max_subdivisions.min(INITIAL_HEAP_CAPACITY));
        heap.push(Subinterval { lower, upper, result: first.result, error: first.abserr });
        let mut area = first.result;
        let mut errsum = first.abserr;
        let mut iroff1 = 0;
        let mut iroff2 = 0;

        for last in 2..=self.max_subdivisions {
            let Some(worst) = heap.pop() else {
                break;
            };

            let a1 = worst.lower;
            let b1 = 0.5 * (worst.lower + worst.upper);
            let a2 = b1;
            let b2 = worst.upper;

            let left = gk.apply(f, a1, b1)?;
            let right = gk.apply(f, a2, b2)?;
            self.evaluations += 2 * points;

            let area12 = left.result + right.result;
            let erro12 = left.abserr + right.abserr;
            errsum += erro12 - worst.error;
            area += area12 - worst.result;

            if left.resasc != left.abserr && right.resasc != right.abserr {
                if (worst.result - area12).abs() <= 1e-5 * area12.abs() && erro12 >= 0.99 * worst.error {
                    iroff1 += 1;
                }
                if last > 10 && erro12 > worst.error {
                    iroff2 += 1;
                }
            }

            errbnd = abs_tol.max(rel_tol * area.abs());
            if !area.is_finite() || !errsum.is_finite() {
                self.status = IntegrationStatus::BadIntegrandBehavior;
                debug!(a1, b2, area, errsum, "non-finite rule estimate");
            } else if errsum > errbnd {
                if iroff1 >= 6 || iroff2 >= 20 {
                    self.status = IntegrationStatus::RoundoffDetected;
                }
                if last == self.max_subdivisions {
                    self.status = IntegrationStatus::MaxSubdivisionsReached;
                }
                if a1.abs().max(b2.abs()) <= (1.0 + 100.0 * f64::EPSILON) * (a2.abs() + 1000.0 * f64::MIN_POSITIVE) {
                    self.status = IntegrationStatus::BadIntegrandBehavior;
                }
            }

            heap.push(Subinterval { lower: a1, upper: b1, result: left.result, error: left.abserr });
            heap.push(Subinterval { lower: a2, upper: b2, result: right.result, error: right.abserr });
            trace!(subintervals = last, area, errsum, errbnd, "bisected [{}, {}]", a1, b2);

            if self.status != IntegrationStatus::Converged || errsum <= errbnd {
                break;
            }
        }

        self.subintervals = heap.len();
        self.estimated_error = Self::reported_error(errsum);
        let result = heap.iter().map(|interval| interval.result).sum();
        Ok(result)
    }

    fn reported_error(error: f64) -> f64 {
        if error.is_nan() { f64::INFINITY } else { error }
    }

    fn is_valid_input(&self, lower: f64, upper: f64, abs_tol: f64, rel_tol: f64) -> bool {
        let tolerances_usable = abs_tol >= 0.0
            && rel_tol >= 0.0
            && (abs_tol > 0.0 || rel_tol >= (50.0 * f64::EPSILON).max(0.5e-28));
        self.max_subdivisions > 0
            && lower.is_finite()
            && upper.is_finite()
            && lower <= upper
            && tolerances_usable
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::math::integration::integrand::NativeIntegrand;

    fn run<F: Fn(f64) -> f64>(f: F,
                              lower: f64,
                              upper: f64,
                              abs_tol: f64,
                              rel_tol: f64,
                              max_subdivisions: usize) -> (f64, Integrator) {
        let mut integrator = Integrator::new(max_subdivisions);
        let value = integrator
            .quadrature_adaptive(&NativeIntegrand::new(f), lower, upper, abs_tol, rel_tol, QuadratureRule::GaussKronrod21)
            .unwrap();
        (value, integrator)
    }

    #[test]
    fn smooth_integrand_converges_on_first_pass() {
        let (value, integrator) = run(|x| x.sin(), 0.0, PI, 1e-10, 1e-10, 100);
        assert!((value - 2.0).abs() < 1e-12);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
        assert_eq!(integrator.subintervals(), 1);
        assert_eq!(integrator.evaluations(), 21);
    }

    #[test]
    fn peaked_integrand_is_subdivided() {
        let f = |x: f64| 1.0 / (1e-4 + (x - 0.5) * (x - 0.5));
        let exact = 2.0 * (0.5 / 1e-2_f64).atan() / 1e-2;
        let (value, integrator) = run(f, 0.0, 1.0, 1e-12, 1e-12, 100);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
        assert!(integrator.subintervals() > 1);
        assert!((value - exact).abs() < 1e-8);
        assert!(integrator.estimated_error() < 1e-8);
        assert_eq!(integrator.evaluations(), 21 * (2 * integrator.subintervals() - 1));
    }

    #[test]
    fn endpoint_singularity_still_converges() {
        let (value, integrator) = run(|x| 1.0 / x.sqrt(), 0.0, 1.0, 1e-8, 1e-6, 100);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
        assert!((value - 2.0).abs() < 1e-5);
    }

    #[test]
    fn single_subdivision_budget_reports_non_convergence() {
        let f = |x: f64| 1.0 / (1e-4 + (x - 0.5) * (x - 0.5));
        let (value, integrator) = run(f, 0.0, 1.0, 1e-12, 1e-12, 1);
        assert_eq!(integrator.status(), IntegrationStatus::MaxSubdivisionsReached);
        assert_eq!(integrator.error_code(), 1);
        assert!(value.is_finite());
        assert!(integrator.estimated_error() > 1e-12);
    }

    #[test]
    fn single_subdivision_budget_is_enough_for_polynomials() {
        let (value, integrator) = run(|x| x * x, 0.0, 3.0, 1e-10, 1e-10, 1);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
        assert!((value - 9.0).abs() < 1e-12);
    }

    #[test]
    fn divergent_integrand_does_not_converge() {
        let (value, integrator) = run(|x| 1.0 / x, 0.0, 1.0, 1e-8, 1e-6, 100);
        assert_ne!(integrator.status(), IntegrationStatus::Converged);
        assert!(value.is_finite());
    }

    #[test]
    fn zero_width_interval_is_exactly_zero() {
        let (value, integrator) = run(|x| x.exp(), 1.0, 1.0, 1e-8, 1e-6, 100);
        assert_eq!(value, 0.0);
        assert_eq!(integrator.estimated_error(), 0.0);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
    }

    #[test]
    fn zero_width_interval_skips_the_integrand() {
        let (value, integrator) = run(|x| x.cosh(), 1e6, 1e6, 1e-8, 1e-6, 100);
        assert_eq!(value, 0.0);
        assert_eq!(integrator.estimated_error(), 0.0);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
        assert_eq!(integrator.evaluations(), 0);
    }

    #[test]
    fn nan_estimate_is_bad_integrand_behavior() {
        let (value, integrator) = run(|x| (x - 0.5).sqrt(), 0.0, 1.0, 1e-8, 1e-6, 100);
        assert!(value.is_nan());
        assert_eq!(integrator.status(), IntegrationStatus::BadIntegrandBehavior);
        assert_eq!(integrator.error_code(), 3);
        assert!(integrator.estimated_error() >= 0.0);
        assert_eq!(integrator.subintervals(), 1);
    }

    #[test]
    fn non_finite_estimate_after_bisection_stops_refinement() {
        // 0.25 is the center of the left half, never a node of the first pass
        let f = |x: f64| if x == 0.25 { f64::NAN } else { 1.0 / (1e-4 + (x - 0.5) * (x - 0.5)) };
        let (value, integrator) = run(f, 0.0, 1.0, 1e-12, 1e-12, 100);
        assert!(value.is_nan());
        assert_eq!(integrator.subintervals(), 2);
        assert_eq!(integrator.evaluations(), 3 * 21);
        assert_eq!(integrator.status(), IntegrationStatus::BadIntegrandBehavior);
        assert!(integrator.estimated_error() >= 0.0);
    }

    #[test]
    fn nan_errors_rank_below_every_finite_error() {
        let nan = Subinterval { lower: 0.0, upper: 1.0, result: 0.0, error: f64::NAN };
        let small = Subinterval { lower: 0.0, upper: 1.0, result: 0.0, error: 1e-300 };
        let mut heap = BinaryHeap::from([nan, small]);
        assert_eq!(heap.pop().map(|interval| interval.error), Some(1e-300));
        assert!(heap.pop().is_some_and(|interval| interval.error.is_nan()));
    }

    #[test]
    fn huge_budget_is_not_reserved_up_front() {
        let f = |x: f64| 1.0 / (1e-4 + (x - 0.5) * (x - 0.5));
        let exact = 2.0 * (0.5 / 1e-2_f64).atan() / 1e-2;
        let (value, integrator) = run(f, 0.0, 1.0, 1e-12, 1e-12, usize::MAX);
        assert_eq!(integrator.status(), IntegrationStatus::Converged);
        assert!(integrator.subintervals() > 1);
        assert!((value - exact).abs() < 1e-8);
    }

    #[test]
    fn unusable_input_is_a_status_not_an_error() {
        let cases = [
            (f64::NAN, 1.0, 1e-8, 1e-6, 100),
            (0.0, f64::INFINITY, 1e-8, 1e-6, 100),
            (1.0, 0.0, 1e-8, 1e-6, 100),
            (0.0, 1.0, -1e-8, 1e-6, 100),
            (0.0, 1.0, 0.0, 0.0, 100),
            (0.0, 1.0, 1e-8, 1e-6, 0)
        ];
        for (lower, upper, abs_tol, rel_tol, limit) in cases {
            let (value, integrator) = run(|x| x, lower, upper, abs_tol, rel_tol, limit);
            assert_eq!(value, 0.0);
            assert_eq!(integrator.status(), IntegrationStatus::InvalidInput);
            assert_eq!(integrator.error_code(), 6);
            assert_eq!(integrator.evaluations(), 0);
        }
    }

    #[test]
    fn integrand_failure_aborts_the_run() {
        struct FailsAfterFirstBatch {
            calls: std::cell::Cell<usize>
        }

        impl Integrand for FailsAfterFirstBatch {
            fn evaluate(&self, x: f64) -> Result<f64, IntegrationError> {
                Ok(x)
            }

            fn evaluate_batch(&self, xs: &mut [f64]) -> Result<(), IntegrationError> {
                self.calls.set(self.calls.get() + 1);
                if self.calls.get() > 1 {
                    return Err(IntegrationError::ArityMismatch { expected: xs.len(), actual: 0 });
                }
                xs.iter_mut().for_each(|x| *x = (50.0 * *x).sin());
                Ok(())
            }
        }

        let f = FailsAfterFirstBatch { calls: std::cell::Cell::new(0) };
        let mut integrator = Integrator::new(100);
        let outcome = integrator.quadrature_adaptive(&f, 0.0, 10.0, 1e-12, 1e-12, QuadratureRule::GaussKronrod15);
        assert_eq!(outcome, Err(IntegrationError::ArityMismatch { expected: 15, actual: 0 }));
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            IntegrationStatus::Converged,
            IntegrationStatus::MaxSubdivisionsReached,
            IntegrationStatus::RoundoffDetected,
            IntegrationStatus::BadIntegrandBehavior,
            IntegrationStatus::InvalidInput
        ] {
            assert_eq!(IntegrationStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(IntegrationStatus::from_code(4), None);
        assert_eq!(IntegrationStatus::MaxSubdivisionsReached.to_string(), "maximum number of subdivisions reached");
    }
}
