use std::f64::consts::FRAC_PI_2;

use serde::{
    Deserialize,
    Serialize
};

use super::integrand::Integrand;
use super::integrationerror::IntegrationError;

// ─────────────────────────────────────────────────────────────────────────────
// QuadratureRule
// ─────────────────────────────────────────────────────────────────────────────

/// Gauss-Kronrod pair used on every subinterval.
///
/// `GaussKronrodK` combines an n-point Gauss rule with its (2n+1)-point
/// Kronrod extension, K = 2n+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadratureRule {
    GaussKronrod15,
    GaussKronrod21,
    GaussKronrod31,
    GaussKronrod41,
    GaussKronrod51,
    GaussKronrod61,
    GaussKronrod71,
    GaussKronrod81,
    GaussKronrod91,
    GaussKronrod101,
    GaussKronrod121,
    GaussKronrod201
}

impl QuadratureRule {
    pub const ALL: [QuadratureRule; 12] = [
        QuadratureRule::GaussKronrod15,
        QuadratureRule::GaussKronrod21,
        QuadratureRule::GaussKronrod31,
        QuadratureRule::GaussKronrod41,
        QuadratureRule::GaussKronrod51,
        QuadratureRule::GaussKronrod61,
        QuadratureRule::GaussKronrod71,
        QuadratureRule::GaussKronrod81,
        QuadratureRule::GaussKronrod91,
        QuadratureRule::GaussKronrod101,
        QuadratureRule::GaussKronrod121,
        QuadratureRule::GaussKronrod201
    ];

    pub fn gauss_points(&self) -> usize {
        match self {
            QuadratureRule::GaussKronrod15 => 7,
            QuadratureRule::GaussKronrod21 => 10,
            QuadratureRule::GaussKronrod31 => 15,
            QuadratureRule::GaussKronrod41 => 20,
            QuadratureRule::GaussKronrod51 => 25,
            QuadratureRule::GaussKronrod61 => 30,
            QuadratureRule::GaussKronrod71 => 35,
            QuadratureRule::GaussKronrod81 => 40,
            QuadratureRule::GaussKronrod91 => 45,
            QuadratureRule::GaussKronrod101 => 50,
            QuadratureRule::GaussKronrod121 => 60,
            QuadratureRule::GaussKronrod201 => 100
        }
    }

    pub fn kronrod_points(&self) -> usize {
        2 * self.gauss_points() + 1
    }
}

impl Default for QuadratureRule {
    fn default() -> Self {
        QuadratureRule::GaussKronrod41
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node / weight generation
// ─────────────────────────────────────────────────────────────────────────────
//
// Piessens & Branders (1974): the Kronrod abscissae are the zeros of the
// Stieltjes polynomial E_{n+1}, expanded here in Chebyshev polynomials of the
// second kind (coefficients `b`). Gauss abscissae are the zeros of the
// Legendre polynomial P_n. Both are located by Newton iteration from
// interlaced initial guesses, walking from the right end toward the origin.

const NEWTON_TOLERANCE: f64 = 1e-15;
const MAX_NEWTON_ITERATIONS: usize = 50;

struct KronrodGenerator {
    n: usize,
    m: usize,
    even: bool,
    /// Chebyshev coefficients of the Stieltjes polynomial
    b: Vec<f64>,
    /// 2^(2n+1) (n!)^2 / (2n+1)!
    coef2: f64
}

impl KronrodGenerator {
    fn new(n: usize) -> KronrodGenerator {
        let m = (n + 1) / 2;
        let even = 2 * m == n;
        let an = n as f64;

        let mut b = vec![0.0; m + 1];
        let mut tau = vec![0.0; m];
        tau[0] = (an + 2.0) / (an + an + 3.0);
        b[m - 1] = tau[0] - 1.0;
        let mut ak = an;
        for l in 1..m {
            ak += 2.0;
            tau[l] = ((ak - 1.0) * ak - an * (an + 1.0)) * (ak + 2.0) * tau[l - 1]
                / (ak * ((ak + 3.0) * (ak + 2.0) - an * (an + 1.0)));
            b[m - l - 1] = tau[l];
            for ll in 1..=l {
                b[m - l - 1] += tau[ll - 1] * b[m - l + ll - 1];
            }
        }
        b[m] = 1.0;

        let mut coef2 = 2.0 / (2 * n + 1) as f64;
        for i in 1..=n {
            coef2 *= 4.0 * i as f64 / (n + i) as f64;
        }

        KronrodGenerator { n, m, even, b, coef2 }
    }

    /// Abscissae in decreasing order ending at the origin, Kronrod weights,
    /// and Gauss weights (zero on Kronrod-only abscissae).
    fn generate(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.n;
        let an = n as f64;
        let mut abscissae = vec![0.0; n + 1];
        let mut kronrod_weights = vec![0.0; n + 1];
        let mut gauss_weights = vec![0.0; n + 1];

        let mut bb = (FRAC_PI_2 / (an + an + 1.0)).sin();
        let mut x1 = (1.0 - bb * bb).sqrt();
        let s = 2.0 * bb * x1;
        let c = (1.0 - s * s).sqrt();
        let coef = 1.0 - (1.0 - 1.0 / an) / (8.0 * an * an);
        let mut xx = coef * x1;

        for k in (0..n).step_by(2) {
            let (x, w) = self.kronrod_abscissa(xx);
            abscissae[k] = x;
            kronrod_weights[k] = w;

            let y = x1;
            x1 = y * c - bb * s;
            bb = y * s + bb * c;
            xx = if k + 1 == n { 0.0 } else { coef * x1 };

            let (x, wk, wg) = self.gauss_abscissa(xx);
            abscissae[k + 1] = x;
            kronrod_weights[k + 1] = wk;
            gauss_weights[k + 1] = wg;

            let y = x1;
            x1 = y * c - bb * s;
            bb = y * s + bb * c;
            xx = coef * x1;
        }

        if self.even {
            let (x, w) = self.kronrod_abscissa(0.0);
            abscissae[n] = x;
            kronrod_weights[n] = w;
        }

        (abscissae, kronrod_weights, gauss_weights)
    }

    fn kronrod_abscissa(&self, mut x: f64) -> (f64, f64) {
        let m = self.m;
        let b = &self.b;
        let mut converged = x == 0.0;
        let mut fd = 1.0;

        for _ in 0..MAX_NEWTON_ITERATIONS {
            let yy = 4.0 * x * x - 2.0;
            let mut b0 = 0.0;
            let mut b1 = 0.0;
            let mut b2 = b[m];
            let mut d0: f64;
            let mut d1 = 0.0;
            let (mut ai, mut d2, dif) = if self.even {
                let ai = (m + m + 1) as f64;
                (ai, ai * b[m], 2.0)
            } else {
                ((m + 1) as f64, 0.0, 1.0)
            };

            for k in 1..=m {
                ai -= dif;
                let mut i = m - k + 1;
                b0 = b1;
                b1 = b2;
                d0 = d1;
                d1 = d2;
                b2 = yy * b1 - b0 + b[i - 1];
                if !self.even {
                    i += 1;
                }
                d2 = yy * d1 - d0 + ai * b[i - 1];
            }

            let f = if self.even {
                fd = d2 + d1;
                x * (b2 - b1)
            } else {
                fd = 4.0 * x * d2;
                0.5 * (b2 - b0)
            };

            let delta = f / fd;
            x -= delta;
            if converged {
                break;
            }
            if delta.abs() <= NEWTON_TOLERANCE {
                converged = true;
            }
        }

        // P_n(x) by the Legendre recurrence
        let mut d0 = 1.0;
        let mut d1 = x;
        let mut d2 = x;
        let mut ai = 0.0;
        for _ in 2..=self.n {
            ai += 1.0;
            d2 = ((ai + ai + 1.0) * x * d1 - ai * d0) / (ai + 1.0);
            d0 = d1;
            d1 = d2;
        }

        (x, self.coef2 / (fd * d2))
    }

    fn gauss_abscissa(&self, mut x: f64) -> (f64, f64, f64) {
        let m = self.m;
        let b = &self.b;
        let mut converged = x == 0.0;
        let mut p0 = 1.0;
        let mut p2 = x;
        let mut pd2 = 1.0;

        for _ in 0..MAX_NEWTON_ITERATIONS {
            p0 = 1.0;
            let mut p1 = x;
            let mut pd0 = 0.0;
            let mut pd1 = 1.0;
            let mut ai = 0.0;
            for _ in 2..=self.n {
                ai += 1.0;
                p2 = ((ai + ai + 1.0) * x * p1 - ai * p0) / (ai + 1.0);
                pd2 = ((ai + ai + 1.0) * (p1 + x * pd1) - ai * pd0) / (ai + 1.0);
                p0 = p1;
                p1 = p2;
                pd0 = pd1;
                pd1 = pd2;
            }

            let delta = p2 / pd2;
            x -= delta;
            if converged {
                break;
            }
            if delta.abs() <= NEWTON_TOLERANCE {
                converged = true;
            }
        }

        let gauss_weight = 2.0 / (self.n as f64 * pd2 * p0);

        // E_{n+1}(x) by the Chebyshev recurrence
        let mut q0 = 0.0;
        let mut q1 = 0.0;
        let mut q2 = b[m];
        let yy = 4.0 * x * x - 2.0;
        for k in 1..=m {
            let i = m - k + 1;
            q0 = q1;
            q1 = q2;
            q2 = yy * q1 - q0 + b[i - 1];
        }

        let kronrod_weight = if self.even {
            gauss_weight + self.coef2 / (pd2 * x * (q2 - q1))
        } else {
            gauss_weight + 2.0 * self.coef2 / (pd2 * (q2 - q0))
        };

        (x, kronrod_weight, gauss_weight)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GaussKronrodRule
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one rule application on [a, b].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleEstimate {
    /// Kronrod approximation of the integral
    pub result: f64,
    /// Error estimate derived from |Kronrod - Gauss|
    pub abserr: f64,
    /// Approximation of the integral of |f|
    pub resabs: f64,
    /// Approximation of the integral of |f - mean(f)|
    pub resasc: f64
}

/// Nodes and weights of one Gauss-Kronrod pair on [-1, 1].
///
/// Only the non-negative half is stored: `abscissae` is decreasing and ends
/// at the origin, odd positions are shared with the Gauss rule.
#[derive(Debug, Clone)]
pub struct GaussKronrodRule {
    rule: QuadratureRule,
    abscissae: Vec<f64>,
    kronrod_weights: Vec<f64>,
    gauss_weights: Vec<f64>
}

impl GaussKronrodRule {
    pub fn new(rule: QuadratureRule) -> GaussKronrodRule {
        let (abscissae, kronrod_weights, gauss_weights) =
            KronrodGenerator::new(rule.gauss_points()).generate();
        GaussKronrodRule { rule, abscissae, kronrod_weights, gauss_weights }
    }

    pub fn rule(&self) -> QuadratureRule {
        self.rule
    }

    pub fn abscissae(&self) -> &[f64] {
        &self.abscissae
    }

    pub fn kronrod_weights(&self) -> &[f64] {
        &self.kronrod_weights
    }

    pub fn gauss_weights(&self) -> &[f64] {
        &self.gauss_weights
    }

    pub fn kronrod_points(&self) -> usize {
        2 * self.abscissae.len() - 1
    }

    /// Applies the pair on [a, b], evaluating all 2n+1 points in one batch.
    ///
    /// The error estimate follows QUADPACK: the raw |K - G| difference is
    /// rescaled by `resasc` and floored at the round-off level of `resabs`.
    pub fn apply<I>(&self, f: &I, a: f64, b: f64) -> Result<RuleEstimate, IntegrationError> where
        I: Integrand + ?Sized {
        let n = self.abscissae.len() - 1;
        let center = 0.5 * (a + b);
        let half_length = 0.5 * (b - a);
        let abs_half_length = half_length.abs();

        let mut fv = Vec::with_capacity(2 * n + 1);
        fv.extend(self.abscissae[..n].iter().map(|x| center - half_length * x));
        fv.extend(self.abscissae[..n].iter().map(|x| center + half_length * x));
        fv.push(center);
        f.evaluate_batch(&mut fv)?;

        let (left, rest) = fv.split_at(n);
        let (right, fc) = rest.split_at(n);
        let fc = fc[0];

        let mut resk = self.kronrod_weights[n] * fc;
        let mut resg = self.gauss_weights[n] * fc;
        let mut resabs = resk.abs();
        for j in 0..n {
            let fsum = left[j] + right[j];
            resk += self.kronrod_weights[j] * fsum;
            resg += self.gauss_weights[j] * fsum;
            resabs += self.kronrod_weights[j] * (left[j].abs() + right[j].abs());
        }

        let mean = 0.5 * resk;
        let mut resasc = self.kronrod_weights[n] * (fc - mean).abs();
        for j in 0..n {
            resasc += self.kronrod_weights[j] * ((left[j] - mean).abs() + (right[j] - mean).abs());
        }

        let result = resk * half_length;
        resabs *= abs_half_length;
        resasc *= abs_half_length;

        let mut abserr = ((resk - resg) * half_length).abs();
        if resasc != 0.0 && abserr != 0.0 {
            abserr = resasc * (200.0 * abserr / resasc).powf(1.5).min(1.0);
        }
        if resabs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
            abserr = abserr.max(50.0 * f64::EPSILON * resabs);
        }

        Ok(RuleEstimate { result, abserr, resabs, resasc })
    }
}
