use super::integrand::Integrand;
use super::integrate::integrate_integrand;
use super::integrationerror::IntegrationError;
use super::integrationresult::IntegrationResult;
use super::integrationsettings::IntegrationSettings;

// ─────────────────────────────────────────────────────────────────────────────
// OrientedInterval
// ─────────────────────────────────────────────────────────────────────────────

/// Bounds rearranged so that `lower <= upper`, remembering whether the
/// caller's bounds were reversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedInterval {
    lower: f64,
    upper: f64,
    sign_flip: bool
}

impl OrientedInterval {
    pub fn new(lower: f64, upper: f64) -> OrientedInterval {
        if lower > upper {
            OrientedInterval { lower: upper, upper: lower, sign_flip: true }
        } else {
            OrientedInterval { lower, upper, sign_flip: false }
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn sign_flip(&self) -> bool {
        self.sign_flip
    }

    /// Maps an integral over the normalized interval back to the caller's
    /// orientation.
    pub fn orient(&self, value: f64) -> f64 {
        if self.sign_flip { -value } else { value }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntegrationRequest
// ─────────────────────────────────────────────────────────────────────────────

/// Bounds plus settings for a single integration call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationRequest {
    lower: f64,
    upper: f64,
    settings: IntegrationSettings
}

impl IntegrationRequest {
    pub fn new(lower: f64, upper: f64) -> IntegrationRequest {
        IntegrationRequest { lower, upper, settings: IntegrationSettings::default() }
    }

    pub fn with_settings(mut self, settings: IntegrationSettings) -> IntegrationRequest {
        self.settings = settings;
        self
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn settings(&self) -> &IntegrationSettings {
        &self.settings
    }

    pub fn oriented(&self) -> OrientedInterval {
        OrientedInterval::new(self.lower, self.upper)
    }

    pub fn integrate<I>(&self, f: &I) -> Result<IntegrationResult, IntegrationError> where
        I: Integrand + ?Sized {
        integrate_integrand(f, self.lower, self.upper, &self.settings)
    }
}
