use serde::{
    Deserialize,
    Serialize
};

use super::quadraturerule::QuadratureRule;

pub const DEFAULT_MAX_SUBDIVISIONS: usize = 100;
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-6;

/// Accuracy targets and engine configuration for one integration call.
///
/// Fields missing from a JSON description take their default values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    max_subdivisions: usize,
    absolute_tolerance: f64,
    relative_tolerance: f64,
    rule: QuadratureRule
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        IntegrationSettings {
            max_subdivisions: DEFAULT_MAX_SUBDIVISIONS,
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            rule: QuadratureRule::default()
        }
    }
}

impl IntegrationSettings {
    pub fn new(max_subdivisions: usize,
               absolute_tolerance: f64,
               relative_tolerance: f64,
               rule: QuadratureRule) -> IntegrationSettings {
        IntegrationSettings { max_subdivisions, absolute_tolerance, relative_tolerance, rule }
    }

    pub fn max_subdivisions(&self) -> usize {
        self.max_subdivisions
    }

    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }

    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    pub fn rule(&self) -> QuadratureRule {
        self.rule
    }

    pub fn with_max_subdivisions(mut self, max_subdivisions: usize) -> IntegrationSettings {
        self.max_subdivisions = max_subdivisions;
        self
    }

    pub fn with_absolute_tolerance(mut self, absolute_tolerance: f64) -> IntegrationSettings {
        self.absolute_tolerance = absolute_tolerance;
        self
    }

    pub fn with_relative_tolerance(mut self, relative_tolerance: f64) -> IntegrationSettings {
        self.relative_tolerance = relative_tolerance;
        self
    }

    pub fn with_rule(mut self, rule: QuadratureRule) -> IntegrationSettings {
        self.rule = rule;
        self
    }
}
