pub mod configuration;

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod integration {
        pub mod integrationerror;
        pub mod integrand;
        pub mod hostintegrand;
        pub mod quadraturerule;
        pub mod integrator;
        pub mod integrationsettings;
        pub mod integrationsettingsmanager;
        pub mod integrationresult;
        pub mod integrationrequest;
        pub mod integrate;
    }
}

pub use math::integration::hostintegrand::{
    HostFunction,
    HostIntegrand,
    HostVector
};
pub use math::integration::integrand::{
    Integrand,
    NativeIntegrand
};
pub use math::integration::integrate::{
    integrate,
    integrate_host,
    integrate_integrand
};
pub use math::integration::integrationerror::{
    HostCallError,
    IntegrationError
};
pub use math::integration::integrationrequest::{
    IntegrationRequest,
    OrientedInterval
};
pub use math::integration::integrationresult::IntegrationResult;
pub use math::integration::integrationsettings::IntegrationSettings;
pub use math::integration::integrator::{
    IntegrationStatus,
    Integrator
};
pub use math::integration::quadraturerule::{
    GaussKronrodRule,
    QuadratureRule
};
