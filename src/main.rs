use std::env;
use std::f64::consts::PI;

use tracing_subscriber::EnvFilter;

use numint::configuration::Configuration;
use numint::manager::manager::IManager;
use numint::{
    integrate,
    integrate_host,
    HostCallError,
    HostVector,
    IntegrationSettings
};

// Host-style integrand: a * exp(-b * x^2) with (a, b) passed as payload.
fn scaled_gaussian(x: &HostVector, args: &(f64, f64)) -> Result<HostVector, HostCallError> {
    let (a, b) = *args;
    Ok(x.map(|v| a * (-b * v * v).exp()))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Configuration::new();
    config.integration_settings_manager().insert("default", IntegrationSettings::default());
    if let Some(config_path) = env::args().nth(1) {
        if let Err(error) = config.from_reader(&config_path) {
            eprintln!("failed to load {}: {}", config_path, error);
            std::process::exit(1);
        }
    }

    let names = config.integration_settings_manager().names();
    for name in names {
        let settings = match config.settings(&name) {
            Ok(settings) => settings,
            Err(error) => {
                eprintln!("{}", error);
                continue;
            }
        };
        println!("[{}] rule={:?} max_subdivisions={} eps_abs={:e} eps_rel={:e}",
                 name,
                 settings.rule(),
                 settings.max_subdivisions(),
                 settings.absolute_tolerance(),
                 settings.relative_tolerance());

        let cases: [(&str, fn(f64) -> f64, f64, f64); 3] = [
            ("sin(x)", f64::sin, 0.0, PI),
            ("1/sqrt(x)", |x| 1.0 / x.sqrt(), 0.0, 1.0),
            ("exp(x)", f64::exp, 1.0, 0.0)
        ];
        for (label, f, lower, upper) in cases {
            match integrate(f, lower, upper, &settings) {
                Ok(result) => println!("  {:<10} [{}, {}] = {:.15} +/- {:.3e} (status {})",
                                       label, lower, upper, result.value(), result.error_estimate(), result.status_code()),
                Err(error) => println!("  {:<10} failed: {}", label, error)
            }
        }

        match integrate_host(&scaled_gaussian, &(2.0, 0.5), -5.0, 5.0, &settings) {
            Ok(result) => println!("  {:<10} [-5, 5] = {:.15} +/- {:.3e} (status {})",
                                   "host", result.value(), result.error_estimate(), result.status_code()),
            Err(error) => println!("  {:<10} failed: {}", "host", error)
        }
    }
}
