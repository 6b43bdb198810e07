use rust_decimal_macros::dec;
use serial_test::serial;
use stand_frontend::config::get_configuration;

#[test]
#[serial]
fn base_configuration_loads() {
    std::env::remove_var("APP_BACKEND__BASE_URL");

    let settings = get_configuration().expect("Failed to load configuration");

    assert_eq!(settings.backend.base_url, "http://localhost:5000/api");
    assert_eq!(settings.backend.timeout_seconds, 30);
    assert_eq!(settings.observability.service_name, "stand-frontend");
    assert_eq!(settings.pricing.default_tax_rate, dec!(19));
    assert_eq!(settings.pricing.default_currency, "TND");
}

#[test]
#[serial]
fn environment_overrides_backend_url() {
    std::env::set_var("APP_BACKEND__BASE_URL", "http://backend:5000/api");

    let settings = get_configuration().expect("Failed to load configuration");
    std::env::remove_var("APP_BACKEND__BASE_URL");

    assert_eq!(settings.backend.base_url, "http://backend:5000/api");
}
