// Configuration for integration tests. This crate is about interacting with real serial ports and
// so some tests need actual hardware: two ports connected back to back.

use envconfig::Envconfig;
use rstest::fixture;

#[derive(Clone, Debug, Envconfig, Eq, PartialEq)]
pub struct HardwareConfig {
    #[envconfig(from = "SERIAL_UPLOAD_TEST_PORT_1")]
    pub port_1: String,
    #[envconfig(from = "SERIAL_UPLOAD_TEST_PORT_2")]
    pub port_2: String,
}

#[fixture]
pub fn hw_config() -> HardwareConfig {
    HardwareConfig::init_from_env().unwrap()
}
