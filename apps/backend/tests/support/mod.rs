#![allow(dead_code)]

pub mod app;
pub mod stores;

// Each test binary uses a different subset.
#[allow(unused_imports)]
pub use app::{memory_state, service_with, start_test_server, test_config, TEST_SEED};
#[allow(unused_imports)]
pub use fake_generator::ScriptedGenerator;
