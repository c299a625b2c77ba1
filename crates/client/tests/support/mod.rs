#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use goat_client::{ClientConfig, PollPolicy, RegistryClient, ScriptedTransport};

pub const BASE: &str = "http://goat.goat/goat";
pub const TOKEN: &str = "d22bbda9b5b507dc6cd032d80d6a3d299fda10fe";

pub fn config(poll: PollPolicy) -> ClientConfig {
    ClientConfig::new(BASE).with_token(TOKEN).with_poll_policy(poll)
}

pub fn fast_poll() -> PollPolicy {
    PollPolicy::default()
        .with_interval(Duration::from_millis(1))
        .with_max_attempts(10)
}

pub fn client(transport: &Arc<ScriptedTransport>) -> RegistryClient {
    client_with(transport, fast_poll())
}

pub fn client_with(transport: &Arc<ScriptedTransport>, poll: PollPolicy) -> RegistryClient {
    goat_observability::init_for_tests();
    RegistryClient::new(config(poll), transport.clone())
}
