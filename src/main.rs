use anyhow::Context;
use teapot_field::{config::DemoConfig, flow};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(&path).context("Could not start the demo")?,
        None => DemoConfig::default(),
    };
    flow::run(config)
}
