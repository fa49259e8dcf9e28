//! Configuration for the demonstration program.

mod demo_config;

pub use demo_config::DemoConfig;
