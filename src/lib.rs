pub mod cli;
pub mod client;
pub mod crd;
pub mod logging;
pub mod manifest;
pub mod targeting;
pub mod upload;
