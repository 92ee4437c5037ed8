//! Agent configuration files under `<config>/[<container>/]oneagent`.

pub mod ca;
pub mod container_conf;
pub mod curl;
pub mod preload;
