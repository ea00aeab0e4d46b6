pub mod docker;
pub mod engine;
pub mod image;
pub mod logs;

pub use docker::DockerEngine;
pub use engine::{ContainerEngine, ContainerSpec, ImageHandle, LogSink, Mount};
