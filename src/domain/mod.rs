// Domain layer: data models and ports (interfaces) shared by the model core and the adapters.

pub mod model;
pub mod ports;
