// Domain layer: report model and provider ports. No HTTP here.

pub mod model;
pub mod ports;
