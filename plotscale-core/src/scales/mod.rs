pub mod apply;
pub mod color;
pub mod descriptor;
pub(crate) mod domain;
pub(crate) mod factory;
pub(crate) mod infer;
pub mod interval;
pub(crate) mod range;
pub mod registry;
pub(crate) mod schemes;
pub mod ticks;
