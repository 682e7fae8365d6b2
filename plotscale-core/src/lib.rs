//! Scale inference and normalization for a declarative chart grammar.
//!
//! Marks hand over named channels of raw values; this crate groups them by
//! the scale they reference, infers each scale's type, builds concrete
//! domains and ranges, and returns serializable descriptors that map values
//! on demand. A returned descriptor can be fed back in as options and
//! reproduces itself.

pub mod channel;
pub mod compile;
pub mod scales;
pub mod spec;

pub use channel::{Channel, ChannelScale};
pub use compile::{compile_scales, compile_scales_with_limit, scale, ScaleMap};
pub use scales::apply::{apply, invert};
pub use scales::descriptor::ScaleDescriptor;
pub use scales::registry::{ScaleName, IMPLICIT_DOMAIN_LIMIT};
