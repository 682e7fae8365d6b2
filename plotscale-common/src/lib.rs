pub mod error;
pub mod value;

pub use error::{PlotScaleError, Result, ResultWithContext};
pub use value::ScalarValue;
