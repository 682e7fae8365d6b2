pub mod plot;
pub mod scale;
