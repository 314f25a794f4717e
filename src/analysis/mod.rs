pub mod normalize;
pub mod spectrum;
