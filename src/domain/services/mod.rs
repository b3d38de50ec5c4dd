mod similarity;

pub use similarity::*;
