mod intersect;

pub use intersect::*;
