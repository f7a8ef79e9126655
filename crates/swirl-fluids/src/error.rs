use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FluidError {
    #[error("cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfRange {
        x: usize,
        y: usize,
        size: usize,
    },
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
    },
}
