use crate::*;
pub use urn::*;

mod urn;

pub trait BoardGenerator {
    fn generate(self, config: &BoardConfig) -> core::result::Result<Board, ConfigError>;
}
