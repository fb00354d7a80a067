use cairn_blocks::BlockError;
use cairn_dag::DagError;
use cairn_pin::PinError;
use cairn_types::Cancelled;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvideError {
    #[error("walk failed: {0}")]
    Walk(#[from] DagError),

    #[error("pin registry error: {0}")]
    Pin(#[from] PinError),

    #[error("blockstore error: {0}")]
    Block(#[from] BlockError),

    #[error("routing error: {0}")]
    Routing(String),

    #[error("unknown reprovide strategy {0:?}")]
    UnknownStrategy(String),

    #[error("invalid reprovide config: {0}")]
    Config(String),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("key producer panicked: {0}")]
    ProducerPanicked(String),
}

impl ProvideError {
    /// Returns `true` if the error only records that the token fired.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled(_) => true,
            Self::Walk(e) => e.is_cancelled(),
            Self::Block(BlockError::Cancelled(_)) => true,
            _ => false,
        }
    }
}

pub type ProvideResult<T> = Result<T, ProvideError>;
