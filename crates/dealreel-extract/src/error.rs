use thiserror::Error;

/// Why a single raw record was dropped. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("record has no title")]
    MissingTitle,

    #[error("record has no catalog identifier")]
    MissingAsin,

    #[error("record has no product URL")]
    MissingProductUrl,

    #[error("record has neither savings nor promotions")]
    NoDiscount,

    #[error("record has neither a current price nor a discount percentage")]
    NoPriceSignal,

    #[error("malformed record: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("deal cap must be greater than zero")]
    InvalidCap,

    #[error("category collection requires at least one category")]
    NoCategories,
}
