//! Errors for the economy and persistence layer
//!
//! The simulation itself never fails: rejected input is a no-op and game over
//! is a terminal phase. Only wallet, shop and save operations return errors.

/// Errors from spending coins or settling a run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    /// Wallet cannot cover the amount.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Gamble stake is below the table minimum.
    #[error("stake {stake} is below the minimum of {min}")]
    StakeTooSmall { stake: u64, min: u64 },

    /// Cash-out requested outside a live gamble run.
    #[error("no gamble run in progress")]
    NotGambling,

    /// Score conversion requested while the run is still going or not classic.
    #[error("score can only be converted after a classic run ends")]
    ConversionUnavailable,

    /// Score of this run was already converted.
    #[error("score already converted")]
    AlreadyConverted,

    /// Skin id is not in the catalog.
    #[error("unknown skin '{id}'")]
    UnknownSkin { id: String },

    /// Skin must be bought before it can be equipped.
    #[error("skin '{id}' is not owned")]
    SkinNotOwned { id: String },

    /// Skin is already in the collection.
    #[error("skin '{id}' is already owned")]
    AlreadyOwned { id: String },
}

/// Errors from loading persisted data
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Stored document is not valid JSON for the expected type.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Stored document is from a newer format.
    #[error("unsupported save version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
