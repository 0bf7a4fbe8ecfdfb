use thiserror::Error;

/// Unified error type for the payment and authorization client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("required token metadata (name, symbol, decimals) not found for ledger {canister_id}")]
    MetadataIncomplete { canister_id: String },

    #[error("amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("allowance rejected: {0}")]
    AllowanceRejected(String),

    /// Error string returned by the authorization backend, kept verbatim.
    #[error("{0}")]
    Backend(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(String),
}

/// Errors converting a user-entered amount into ledger units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid amount format: {0:?}")]
    InvalidFormat(String),

    #[error("amount has {fraction_digits} fractional digits, token supports at most {decimals}")]
    PrecisionOverflow { fraction_digits: usize, decimals: u8 },
}

/// Failures of the remote call itself, reported by actor implementations.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("call to {method} was rejected: {message}")]
    Rejected { method: String, message: String },

    #[error("failed to decode reply of {method}: {message}")]
    Decode { method: String, message: String },
}
