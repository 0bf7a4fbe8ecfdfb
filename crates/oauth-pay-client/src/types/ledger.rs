use std::fmt;

use candid::{CandidType, Int, Nat, Principal};
use serde::{Deserialize, Serialize};

/// An ICRC-1 account: owner principal plus optional 32-byte subaccount.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub owner: Principal,
    pub subaccount: Option<Vec<u8>>,
}

impl Account {
    /// Default account of `owner` (no subaccount).
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }
}

/// Value half of an `icrc1_metadata` entry.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataValue {
    Nat(Nat),
    Int(Int),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Nat(n) => write!(f, "{n}"),
            MetadataValue::Int(i) => write!(f, "{i}"),
            MetadataValue::Text(t) => write!(f, "{t:?}"),
            MetadataValue::Blob(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

/// Arguments of `icrc2_approve`.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveArgs {
    pub from_subaccount: Option<Vec<u8>>,
    pub spender: Account,
    pub amount: Nat,
    pub expected_allowance: Option<Nat>,
    pub expires_at: Option<u64>,
    pub fee: Option<Nat>,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

impl ApproveArgs {
    /// Approve `amount` for `spender` with every optional field left unset.
    pub fn new(spender: Account, amount: Nat) -> Self {
        Self {
            from_subaccount: None,
            spender,
            amount,
            expected_allowance: None,
            expires_at: None,
            fee: None,
            memo: None,
            created_at_time: None,
        }
    }
}

/// Error variant of `icrc2_approve`.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApproveError {
    GenericError { message: String, error_code: Nat },
    TemporarilyUnavailable,
    Duplicate { duplicate_of: Nat },
    BadFee { expected_fee: Nat },
    AllowanceChanged { current_allowance: Nat },
    CreatedInFuture { ledger_time: u64 },
    TooOld,
    Expired { ledger_time: u64 },
    InsufficientFunds { balance: Nat },
}

impl ApproveError {
    /// The candid variant tag.
    pub fn tag(&self) -> &'static str {
        match self {
            ApproveError::GenericError { .. } => "GenericError",
            ApproveError::TemporarilyUnavailable => "TemporarilyUnavailable",
            ApproveError::Duplicate { .. } => "Duplicate",
            ApproveError::BadFee { .. } => "BadFee",
            ApproveError::AllowanceChanged { .. } => "AllowanceChanged",
            ApproveError::CreatedInFuture { .. } => "CreatedInFuture",
            ApproveError::TooOld => "TooOld",
            ApproveError::Expired { .. } => "Expired",
            ApproveError::InsufficientFunds { .. } => "InsufficientFunds",
        }
    }
}

/// Reply of `icrc2_approve`: the block index on success.
pub type ApproveResult = Result<Nat, ApproveError>;

/// Arguments of `icrc2_allowance`.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceArgs {
    pub account: Account,
    pub spender: Account,
}

/// Reply of `icrc2_allowance`.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub allowance: Nat,
    /// Expiry in nanoseconds since the UNIX epoch.
    pub expires_at: Option<u64>,
}
