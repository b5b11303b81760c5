//! State enums for participants, bills and asset classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BillError;

/// The business role an address acts under for a given action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// Holds, splits, delivers and cashes bills.
    Supplier,
    /// Extends credit and finances bills.
    Funder,
    /// Issues bills against itself.
    Core,
}

impl Identity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Funder => "funder",
            Self::Core => "core",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Identity {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supplier" => Ok(Self::Supplier),
            "funder" => Ok(Self::Funder),
            "core" => Ok(Self::Core),
            _ => Err(BillError::UnknownIdentity(s.to_string())),
        }
    }
}

/// Lifecycle status of a bill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillStatus {
    /// Recorded but not yet issued; its token carries no value.
    Created,
    /// Issued to the market; the token can be delivered, split, financed and cashed.
    Released,
    /// Every token has been redeemed.
    Blocked,
    /// Archived. A deleted id may be reused by a new bill.
    Deleted,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Released => "released",
            Self::Blocked => "blocked",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "released" => Ok(Self::Released),
            "blocked" => Ok(Self::Blocked),
            "deleted" => Ok(Self::Deleted),
            _ => Err(BillError::UnknownStatus(s.to_string())),
        }
    }
}

/// The asset executor a balance lives under on the host ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    /// Issued tokens: bill tokens and credit tokens.
    Token,
    /// Settlement currency.
    Coins,
}

impl AssetClass {
    /// Executor name on the host ledger.
    pub fn exec_name(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Coins => "paracross",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.exec_name())
    }
}

impl FromStr for AssetClass {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "coins" | "paracross" => Ok(Self::Coins),
            _ => Err(BillError::UnknownAssetClass(s.to_string())),
        }
    }
}
