//! Ledger account address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BillError;

/// An account address on the host ledger.
///
/// Addresses are opaque to the settlement engine: it only compares them for
/// equality and passes them through to the asset ledger.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An address is well-formed when it is non-empty and contains no whitespace.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl FromStr for Address {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = Self::new(s);
        if addr.is_valid() {
            Ok(addr)
        } else {
            Err(BillError::InvalidAddress(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert!("".parse::<Address>().is_err());
        assert!("1Hr WVg".parse::<Address>().is_err());
        assert!("1HrWVgGEuGw6E1BrntqMaCmJUA58ArX7FN".parse::<Address>().is_ok());
    }
}
