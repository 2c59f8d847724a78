use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier used for tokens, pools, users and the vault itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(address: impl Into<Address>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// The ordered token pair of a pool. Amounts elsewhere are always `(token0, token1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub token0: Token,
    pub token1: Token,
}

impl TokenPair {
    pub fn new(token0: Token, token1: Token) -> Self {
        Self { token0, token1 }
    }

    /// Index of `address` in the pair: `Some(0)`, `Some(1)` or `None`.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        if self.token0.address == *address {
            Some(0)
        } else if self.token1.address == *address {
            Some(1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair::new(Token::new("0xaaa", "WETH", 18), Token::new("0xbbb", "USDC", 6))
    }

    #[test]
    fn test_index_of() {
        let pair = pair();
        assert_eq!(pair.index_of(&"0xaaa".into()), Some(0));
        assert_eq!(pair.index_of(&"0xbbb".into()), Some(1));
        assert_eq!(pair.index_of(&"0xccc".into()), None);
    }

    #[test]
    fn test_address_display() {
        assert_eq!(Address::new("vault").to_string(), "vault");
    }
}
