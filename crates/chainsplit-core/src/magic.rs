//! Block magic markers.
//!
//! Every block in a dump file is framed by a 4-byte network marker. Several
//! markers can be configured at once so one reader accepts dumps from more
//! than one network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 4-byte block marker, stored in on-disk byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Magic(#[serde(with = "hex")] pub [u8; 4]);

impl Magic {
    /// Bitcoin mainnet.
    pub const MAINNET: Magic = Magic([0xF9, 0xBE, 0xB4, 0xD9]);
    /// Bitcoin testnet3.
    pub const TESTNET3: Magic = Magic([0x0B, 0x11, 0x09, 0x07]);
    /// Bitcoin regtest.
    pub const REGTEST: Magic = Magic([0xFA, 0xBF, 0xB5, 0xDA]);
    /// Namecoin mainnet.
    pub const NAMECOIN: Magic = Magic([0xF9, 0xBE, 0xB4, 0xFE]);

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Look up a well-known network by name (`main`, `testnet3`, `regtest`, `namecoin`).
    pub fn for_network(name: &str) -> Option<Magic> {
        match name.to_ascii_lowercase().as_str() {
            "main" | "mainnet" | "bitcoin" => Some(Self::MAINNET),
            "testnet" | "testnet3" => Some(Self::TESTNET3),
            "regtest" => Some(Self::REGTEST),
            "namecoin" => Some(Self::NAMECOIN),
            _ => None,
        }
    }
}

impl From<[u8; 4]> for Magic {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Magic {
    type Err = String;

    /// Parse a hex marker such as `F9BEB4D9` (an optional `0x` prefix is accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| format!("not valid hex: {e}"))?;
        let arr: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| format!("expected 4 bytes, got {}", bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let m: Magic = "F9BEB4D9".parse().unwrap();
        assert_eq!(m, Magic::MAINNET);
        assert_eq!(m.to_string(), "F9BEB4D9");

        let lower: Magic = "0xfabfb5da".parse().unwrap();
        assert_eq!(lower, Magic::REGTEST);
    }

    #[test]
    fn wrong_length_rejected() {
        assert!("F9BEB4".parse::<Magic>().is_err());
        assert!("F9BEB4D900".parse::<Magic>().is_err());
        assert!("not-hex!".parse::<Magic>().is_err());
    }

    #[test]
    fn network_lookup() {
        assert_eq!(Magic::for_network("testnet3"), Some(Magic::TESTNET3));
        assert_eq!(Magic::for_network("Main"), Some(Magic::MAINNET));
        assert_eq!(Magic::for_network("dogecoin"), None);
    }

    #[test]
    fn serde_as_hex_string() {
        let json = serde_json::to_string(&Magic::MAINNET).unwrap();
        assert_eq!(json, "\"f9beb4d9\"");
        let back: Magic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Magic::MAINNET);
    }
}
