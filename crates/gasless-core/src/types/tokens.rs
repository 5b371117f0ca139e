//! Token metadata registry.
//!
//! Maps lower-cased token addresses to display metadata for the rendering
//! layer. Amounts never pass through here; the registry is purely a lookup
//! boundary and an unknown address is reported as a miss, not an error.

use std::collections::HashMap;

/// Display metadata for a known token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
    pub logo_uri: Option<String>,
}

/// Registry of known tokens keyed by lower-cased contract address.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    by_address: HashMap<String, TokenMetadata>,
}

/// USDC contract address on Polygon mainnet.
pub const USDC_ADDRESS: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";

/// WMATIC contract address on Polygon mainnet.
pub const WMATIC_ADDRESS: &str = "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270";

/// WETH contract address on Polygon mainnet.
pub const WETH_ADDRESS: &str = "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619";

/// DAI contract address on Polygon mainnet.
pub const DAI_ADDRESS: &str = "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063";

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the Polygon mainnet tokens the swap UI ships.
    pub fn polygon() -> Self {
        let mut registry = Self::new();
        registry.insert(USDC_ADDRESS, TokenMetadata {
            symbol: "USDC".to_string(),
            decimals: 6,
            logo_uri: Some(
                "https://raw.githubusercontent.com/maticnetwork/polygon-token-assets/main/assets/tokenAssets/usdc.svg".to_string(),
            ),
        });
        registry.insert(WMATIC_ADDRESS, TokenMetadata {
            symbol: "WMATIC".to_string(),
            decimals: 18,
            logo_uri: Some(
                "https://raw.githubusercontent.com/maticnetwork/polygon-token-assets/main/assets/tokenAssets/wmatic.svg".to_string(),
            ),
        });
        registry.insert(WETH_ADDRESS, TokenMetadata {
            symbol: "WETH".to_string(),
            decimals: 18,
            logo_uri: Some(
                "https://raw.githubusercontent.com/maticnetwork/polygon-token-assets/main/assets/tokenAssets/weth.svg".to_string(),
            ),
        });
        registry.insert(DAI_ADDRESS, TokenMetadata {
            symbol: "DAI".to_string(),
            decimals: 18,
            logo_uri: Some(
                "https://raw.githubusercontent.com/maticnetwork/polygon-token-assets/main/assets/tokenAssets/dai.svg".to_string(),
            ),
        });
        registry
    }

    /// Add or replace a token entry.
    pub fn insert(&mut self, address: &str, metadata: TokenMetadata) {
        self.by_address.insert(address.to_lowercase(), metadata);
    }

    /// Look up a token by address, case-insensitively.
    ///
    /// Returns `None` for unknown addresses; deciding how to render an
    /// unknown token is the caller's concern.
    pub fn get(&self, address: &str) -> Option<&TokenMetadata> {
        self.by_address.get(&address.to_lowercase())
    }

    /// Symbol for an address, falling back to the address itself.
    pub fn symbol_or_address<'a>(&'a self, address: &'a str) -> &'a str {
        self.get(address).map(|t| t.symbol.as_str()).unwrap_or(address)
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}
