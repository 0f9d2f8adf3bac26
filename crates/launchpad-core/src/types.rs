//! # Core Type Definitions
//!
//! Caller-supplied token configuration, feature flags, template identifiers
//! and the closed set of template variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use solana_program::pubkey::Pubkey;

use crate::errors::FactoryError;
use crate::serde_helpers::pubkey_serde;

/// Optional capabilities requested for a token instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub mintable: bool,
    pub burnable: bool,
    pub pausable: bool,
    pub capped: bool,
}

impl FeatureFlags {
    pub const NONE: Self = Self {
        mintable: false,
        burnable: false,
        pausable: false,
        capped: false,
    };

    pub const ALL: Self = Self {
        mintable: true,
        burnable: true,
        pausable: true,
        capped: true,
    };

    /// Packed representation used in content hashes
    pub fn bits(&self) -> u8 {
        (self.mintable as u8)
            | (self.burnable as u8) << 1
            | (self.pausable as u8) << 2
            | (self.capped as u8) << 3
    }

    /// Names of the enabled flags, in declaration order
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.mintable, "mintable"),
            (self.burnable, "burnable"),
            (self.pausable, "pausable"),
            (self.capped, "capped"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Token configuration submitted with a deployment request.
///
/// Never stored by the factory; only its content hash is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub total_supply: u64,
    pub decimals: u8,
    #[serde(flatten)]
    pub features: FeatureFlags,
    /// Only meaningful when `features.capped` is set
    #[serde(default)]
    pub max_supply: u64,
    #[serde(with = "pubkey_serde")]
    pub initial_owner: Pubkey,
}

impl TokenConfig {
    /// Plain fixed-supply configuration with every feature disabled
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        total_supply: u64,
        decimals: u8,
        initial_owner: Pubkey,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            total_supply,
            decimals,
            features: FeatureFlags::NONE,
            max_supply: 0,
            initial_owner,
        }
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Enables the cap and sets the maximum supply
    pub fn capped(mut self, max_supply: u64) -> Self {
        self.features.capped = true;
        self.max_supply = max_supply;
        self
    }
}

/// Opaque fixed-width template identifier.
///
/// Well-known ids are ASCII labels padded with zero bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId([u8; 32]);

pub const BASIC_TEMPLATE: TemplateId = TemplateId::from_label("BASIC_TEMPLATE");
pub const MINTABLE_TEMPLATE: TemplateId = TemplateId::from_label("MINTABLE_TEMPLATE");
pub const FULL_FEATURED_TEMPLATE: TemplateId = TemplateId::from_label("FULL_FEATURED_TEMPLATE");

const RAW_ID_PREFIX: &str = "id:";

impl TemplateId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn from_label(label: &str) -> Self {
        let bytes = label.as_bytes();
        assert!(bytes.len() <= 32, "template label longer than 32 bytes");
        let mut out = [0u8; 32];
        let mut i = 0;
        while i < bytes.len() {
            out[i] = bytes[i];
            i += 1;
        }
        Self(out)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// The ASCII label if this id was built from one
    pub fn label(&self) -> Option<&str> {
        let len = self.0.iter().position(|b| *b == 0).unwrap_or(32);
        if len == 0 || self.0[len..].iter().any(|b| *b != 0) {
            return None;
        }
        let label = &self.0[..len];
        if !label.iter().all(|b| b.is_ascii_graphic()) {
            return None;
        }
        std::str::from_utf8(label).ok()
    }
}

impl AsRef<[u8]> for TemplateId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "{}{}", RAW_ID_PREFIX, bs58::encode(self.0).into_string()),
        }
    }
}

impl fmt::Debug for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemplateId({})", self)
    }
}

/// Error parsing a template identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid template id: {0}")]
pub struct ParseTemplateIdError(String);

impl FromStr for TemplateId {
    type Err = ParseTemplateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(encoded) = s.strip_prefix(RAW_ID_PREFIX) {
            let bytes = bs58::decode(encoded)
                .into_vec()
                .map_err(|e| ParseTemplateIdError(e.to_string()))?;
            let bytes: [u8; 32] = bytes
                .try_into()
                .map_err(|_| ParseTemplateIdError(format!("{s} does not decode to 32 bytes")))?;
            return Ok(Self(bytes));
        }

        if s.is_empty() || s.len() > 32 || !s.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ParseTemplateIdError(s.to_string()));
        }
        Ok(Self::from_label(s))
    }
}

impl Serialize for TemplateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Closed set of token implementations a template can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Basic,
    Mintable,
    FullFeatured,
}

impl TemplateKind {
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Basic => "basic",
            TemplateKind::Mintable => "mintable",
            TemplateKind::FullFeatured => "full-featured",
        }
    }

    /// Registry id this kind is conventionally registered under
    pub fn default_template_id(&self) -> TemplateId {
        match self {
            TemplateKind::Basic => BASIC_TEMPLATE,
            TemplateKind::Mintable => MINTABLE_TEMPLATE,
            TemplateKind::FullFeatured => FULL_FEATURED_TEMPLATE,
        }
    }

    /// Flags this implementation can honour
    pub fn supported_features(&self) -> FeatureFlags {
        match self {
            TemplateKind::Basic => FeatureFlags {
                capped: true,
                ..FeatureFlags::NONE
            },
            TemplateKind::Mintable => FeatureFlags {
                mintable: true,
                capped: true,
                ..FeatureFlags::NONE
            },
            TemplateKind::FullFeatured => FeatureFlags::ALL,
        }
    }

    /// Rejects the first requested flag this implementation cannot honour
    pub fn check_features(&self, requested: &FeatureFlags) -> Result<(), FactoryError> {
        let supported = self.supported_features();
        let unsupported = [
            (requested.mintable && !supported.mintable, "mintable"),
            (requested.burnable && !supported.burnable, "burnable"),
            (requested.pausable && !supported.pausable, "pausable"),
            (requested.capped && !supported.capped, "capped"),
        ]
        .into_iter()
        .find_map(|(rejected, feature)| rejected.then_some(feature));

        match unsupported {
            Some(feature) => Err(FactoryError::UnsupportedFeature {
                template: self.name(),
                feature,
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for TemplateKind {
    type Err = ParseTemplateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(TemplateKind::Basic),
            "mintable" => Ok(TemplateKind::Mintable),
            "full-featured" => Ok(TemplateKind::FullFeatured),
            other => Err(ParseTemplateIdError(other.to_string())),
        }
    }
}

/// Output of the pure deployment cost estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Estimated compute units for the deployment
    pub compute_units: u64,
    /// Current service fee in lamports
    pub service_fee: u64,
}
