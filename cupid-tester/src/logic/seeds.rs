use anyhow::{Result, bail};
use cupid_game::{decode_party_code, encode_party_code};
use std::collections::HashSet;

/// Seed metadata used by logic runs and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub const fn from_party_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// The code the user typed, or the canonical code for a numeric seed.
    #[must_use]
    pub fn party_code(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| encode_party_code(self.seed))
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers (negative values use their magnitude) and
/// party codes such as `ROSES42`. Duplicates are dropped, keeping the first.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved: Vec<SeedInfo> = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Some(seed) = decode_party_code(token) {
            SeedInfo::from_party_code(seed, token.to_ascii_uppercase())
        } else {
            bail!("invalid seed or party code: {token}");
        };

        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        bail!("no seeds provided");
    }

    Ok(resolved)
}
