//! Executive roles and governance tiers.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Governance tier of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Bicameral approval tier (CEO + DAO). Their joint vote is binding.
    Head,
    /// Advisory tier consulted during disagreement rounds.
    CLevel,
}

/// Role tag of an executive agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Ceo,
    Dao,
    Cmo,
    Cto,
    Cfo,
    Coo,
    Cco,
}

impl AgentRole {
    pub const HEAD: [AgentRole; 2] = [AgentRole::Ceo, AgentRole::Dao];

    pub const C_LEVEL: [AgentRole; 5] = [
        AgentRole::Cmo,
        AgentRole::Cto,
        AgentRole::Cfo,
        AgentRole::Coo,
        AgentRole::Cco,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Ceo => "ceo",
            AgentRole::Dao => "dao",
            AgentRole::Cmo => "cmo",
            AgentRole::Cto => "cto",
            AgentRole::Cfo => "cfo",
            AgentRole::Coo => "coo",
            AgentRole::Cco => "cco",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            AgentRole::Ceo | AgentRole::Dao => Tier::Head,
            _ => Tier::CLevel,
        }
    }

    pub fn is_head(&self) -> bool {
        self.tier() == Tier::Head
    }
}

impl FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ceo" => Ok(AgentRole::Ceo),
            "dao" => Ok(AgentRole::Dao),
            "cmo" => Ok(AgentRole::Cmo),
            "cto" => Ok(AgentRole::Cto),
            "cfo" => Ok(AgentRole::Cfo),
            "coo" => Ok(AgentRole::Coo),
            "cco" => Ok(AgentRole::Cco),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tiers() {
        for role in AgentRole::HEAD {
            assert_eq!(role.tier(), Tier::Head);
        }
        for role in AgentRole::C_LEVEL {
            assert_eq!(role.tier(), Tier::CLevel);
            assert!(!role.is_head());
        }
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("CEO".parse::<AgentRole>().unwrap(), AgentRole::Ceo);
        assert_eq!(" dao ".parse::<AgentRole>().unwrap(), AgentRole::Dao);
        assert!("intern".parse::<AgentRole>().is_err());
    }
}
