//! Vote choices and presence modes

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// What a ballot says
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    For,
    Against,
    Abstain,
    NoOpinion,
}

impl VoteChoice {
    pub const ALL: [VoteChoice; 4] = [
        VoteChoice::For,
        VoteChoice::Against,
        VoteChoice::Abstain,
        VoteChoice::NoOpinion,
    ];

    /// for, against and abstain are expressed; no-opinion is not.
    pub fn is_expressed(&self) -> bool {
        !matches!(self, VoteChoice::NoOpinion)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::For => "for",
            VoteChoice::Against => "against",
            VoteChoice::Abstain => "abstain",
            VoteChoice::NoOpinion => "no_opinion",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "for" | "yes" => Ok(VoteChoice::For),
            "against" | "no" => Ok(VoteChoice::Against),
            "abstain" => Ok(VoteChoice::Abstain),
            "no_opinion" => Ok(VoteChoice::NoOpinion),
            _ => Err(DomainError::InvalidChoice(s.to_string())),
        }
    }
}

/// How a member takes part in a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceMode {
    /// In the room
    Present,
    /// Connected remotely
    Remote,
    /// Represented by another member holding a delegation
    Proxy,
}

impl PresenceMode {
    /// Present or remote. A member represented by proxy is not directly
    /// present and therefore may not cast ballots (blocks delegation chains).
    pub fn is_direct(&self) -> bool {
        matches!(self, PresenceMode::Present | PresenceMode::Remote)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceMode::Present => "present",
            PresenceMode::Remote => "remote",
            PresenceMode::Proxy => "proxy",
        }
    }
}

impl std::fmt::Display for PresenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresenceMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(PresenceMode::Present),
            "remote" => Ok(PresenceMode::Remote),
            "proxy" => Ok(PresenceMode::Proxy),
            _ => Err(DomainError::InvalidPresence(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!("for".parse::<VoteChoice>(), Ok(VoteChoice::For));
        assert_eq!("AGAINST".parse::<VoteChoice>(), Ok(VoteChoice::Against));
        assert_eq!("no-opinion".parse::<VoteChoice>(), Ok(VoteChoice::NoOpinion));
        assert_eq!(
            "maybe".parse::<VoteChoice>(),
            Err(DomainError::InvalidChoice("maybe".to_string()))
        );
    }

    #[test]
    fn test_expressed_excludes_no_opinion() {
        let expressed: Vec<_> = VoteChoice::ALL
            .iter()
            .filter(|c| c.is_expressed())
            .collect();
        assert_eq!(expressed.len(), 3);
        assert!(!VoteChoice::NoOpinion.is_expressed());
    }

    #[test]
    fn test_proxy_is_not_direct() {
        assert!(PresenceMode::Present.is_direct());
        assert!(PresenceMode::Remote.is_direct());
        assert!(!PresenceMode::Proxy.is_direct());
    }

    #[test]
    fn test_choice_serde_snake_case() {
        let json = serde_json::to_string(&VoteChoice::NoOpinion).unwrap();
        assert_eq!(json, "\"no_opinion\"");
    }
}
