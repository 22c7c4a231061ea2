//! JSON snapshot of the whole store
//!
//! The snapshot is the on-disk state of the command-line engine. Missing
//! collections default to empty, so older snapshots load unchanged.

use assembly_domain::{
    Ballot, DelegationBook, Meeting, MeetingId, Member, MemberId, Motion, PresenceMode,
    ProxyDelegation, QuorumPolicy, VotePolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Inconsistent snapshot: {0}")]
    Invalid(String),
}

/// Attendance row: how a member attends a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub meeting: MeetingId,
    pub member: MemberId,
    pub mode: PresenceMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub version: u32,
    pub meetings: Vec<Meeting>,
    pub motions: Vec<Motion>,
    pub members: Vec<Member>,
    pub ballots: Vec<Ballot>,
    pub quorum_policies: Vec<QuorumPolicy>,
    pub vote_policies: Vec<VotePolicy>,
    pub attendance: Vec<AttendanceRecord>,
    pub delegations: Vec<ProxyDelegation>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            meetings: Vec::new(),
            motions: Vec::new(),
            members: Vec::new(),
            ballots: Vec::new(),
            quorum_policies: Vec::new(),
            vote_policies: Vec::new(),
            attendance: Vec::new(),
            delegations: Vec::new(),
        }
    }
}

impl StoreSnapshot {
    /// Read and validate a snapshot; a missing file yields an empty one.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let snapshot: StoreSnapshot = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Write atomically: a temporary sibling file is renamed over `path`.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let write_err = |source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    /// Reject rows that break the store's uniqueness and reference rules.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        unique(self.meetings.iter().map(|m| m.id.get()), "meeting")?;
        unique(self.motions.iter().map(|m| m.id.get()), "motion")?;
        unique(self.members.iter().map(|m| m.id.get()), "member")?;
        unique(self.quorum_policies.iter().map(|p| p.id.get()), "quorum policy")?;
        unique(self.vote_policies.iter().map(|p| p.id.get()), "vote policy")?;

        let meetings: HashSet<MeetingId> = self.meetings.iter().map(|m| m.id).collect();
        for motion in &self.motions {
            if !meetings.contains(&motion.meeting) {
                return Err(invalid(format!(
                    "{} references unknown {}",
                    motion.id, motion.meeting
                )));
            }
            motion
                .validate()
                .map_err(|e| invalid(format!("{}: {}", motion.id, e)))?;
        }

        let mut cast = HashSet::new();
        for ballot in &self.ballots {
            if !cast.insert((ballot.motion, ballot.member)) {
                return Err(invalid(format!(
                    "{} has two ballots on {}",
                    ballot.member, ballot.motion
                )));
            }
            ballot
                .validate()
                .map_err(|e| invalid(format!("ballot of {}: {}", ballot.member, e)))?;
        }

        let mut present = HashSet::new();
        for row in &self.attendance {
            if !present.insert((row.meeting, row.member)) {
                return Err(invalid(format!(
                    "{} has two attendance rows in {}",
                    row.member, row.meeting
                )));
            }
        }

        for meeting in &meetings {
            let active: Vec<&ProxyDelegation> = self
                .delegations
                .iter()
                .filter(|d| d.meeting == *meeting && d.is_active())
                .collect();
            let book = DelegationBook::new(*meeting, active.iter().copied());
            if book.len() != active.len() {
                return Err(invalid(format!(
                    "a giver holds two active delegations in {}",
                    meeting
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> SnapshotError {
    SnapshotError::Invalid(message)
}

fn unique(ids: impl Iterator<Item = u64>, kind: &str) -> Result<(), SnapshotError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(invalid(format!("duplicate {} #{}", kind, id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_domain::{MotionId, TenantId, VoteChoice};
    use chrono::Utc;

    fn meeting() -> Meeting {
        Meeting::new(MeetingId::new(1), TenantId::new(1), "AGM")
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let snapshot = StoreSnapshot::from_json(r#"{"version": 1}"#).unwrap();
        assert!(snapshot.meetings.is_empty());
        assert!(snapshot.delegations.is_empty());
    }

    #[test]
    fn test_future_version_rejected() {
        let err = StoreSnapshot::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_duplicate_ballot_rejected() {
        let ballot = Ballot::direct(
            MotionId::new(1),
            MemberId::new(1),
            VoteChoice::For,
            1.0,
            PresenceMode::Present,
            Utc::now(),
        );
        let snapshot = StoreSnapshot {
            ballots: vec![ballot.clone(), ballot],
            ..StoreSnapshot::default()
        };
        assert!(matches!(snapshot.validate(), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn test_motion_of_unknown_meeting_rejected() {
        let snapshot = StoreSnapshot {
            motions: vec![Motion::new(MotionId::new(1), MeetingId::new(5), "Orphan")],
            ..StoreSnapshot::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("meeting#5"));
    }

    #[test]
    fn test_two_active_delegations_rejected() {
        let now = Utc::now();
        let snapshot = StoreSnapshot {
            meetings: vec![meeting()],
            delegations: vec![
                ProxyDelegation::new(MeetingId::new(1), MemberId::new(1), MemberId::new(2), now),
                ProxyDelegation::new(MeetingId::new(1), MemberId::new(1), MemberId::new(3), now),
            ],
            ..StoreSnapshot::default()
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("assembly.json");
        let snapshot = StoreSnapshot {
            meetings: vec![meeting().with_president("Chair")],
            ..StoreSnapshot::default()
        };
        snapshot.save(&path).unwrap();

        let loaded = StoreSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = StoreSnapshot::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, StoreSnapshot::default());
    }
}
