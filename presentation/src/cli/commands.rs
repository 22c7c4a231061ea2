//! CLI command definitions

use assembly_domain::{MeetingStatus, PresenceMode, VoteChoice};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored console report
    Full,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for assembly-vote
#[derive(Parser, Debug)]
#[command(name = "assembly-vote")]
#[command(author, version, about = "Vote resolution and quorum decisions for general assemblies")]
#[command(long_about = r#"
assembly-vote records ballots and proxy delegations for the motions of a
meeting, then computes quorum, majority and the official decision of each
motion.

State is kept in a JSON snapshot (--store, or [store] snapshot_path) that is
loaded at start and saved after every command that changes it.

Configuration files are loaded from (in priority order):
1. ASSEMBLY_* environment variables (e.g. ASSEMBLY_PROXY__MAX_PER_RECEIVER=2)
2. --config <path>       Explicit config file
3. ./assembly.toml       Project-level config
4. ~/.config/assembly-vote/config.toml   Global config

Example:
  assembly-vote attend 1 7 present
  assembly-vote cast 12 7 for
  assembly-vote cast 12 9 against --proxy-voter 7
  assembly-vote close-motion 12
  assembly-vote readiness 1
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (defaults to [output] format, then full)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Snapshot file holding the engine state (overrides [store] snapshot_path)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Cast or replace a ballot on an open motion
    Cast(CastArgs),

    /// Record how a member attends a meeting
    Attend {
        meeting: u64,
        member: u64,
        /// present, remote or proxy
        mode: PresenceMode,
    },

    /// Mark a member as absent from a meeting
    Leave { meeting: u64, member: u64 },

    /// Delegate a member's vote to another member for one meeting
    Delegate {
        meeting: u64,
        giver: u64,
        receiver: u64,
    },

    /// Revoke a member's active delegation
    Revoke { meeting: u64, giver: u64 },

    /// List the delegations of a meeting, revoked ones included
    Delegations { meeting: u64 },

    /// Compute the (provisional or final) result of a motion
    Result { motion: u64 },

    /// Write the official result of a closed motion
    Consolidate { motion: u64 },

    /// Write the official results of every closed motion of a meeting
    ConsolidateMeeting { meeting: u64 },

    /// Check whether a meeting can be validated
    Readiness { meeting: u64 },

    /// Open a motion for voting
    OpenMotion { motion: u64 },

    /// Close a motion (and consolidate it unless disabled in config)
    CloseMotion { motion: u64 },

    /// Record or clear the secretary's hand count of a motion
    ManualTally(ManualTallyArgs),

    /// Move a meeting to its next status
    AdvanceMeeting {
        meeting: u64,
        /// draft, scheduled, live, closed, validated or archived
        status: MeetingStatus,
    },

    /// Record the name of the meeting's president
    President { meeting: u64, name: String },

    /// Show configuration file locations and the effective configuration
    ShowConfig,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CastArgs {
    pub motion: u64,
    /// Member whose vote is cast (the delegating member for a proxy ballot)
    pub member: u64,
    /// for, against, abstain or no_opinion
    pub choice: VoteChoice,
    /// Present member casting the ballot on the member's behalf
    #[arg(long, value_name = "MEMBER")]
    pub proxy_voter: Option<u64>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ManualTallyArgs {
    pub motion: u64,
    /// Ballots counted
    #[arg(long, required_unless_present = "clear")]
    pub total: Option<u64>,
    #[arg(long = "for", default_value_t = 0)]
    pub for_votes: u64,
    #[arg(long, default_value_t = 0)]
    pub against: u64,
    #[arg(long, default_value_t = 0)]
    pub abstain: u64,
    /// Remove the recorded tally
    #[arg(long, conflicts_with = "total")]
    pub clear: bool,
}

impl Command {
    /// Commands that change the stored state
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::Delegations { .. }
                | Command::Result { .. }
                | Command::Readiness { .. }
                | Command::ShowConfig
        )
    }
}
