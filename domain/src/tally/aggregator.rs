//! Tally aggregation
//!
//! Groups the ballots of one motion by choice. This is a pure read: it is
//! safe on open motions (live dashboards) as well as closed ones.

use crate::ballot::{Ballot, PresenceMode, VoteChoice};
use crate::motion::ManualTally;
use serde::{Deserialize, Serialize};

/// Ballot count and summed weight for one choice
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub count: u64,
    pub weight: f64,
}

impl ChoiceTally {
    fn add(&mut self, weight: f64) {
        self.count += 1;
        self.weight += weight;
    }
}

/// Members and weight taking part
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Participation {
    pub members: u64,
    pub weight: f64,
}

impl Participation {
    pub fn new(members: u64, weight: f64) -> Self {
        Self { members, weight }
    }

    fn add(&mut self, other: Participation) {
        self.members += other.members;
        self.weight += other.weight;
    }

    pub fn is_empty(&self) -> bool {
        self.members == 0
    }
}

/// Expressed participation split by the mode ballots were cast under
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PresenceBreakdown {
    pub present: Participation,
    pub remote: Participation,
    pub proxy: Participation,
}

impl PresenceBreakdown {
    fn slot(&mut self, mode: PresenceMode) -> &mut Participation {
        match mode {
            PresenceMode::Present => &mut self.present,
            PresenceMode::Remote => &mut self.remote,
            PresenceMode::Proxy => &mut self.proxy,
        }
    }

    /// In-room participation plus the optional remote and proxy shares
    pub fn counted(&self, include_remote: bool, include_proxy: bool) -> Participation {
        let mut total = self.present;
        if include_remote {
            total.add(self.remote);
        }
        if include_proxy {
            total.add(self.proxy);
        }
        total
    }
}

/// Per-choice totals of one motion
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionTally {
    #[serde(rename = "for")]
    pub for_votes: ChoiceTally,
    pub against: ChoiceTally,
    pub abstain: ChoiceTally,
    pub no_opinion: ChoiceTally,
    /// for + against + abstain
    pub expressed: Participation,
    pub by_presence: PresenceBreakdown,
}

impl MotionTally {
    pub fn choice(&self, choice: VoteChoice) -> ChoiceTally {
        match choice {
            VoteChoice::For => self.for_votes,
            VoteChoice::Against => self.against,
            VoteChoice::Abstain => self.abstain,
            VoteChoice::NoOpinion => self.no_opinion,
        }
    }

    fn choice_mut(&mut self, choice: VoteChoice) -> &mut ChoiceTally {
        match choice {
            VoteChoice::For => &mut self.for_votes,
            VoteChoice::Against => &mut self.against,
            VoteChoice::Abstain => &mut self.abstain,
            VoteChoice::NoOpinion => &mut self.no_opinion,
        }
    }

    /// Number of ballot rows aggregated
    pub fn total_ballots(&self) -> u64 {
        VoteChoice::ALL.iter().map(|c| self.choice(*c).count).sum()
    }

    pub fn has_expressed(&self) -> bool {
        !self.expressed.is_empty()
    }

    /// Figures of a consistent manual count
    ///
    /// Manual entry does not track voters, so each vote counts with weight 1,
    /// the expressed head count is approximated by the total, and everything
    /// is attributed to in-room presence.
    pub fn from_manual(tally: &ManualTally) -> Self {
        let figure = |n: u64| ChoiceTally {
            count: n,
            weight: n as f64,
        };
        let expressed = Participation::new(tally.total, tally.total as f64);
        Self {
            for_votes: figure(tally.for_votes),
            against: figure(tally.against),
            abstain: figure(tally.abstain),
            no_opinion: ChoiceTally::default(),
            expressed,
            by_presence: PresenceBreakdown {
                present: expressed,
                ..PresenceBreakdown::default()
            },
        }
    }
}

/// Groups ballots by choice
pub struct TallyAggregator;

impl TallyAggregator {
    pub fn aggregate<'a>(ballots: impl IntoIterator<Item = &'a Ballot>) -> MotionTally {
        let mut tally = MotionTally::default();
        for ballot in ballots {
            let weight = if ballot.weight.is_finite() && ballot.weight > 0.0 {
                ballot.weight
            } else {
                0.0
            };
            tally.choice_mut(ballot.choice).add(weight);
            if ballot.choice.is_expressed() {
                let share = Participation::new(1, weight);
                tally.expressed.add(share);
                tally.by_presence.slot(ballot.presence).add(share);
            }
        }
        tally
    }
}
