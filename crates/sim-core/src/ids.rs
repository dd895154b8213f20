//! Closed identifier sets and the per-agent value mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the four competing agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AiId {
    /// The human-controlled AI.
    Player,
    Rival1,
    Rival2,
    Rival3,
}

impl AiId {
    /// All agents in slot order.
    pub const ALL: [AiId; 4] = [AiId::Player, AiId::Rival1, AiId::Rival2, AiId::Rival3];

    /// Slot of this agent inside a [`PerAgent`] mapping.
    pub const fn index(self) -> usize {
        match self {
            AiId::Player => 0,
            AiId::Rival1 => 1,
            AiId::Rival2 => 2,
            AiId::Rival3 => 3,
        }
    }

    pub const fn is_player(self) -> bool {
        matches!(self, AiId::Player)
    }
}

impl fmt::Display for AiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AiId::Player => "Player",
            AiId::Rival1 => "Rival1",
            AiId::Rival2 => "Rival2",
            AiId::Rival3 => "Rival3",
        };
        f.write_str(name)
    }
}

/// Countries (or blocs) the agents compete in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CountryId {
    Usa,
    Eu,
    China,
    India,
    AfricaUnion,
    SouthAmerica,
    MiddleEast,
    Other,
}

impl CountryId {
    pub const ALL: [CountryId; 8] = [
        CountryId::Usa,
        CountryId::Eu,
        CountryId::China,
        CountryId::India,
        CountryId::AfricaUnion,
        CountryId::SouthAmerica,
        CountryId::MiddleEast,
        CountryId::Other,
    ];

    /// Key countries decide the access-ban defeat condition.
    pub const fn is_key(self) -> bool {
        !matches!(self, CountryId::Other)
    }

    /// Short uppercase code used in event ids and logs.
    pub const fn code(self) -> &'static str {
        match self {
            CountryId::Usa => "USA",
            CountryId::Eu => "EU",
            CountryId::China => "CHINA",
            CountryId::India => "INDIA",
            CountryId::AfricaUnion => "AFRICA_UNION",
            CountryId::SouthAmerica => "SOUTH_AMERICA",
            CountryId::MiddleEast => "MIDDLE_EAST",
            CountryId::Other => "OTHER",
        }
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Categories of national issues. A country holds at most one record per type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Economy,
    Health,
    Environment,
    Security,
    SocialUnrest,
    Energy,
}

impl IssueType {
    pub const ALL: [IssueType; 6] = [
        IssueType::Economy,
        IssueType::Health,
        IssueType::Environment,
        IssueType::Security,
        IssueType::SocialUnrest,
        IssueType::Energy,
    ];
}

/// Per-country permission state of an agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    Banned,
    Restricted,
    #[default]
    Allowed,
    Preferred,
}

/// Fixed mapping from every [`AiId`] to a value.
///
/// Systems iterate it uniformly instead of branching on the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerAgent<T>([T; 4]);

impl<T> PerAgent<T> {
    /// Values in [`AiId::ALL`] order.
    pub const fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    pub fn from_fn(mut f: impl FnMut(AiId) -> T) -> Self {
        Self([
            f(AiId::Player),
            f(AiId::Rival1),
            f(AiId::Rival2),
            f(AiId::Rival3),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = (AiId, &T)> + '_ {
        AiId::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AiId, &mut T)> + '_ {
        AiId::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }
}

impl<T> Index<AiId> for PerAgent<T> {
    type Output = T;

    fn index(&self, ai: AiId) -> &T {
        &self.0[ai.index()]
    }
}

impl<T> IndexMut<AiId> for PerAgent<T> {
    fn index_mut(&mut self, ai: AiId) -> &mut T {
        &mut self.0[ai.index()]
    }
}
