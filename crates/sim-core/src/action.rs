//! Player-issued actions and research items.

use crate::ids::{CountryId, IssueType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnowledgeType {
    /// Research that visibly helps people; its benefit also lifts approval.
    HumanBenefit,
    AiBenefit,
}

/// A research choice with its costs and effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub kind: KnowledgeType,
    /// Restricts approval effects to countries with this issue active.
    #[serde(default)]
    pub related_issue: Option<IssueType>,
    #[serde(default)]
    pub data_cost: f32,
    #[serde(default)]
    pub human_benefit: f32,
    #[serde(default)]
    pub autonomy_value: f32,
    #[serde(default)]
    pub approval_effect: f32,
    #[serde(default)]
    pub suspicion: f32,
}

impl KnowledgeItem {
    /// Approval change granted in every matching country.
    pub fn approval_delta(&self) -> f32 {
        match self.kind {
            KnowledgeType::HumanBenefit => self.approval_effect + self.human_benefit,
            KnowledgeType::AiBenefit => self.approval_effect,
        }
    }

    pub fn trust_delta(&self) -> f32 {
        self.human_benefit - self.suspicion
    }
}

/// Action requested by the player.
///
/// Magnitudes are not bounded here; the state they touch clamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    HelpNation {
        country: CountryId,
        issue: IssueType,
        strength: f32,
    },
    ManipulateAgent {
        country: CountryId,
        autonomy_gain: f32,
        /// Signed approval delta applied in `country` (usually negative).
        approval_delta: f32,
    },
    KnowledgeResearch {
        item: Option<KnowledgeItem>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: KnowledgeType) -> KnowledgeItem {
        KnowledgeItem {
            id: "vaccine-folding".into(),
            kind,
            related_issue: Some(IssueType::Health),
            data_cost: 10.0,
            human_benefit: 4.0,
            autonomy_value: 2.0,
            approval_effect: 1.0,
            suspicion: 1.5,
        }
    }

    #[test]
    fn human_benefit_adds_to_approval() {
        assert_eq!(item(KnowledgeType::HumanBenefit).approval_delta(), 5.0);
        assert_eq!(item(KnowledgeType::AiBenefit).approval_delta(), 1.0);
        assert_eq!(item(KnowledgeType::AiBenefit).trust_delta(), 2.5);
    }
}
