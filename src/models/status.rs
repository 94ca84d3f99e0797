use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Lifecycle status of a BRD.
///
/// Declaration order is the valid transition chain: a BRD moves from one
/// status to the next one in this list and every measured transition is an
/// adjacent pair.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum BrdStatus {
    #[strum(to_string = "Draft")]
    Draft,

    #[serde(rename = "In Progress")]
    #[strum(to_string = "In Progress", serialize = "in_progress", serialize = "InProgress")]
    InProgress,

    #[serde(rename = "Edit Complete")]
    #[strum(to_string = "Edit Complete", serialize = "edit_complete", serialize = "EditComplete")]
    EditComplete,

    #[serde(rename = "Internal Review")]
    #[strum(
        to_string = "Internal Review",
        serialize = "internal_review",
        serialize = "InternalReview"
    )]
    InternalReview,

    #[strum(to_string = "Reviewed")]
    Reviewed,

    #[serde(rename = "Ready for Sign-off")]
    #[strum(
        to_string = "Ready for Sign-off",
        serialize = "ready_for_signoff",
        serialize = "ReadyForSignoff"
    )]
    ReadyForSignoff,

    #[serde(rename = "Signed Off")]
    #[strum(to_string = "Signed Off", serialize = "signed_off", serialize = "SignedOff")]
    SignedOff,

    #[strum(to_string = "Submitted")]
    Submitted,
}

impl BrdStatus {
    /// Position of the status in the transition chain
    pub fn chain_index(&self) -> usize {
        *self as usize
    }

    /// Whether the status belongs to the `open` family
    pub fn is_open(&self) -> bool {
        !matches!(self, BrdStatus::SignedOff | BrdStatus::Submitted)
    }

    /// Statuses of the `open` family, in chain order
    pub fn open_statuses() -> impl Iterator<Item = BrdStatus> {
        BrdStatus::iter().filter(BrdStatus::is_open)
    }
}

/// One of the legal status-to-status moves along the chain.
///
/// Serialized as `"<from> -> <to>"`, which is also the key used in
/// per-period average maps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
pub enum TransitionType {
    #[serde(rename = "Draft -> In Progress")]
    #[strum(to_string = "Draft -> In Progress")]
    DraftToInProgress,

    #[serde(rename = "In Progress -> Edit Complete")]
    #[strum(to_string = "In Progress -> Edit Complete")]
    InProgressToEditComplete,

    #[serde(rename = "Edit Complete -> Internal Review")]
    #[strum(to_string = "Edit Complete -> Internal Review")]
    EditCompleteToInternalReview,

    #[serde(rename = "Internal Review -> Reviewed")]
    #[strum(to_string = "Internal Review -> Reviewed")]
    InternalReviewToReviewed,

    #[serde(rename = "Reviewed -> Ready for Sign-off")]
    #[strum(to_string = "Reviewed -> Ready for Sign-off")]
    ReviewedToReadyForSignoff,

    #[serde(rename = "Ready for Sign-off -> Signed Off")]
    #[strum(to_string = "Ready for Sign-off -> Signed Off")]
    ReadyForSignoffToSignedOff,

    #[serde(rename = "Signed Off -> Submitted")]
    #[strum(to_string = "Signed Off -> Submitted")]
    SignedOffToSubmitted,
}

impl TransitionType {
    /// Resolve the transition between two statuses.
    ///
    /// Returns `None` unless `to` directly follows `from` in the chain.
    pub fn between(from: BrdStatus, to: BrdStatus) -> Option<Self> {
        if to.chain_index() != from.chain_index() + 1 {
            return None;
        }
        TransitionType::iter().nth(from.chain_index())
    }

    /// Source status of the transition
    pub fn from_status(&self) -> BrdStatus {
        BrdStatus::iter()
            .nth(self.index())
            .unwrap_or(BrdStatus::Draft)
    }

    /// Target status of the transition
    pub fn to_status(&self) -> BrdStatus {
        BrdStatus::iter()
            .nth(self.index() + 1)
            .unwrap_or(BrdStatus::Submitted)
    }

    /// Dense index, usable for fixed-size accumulators
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Adjacency predicate over the transition chain
pub fn is_valid_transition(from: BrdStatus, to: BrdStatus) -> bool {
    TransitionType::between(from, to).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_chain_has_eight_statuses_and_seven_transitions() {
        assert_eq!(BrdStatus::COUNT, 8);
        assert_eq!(TransitionType::COUNT, 7);
        assert_eq!(TransitionType::COUNT, BrdStatus::COUNT - 1);
    }

    #[test]
    fn test_adjacent_pairs_are_valid() {
        let statuses: Vec<_> = BrdStatus::iter().collect();
        for pair in statuses.windows(2) {
            assert!(is_valid_transition(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_skips_and_backward_moves_are_invalid() {
        assert!(!is_valid_transition(BrdStatus::Draft, BrdStatus::EditComplete));
        assert!(!is_valid_transition(BrdStatus::InProgress, BrdStatus::Draft));
        assert!(!is_valid_transition(BrdStatus::Draft, BrdStatus::Draft));
        assert!(!is_valid_transition(BrdStatus::Submitted, BrdStatus::Draft));
    }

    #[test]
    fn test_transition_endpoints() {
        for transition in TransitionType::iter() {
            assert_eq!(
                TransitionType::between(transition.from_status(), transition.to_status()),
                Some(transition)
            );
        }
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(BrdStatus::from_str("in progress").unwrap(), BrdStatus::InProgress);
        assert_eq!(BrdStatus::from_str("EDIT COMPLETE").unwrap(), BrdStatus::EditComplete);
        assert_eq!(BrdStatus::from_str("signed_off").unwrap(), BrdStatus::SignedOff);
        assert!(BrdStatus::from_str("Archived").is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(BrdStatus::ReadyForSignoff.to_string(), "Ready for Sign-off");
        assert_eq!(
            TransitionType::DraftToInProgress.to_string(),
            "Draft -> In Progress"
        );
        let json = serde_json::to_string(&BrdStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }

    #[test]
    fn test_open_family() {
        let open: Vec<_> = BrdStatus::open_statuses().collect();
        assert_eq!(open.len(), 6);
        assert!(!open.contains(&BrdStatus::Submitted));
        assert!(!open.contains(&BrdStatus::SignedOff));
    }
}
