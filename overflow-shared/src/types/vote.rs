use serde::{Deserialize, Serialize};

use crate::types::ConversionError;

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl Direction {
    /// Maps the `down` flag of a cast request to a direction.
    pub fn from_is_down(is_down: bool) -> Self {
        if is_down { Direction::Down } else { Direction::Up }
    }

    /// Maps the `was_up` flag of a retract request to a direction.
    pub fn from_was_up(was_up: bool) -> Self {
        if was_up { Direction::Up } else { Direction::Down }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl From<Direction> for i16 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => 0,
            Direction::Down => 1,
        }
    }
}

impl TryFrom<i16> for Direction {
    type Error = ConversionError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            other => Err(ConversionError::InvalidDirection(other)),
        }
    }
}

/// The vote a user currently holds on one votable entity.
///
/// Materialised as membership in the user's `upvoted` / `downvoted` sets;
/// `Unvoted` means the entity is in neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    #[default]
    #[serde(rename = "none")]
    Unvoted,
    Up,
    Down,
}

impl VoteState {
    pub fn direction(self) -> Option<Direction> {
        match self {
            VoteState::Unvoted => None,
            VoteState::Up => Some(Direction::Up),
            VoteState::Down => Some(Direction::Down),
        }
    }

    /// Contribution of this state to the entity's vote count.
    pub fn weight(self) -> i64 {
        match self {
            VoteState::Unvoted => 0,
            VoteState::Up => 1,
            VoteState::Down => -1,
        }
    }
}

impl From<Direction> for VoteState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteState::Up,
            Direction::Down => VoteState::Down,
        }
    }
}

impl From<Option<Direction>> for VoteState {
    fn from(direction: Option<Direction>) -> Self {
        direction.map(VoteState::from).unwrap_or_default()
    }
}

/// A transition requested by a client.
///
/// Each intent names the state it expects to start from; the server checks that
/// expectation against its own record before applying anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteIntent {
    /// First vote on the entity. Valid only from `Unvoted`.
    Cast(Direction),
    /// Withdraw the vote in the given direction. Valid only from that direction.
    Retract(Direction),
    /// Flip to the given direction. Valid only from the opposite direction.
    Switch(Direction),
}

impl VoteIntent {
    pub fn expected_state(&self) -> VoteState {
        match *self {
            VoteIntent::Cast(_) => VoteState::Unvoted,
            VoteIntent::Retract(direction) => direction.into(),
            VoteIntent::Switch(direction) => direction.opposite().into(),
        }
    }

    pub fn target_state(&self) -> VoteState {
        match *self {
            VoteIntent::Cast(direction) | VoteIntent::Switch(direction) => direction.into(),
            VoteIntent::Retract(_) => VoteState::Unvoted,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VoteIntent::Cast(_) => "cast",
            VoteIntent::Retract(_) => "retract",
            VoteIntent::Switch(_) => "switch",
        }
    }
}

/// A planned move between two vote states for a single (user, entity) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: VoteState,
    pub to: VoteState,
}

impl Transition {
    /// Adjustment to apply to the entity's vote count.
    ///
    /// Cast and retract move the count by one; a switch removes the old vote's
    /// effect and applies the new one, which moves it by two.
    pub fn delta(&self) -> i64 {
        self.to.weight() - self.from.weight()
    }
}
