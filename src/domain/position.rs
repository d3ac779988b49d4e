//! Position protocol for a user's ordered link list.
//!
//! Positions for one user always form the contiguous range `0..count`.
//! Every mutation moves the list from one such state to another inside a
//! single transaction:
//!
//! - **Insert** appends at `max_position + 1` and touches no other row.
//! - **Delete** removes the row at `p` and shifts every row above `p` down by one.
//! - **Swap** exchanges two neighbours, staging the moving link through
//!   [`SWAP_SENTINEL`] so `(user_id, position)` stays unique between statements.
//!
//! This module only decides *what* to write; the repository executes the
//! writes atomically.

/// Out-of-range position occupied by the moving link during a swap.
///
/// Two concurrent swaps for the same user both try to claim it, so the
/// loser is rejected by the uniqueness constraint instead of corrupting
/// the order.
pub const SWAP_SENTINEL: i32 = -1;

/// `max_position` reported for a user without links.
pub const EMPTY_MAX_POSITION: i32 = -1;

/// Position assigned to a newly created link.
pub fn next_position(max_position: i32) -> i32 {
    max_position + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The neighbouring position in this direction, or `None` when moving
    /// up from the top.
    pub fn target(self, position: i32) -> Option<i32> {
        let target = match self {
            Direction::Up => position - 1,
            Direction::Down => position + 1,
        };
        (target >= 0).then_some(target)
    }

    fn boundary(self) -> ReorderOutcome {
        match self {
            Direction::Up => ReorderOutcome::AlreadyAtTop,
            Direction::Down => ReorderOutcome::AlreadyAtBottom,
        }
    }
}

/// Result of a reorder request. Hitting either end of the list is a
/// structured no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Moved { from: i32, to: i32 },
    AlreadyAtTop,
    AlreadyAtBottom,
}

impl ReorderOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, ReorderOutcome::Moved { .. })
    }

    /// Reason string for the no-op variants.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ReorderOutcome::Moved { .. } => None,
            ReorderOutcome::AlreadyAtTop => Some("Already at top"),
            ReorderOutcome::AlreadyAtBottom => Some("Already at bottom"),
        }
    }
}

/// A single `UPDATE links SET position = to WHERE id = link_id AND position = expected`.
///
/// `expected` pins the row to the state the plan was computed from, so a
/// concurrent change turns into a zero-row update instead of a silent overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionWrite {
    pub link_id: String,
    pub expected: i32,
    pub to: i32,
}

/// Exchange of a link with its neighbour at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    pub moving_id: String,
    pub from: i32,
    pub displaced_id: String,
    pub target: i32,
}

impl SwapPlan {
    /// The three writes, in the order they must run inside one transaction:
    /// moving link to the sentinel, displaced link into the freed slot,
    /// moving link into the target slot.
    pub fn writes(&self) -> [PositionWrite; 3] {
        [
            PositionWrite {
                link_id: self.moving_id.clone(),
                expected: self.from,
                to: SWAP_SENTINEL,
            },
            PositionWrite {
                link_id: self.displaced_id.clone(),
                expected: self.target,
                to: self.from,
            },
            PositionWrite {
                link_id: self.moving_id.clone(),
                expected: SWAP_SENTINEL,
                to: self.target,
            },
        ]
    }

    pub fn outcome(&self) -> ReorderOutcome {
        ReorderOutcome::Moved {
            from: self.from,
            to: self.target,
        }
    }
}

/// Decides how to move the link `moving_id` at `from` one step in `direction`.
///
/// `neighbour` is the id of the link currently at the target position, as
/// returned by a lookup for `direction.target(from)`. Returns the boundary
/// outcome when there is nothing to swap with.
pub fn plan_swap(
    moving_id: &str,
    from: i32,
    direction: Direction,
    neighbour: Option<&str>,
) -> Result<SwapPlan, ReorderOutcome> {
    let target = direction.target(from).ok_or(direction.boundary())?;
    let displaced_id = neighbour.ok_or(direction.boundary())?;

    Ok(SwapPlan {
        moving_id: moving_id.to_string(),
        from,
        displaced_id: displaced_id.to_string(),
        target,
    })
}
