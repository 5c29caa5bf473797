use std::collections::VecDeque;

use super::geometry::next_position;
use super::types::{DeathReason, Direction, Position};

pub const INITIAL_SNAKE_LENGTH: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    /// Head first, tail last.
    pub body: VecDeque<Position>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
    pub death_reason: Option<DeathReason>,
    pub score: u32,
}

impl Snake {
    /// Lays `length` segments out behind `head`, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let behind = direction.opposite();
        let body = std::iter::successors(Some(head), |segment| Some(next_position(*segment, behind)))
            .take(length.max(1))
            .collect();

        Self {
            body,
            direction,
            pending_direction: None,
            death_reason: None,
            score: 0,
        }
    }

    /// Head first. `None` for an empty body, since a snake always has a head.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Position>,
        direction: Direction,
    ) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            body,
            direction,
            pending_direction: None,
            death_reason: None,
            score: 0,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.death_reason.is_none()
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn commit_direction(&mut self) {
        if let Some(new_direction) = self.pending_direction.take() {
            self.direction = new_direction;
        }
    }

    /// Cells the head must avoid this tick. The tail is left out unless the
    /// snake grows, because a non-growing snake vacates it in the same tick.
    pub fn self_hazard(&self, growing: bool) -> impl Iterator<Item = &Position> {
        let keep = if growing { self.body.len() } else { self.body.len().saturating_sub(1) };
        self.body.iter().take(keep)
    }

    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }
}
