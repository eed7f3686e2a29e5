//! Grid coordinates and the four cardinal moves.

use std::{fmt, ops::Add};

use serde::{Deserialize, Serialize};

/// A cell on the square grid.
///
/// Coordinates are signed so that `head + action` can step off the grid;
/// callers check [`Position::is_within`] before indexing a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie in `[0, grid_size)`.
    pub fn is_within(&self, grid_size: usize) -> bool {
        let limit = i64::try_from(grid_size).unwrap_or(i64::MAX);
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x >= 0 && x < limit && y >= 0 && y < limit
    }

    /// Euclidean distance to another cell.
    pub fn distance(&self, other: Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// The cell one move away, or `None` when a coordinate would overflow.
    pub fn checked_step(self, action: Action) -> Option<Position> {
        let (dx, dy) = action.delta();
        Some(Position::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl Add<Action> for Position {
    type Output = Position;

    fn add(self, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit moves.
///
/// The declaration order is the tie-breaking order used by greedy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in enumeration order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Unit vector of the move. Screen coordinates: `Up` decreases `y`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Position in [`Action::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(name)
    }
}

/// One tick of experience: `(state, action, reward, next_state)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Position,
    pub action: Action,
    pub reward: f64,
    pub next_state: Position,
}
