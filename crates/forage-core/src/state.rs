//! World snapshots handed to the learner by the environment

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{ForageError, Result};
use crate::grid::{Grid, Position};

/// An adversary as seen in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ghost {
    /// Grid cell the adversary occupies
    pub position: Position,

    /// Remaining steps during which the adversary can be eaten (0 = threatening)
    pub scared_timer: u32,
}

impl Ghost {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            scared_timer: 0,
        }
    }

    pub fn scared(position: Position, scared_timer: u32) -> Self {
        Self {
            position,
            scared_timer,
        }
    }

    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Immutable snapshot of the world at one step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Cell the learning agent occupies
    pub agent: Position,

    /// Cells holding food
    pub food: Grid,

    /// Impassable cells
    pub walls: Grid,

    /// Capsule cells
    pub capsules: Vec<Position>,

    /// Adversaries, in the order the environment reports them
    pub ghosts: Vec<Ghost>,

    /// Whether the episode has ended in this snapshot
    pub terminal: bool,
}

impl GameState {
    /// Create a snapshot without capsules or adversaries
    pub fn new(agent: Position, food: Grid, walls: Grid) -> Result<Self> {
        if food.width() != walls.width() || food.height() != walls.height() {
            return Err(ForageError::Grid(format!(
                "food grid is {}x{} but wall grid is {}x{}",
                food.width(),
                food.height(),
                walls.width(),
                walls.height()
            )));
        }
        if !walls.contains(agent) || walls.get(agent) {
            return Err(ForageError::Grid(format!(
                "agent position {agent} is not an open cell"
            )));
        }
        Ok(Self {
            agent,
            food,
            walls,
            capsules: Vec::new(),
            ghosts: Vec::new(),
            terminal: false,
        })
    }

    /// Parse a text layout.
    ///
    /// The first line is the northern edge. `%` is a wall, `.` food,
    /// `o` a capsule, `P` the agent, `G` a threatening adversary and
    /// `S` a scared one (timer given by `scared_timer`).
    pub fn from_layout(layout: &str, scared_timer: u32) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        // Spaces are open cells, so only blank lines around the layout are dropped
        let first = lines.iter().position(|line| !line.is_empty());
        let last = lines.iter().rposition(|line| !line.is_empty());
        let rows = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => &lines[..0],
        };
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if height == 0 || width == 0 {
            return Err(ForageError::Grid("empty layout".to_string()));
        }

        let mut food = Grid::new(width, height);
        let mut walls = Grid::new(width, height);
        let mut capsules = Vec::new();
        let mut ghosts = Vec::new();
        let mut agent = None;

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(ForageError::Grid(format!(
                    "layout row {row} has {} columns, expected {width}",
                    line.chars().count()
                )));
            }
            let y = (height - 1 - row) as i32;
            for (x, ch) in line.chars().enumerate() {
                let pos = Position::new(x as i32, y);
                match ch {
                    '%' => walls.set(pos, true)?,
                    '.' => food.set(pos, true)?,
                    'o' => capsules.push(pos),
                    'P' => agent = Some(pos),
                    'G' => ghosts.push(Ghost::new(pos)),
                    'S' => ghosts.push(Ghost::scared(pos, scared_timer)),
                    ' ' => {}
                    other => {
                        return Err(ForageError::Grid(format!(
                            "unexpected layout character {other:?} at {pos}"
                        )))
                    }
                }
            }
        }

        let agent = agent.ok_or_else(|| ForageError::Grid("layout has no agent".to_string()))?;
        let mut state = Self::new(agent, food, walls)?;
        state.capsules = capsules;
        state.ghosts = ghosts;
        Ok(state)
    }

    pub fn with_capsules(mut self, capsules: Vec<Position>) -> Self {
        self.capsules = capsules;
        self
    }

    pub fn with_ghosts(mut self, ghosts: Vec<Ghost>) -> Self {
        self.ghosts = ghosts;
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Actions the agent may take; empty once the episode is over
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.terminal {
            return Vec::new();
        }
        Action::ALL
            .iter()
            .copied()
            .filter(|&action| {
                let next = self.agent.step(action);
                self.walls.contains(next) && !self.walls.get(next)
            })
            .collect()
    }

    /// Adversaries that can currently be eaten
    pub fn scared_ghosts(&self) -> Vec<&Ghost> {
        self.ghosts.iter().filter(|g| g.is_scared()).collect()
    }

    /// Adversaries that are currently dangerous
    pub fn threatening_ghosts(&self) -> Vec<&Ghost> {
        self.ghosts.iter().filter(|g| !g.is_scared()).collect()
    }
}
