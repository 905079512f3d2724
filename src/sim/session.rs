/// Session: one player exploring one maze.
///
/// Processing order for every action:
///   1. Movement / navigation resolution
///   2. Dead-end classification
///   3. Reveal from the player (skipped while the navigation cursor is out)
///   4. Completion check
///
/// While navigating, the player stays at the anchor and a free cursor moves
/// instead; the cursor ignores walls and fog. Leaving navigation draws the
/// path anchor -> cursor.

use crate::config::ExploreConfig;
use crate::domain::direction::{Direction, Position};
use crate::error::Result;
use super::dead_end;
use super::event::MazeEvent;
use super::maze::Maze;
use super::navigation;
use super::visibility;

/// Every generated maze has a room here.
pub const START: Position = Position::new(1, 1);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    /// One cell.
    Step(Direction),
    /// Two cells; in normal mode both cells must be open.
    Leap(Direction),
    /// Enter navigation, or leave it and draw the path to the cursor.
    ToggleNavigate,
    /// Enter navigation, or leave it and move the player to the cursor.
    Teleport,
    /// Explore everything. Disqualifies the session.
    RevealAll,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    InProgress,
    Won,
}

pub struct Session {
    maze: Maze,
    player: Position,
    cursor: Option<Position>,
    explore: ExploreConfig,
    disqualified: bool,
    completed: bool,
}

impl Session {
    /// Place the player at `START` and reveal around it.
    pub fn new(mut maze: Maze, explore: ExploreConfig) -> Result<Self> {
        visibility::reveal_with_hops(&mut maze, START, explore.dead_chain_hops)?;
        Ok(Session {
            maze,
            player: START,
            cursor: None,
            explore,
            disqualified: false,
            completed: false,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn maze_mut(&mut self) -> &mut Maze {
        &mut self.maze
    }

    pub fn player(&self) -> Position {
        self.player
    }

    /// Navigation cursor, if navigating.
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    /// Where the camera should look.
    pub fn focus(&self) -> Position {
        self.cursor.unwrap_or(self.player)
    }

    pub fn is_disqualified(&self) -> bool {
        self.disqualified
    }

    pub fn outcome(&self) -> Outcome {
        if self.completed { Outcome::Won } else { Outcome::InProgress }
    }

    pub fn apply(&mut self, action: Action) -> Result<Vec<MazeEvent>> {
        let mut events = Vec::new();

        match action {
            Action::Step(dir) => self.resolve_move(dir, 1)?,
            Action::Leap(dir) => self.resolve_move(dir, 2)?,
            Action::ToggleNavigate => self.resolve_navigate(&mut events)?,
            Action::Teleport => self.resolve_teleport(&mut events)?,
            Action::RevealAll => {
                self.maze.reveal_all();
                self.disqualified = true;
                events.push(MazeEvent::RevealedAll);
            }
        }

        dead_end::classify_passes(&mut self.maze, self.explore.classify_passes)?;
        if self.cursor.is_none() {
            visibility::reveal_with_hops(&mut self.maze, self.player, self.explore.dead_chain_hops)?;
        }
        self.resolve_completion(&mut events);

        Ok(events)
    }

    // ── Resolution steps ──

    fn resolve_move(&mut self, dir: Direction, distance: usize) -> Result<()> {
        let (w, h) = (self.maze.width(), self.maze.height());

        if let Some(cursor) = self.cursor {
            if let Some(next) = cursor.offset(dir, distance, w, h) {
                self.cursor = Some(next);
            }
            return Ok(());
        }

        let target = match self.player.offset(dir, distance, w, h) {
            Some(t) => t,
            None => return Ok(()),
        };
        // every cell passed through must be open
        for d in 1..=distance {
            if let Some(p) = self.player.offset(dir, d, w, h) {
                if self.maze.is_wall(p.x, p.y)? {
                    return Ok(());
                }
            }
        }
        self.player = target;
        Ok(())
    }

    fn resolve_navigate(&mut self, events: &mut Vec<MazeEvent>) -> Result<()> {
        match self.cursor.take() {
            None => {
                self.cursor = Some(self.player);
                events.push(MazeEvent::NavigationStarted { anchor: self.player });
            }
            Some(cursor) => {
                if navigation::find_path(&mut self.maze, self.player, cursor)? {
                    events.push(MazeEvent::PathShown { to: cursor });
                } else {
                    events.push(MazeEvent::PathUnavailable { to: cursor });
                }
            }
        }
        Ok(())
    }

    fn resolve_teleport(&mut self, events: &mut Vec<MazeEvent>) -> Result<()> {
        let cursor = match self.cursor.take() {
            Some(c) => c,
            None => {
                self.cursor = Some(self.player);
                events.push(MazeEvent::NavigationStarted { anchor: self.player });
                return Ok(());
            }
        };

        let reachable = !self.maze.is_wall(cursor.x, cursor.y)? && self.maze.is_explored(cursor.x, cursor.y)?;
        if !reachable {
            events.push(MazeEvent::NavigationCancelled);
            return Ok(());
        }

        if navigation::find_path(&mut self.maze, self.player, cursor)? {
            events.push(MazeEvent::PathShown { to: cursor });
        }
        self.player = cursor;
        events.push(MazeEvent::Teleported { to: cursor });
        Ok(())
    }

    fn resolve_completion(&mut self, events: &mut Vec<MazeEvent>) {
        if self.completed || self.disqualified {
            return;
        }
        if self.maze.playable_area_explored() {
            self.completed = true;
            events.push(MazeEvent::Completed);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
