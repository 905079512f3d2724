/// Events emitted by a session action.
/// The presentation layer consumes these for status messages and logging.

use crate::domain::direction::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeEvent {
    NavigationStarted { anchor: Position },
    NavigationCancelled,
    PathShown { to: Position },
    PathUnavailable { to: Position },
    Teleported { to: Position },
    RevealedAll,
    Completed,
}
