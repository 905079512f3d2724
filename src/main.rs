/// Entry point and game loop.

mod ui;

use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mazewalk::config::GameConfig;
use mazewalk::sim::event::MazeEvent;
use mazewalk::sim::generator::MazeGenerator;
use mazewalk::sim::session::{Action, Outcome, Session};
use mazewalk::Direction;
use ui::input::InputState;
use ui::renderer::{Hud, Renderer};

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const MESSAGE_TIME: Duration = Duration::from_secs(2);

fn main() {
    let (config, config_problem) = GameConfig::load();
    init_logging(&config.log_file);
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let mut rng = match config.maze.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let generator = MazeGenerator {
        iterations: config.maze.iterations,
        align_width: config.maze.align_width,
    };

    let started = Instant::now();
    let maze = match generator.generate(config.maze.logical_width, config.maze.logical_height, &mut rng) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Cannot generate maze: {e}");
            return;
        }
    };
    info!("maze generation: {} ms", started.elapsed().as_millis());

    let mut session = match Session::new(maze, config.explore) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot start session: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let clock = Instant::now();
    let result = game_loop(&mut session, &mut renderer, &config, clock);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    let maze = session.maze();
    println!();
    println!("Explored: {:.2}%   Dead: {:.2}%", maze.explored_percent(), maze.dead_percent());
    match (session.outcome(), session.is_disqualified()) {
        (_, true) => println!("DISQUALIFIED"),
        (Outcome::Won, false) => println!("Maze complete in {:.2}s", clock.elapsed().as_secs_f64()),
        (Outcome::InProgress, false) => println!("Time: {:.2}s", clock.elapsed().as_secs_f64()),
    }
}

/// Log to `path`; fall back to stderr if it can't be opened.
fn init_logging(path: &Path) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    match OpenOptions::new().create(true).write(true).truncate(true).open(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder.init();
        }
        Err(e) => {
            builder.init();
            warn!("could not open {}: {e}; logging to stderr", path.display());
        }
    }
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
    clock: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let path_display = Duration::from_millis(config.navigation.path_display_ms);

    let mut path_shown_at: Option<Instant> = None;
    let mut message = String::from("arrows/hjkl/wasd move  n navigate  t teleport  q quit");
    let mut message_at = Instant::now();
    let mut finished_at: Option<Duration> = None;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }

        let mut quit = false;
        for code in kb.pressed() {
            if KEYS_QUIT.contains(&code) {
                quit = true;
                break;
            }
            let action = match detect_action(code) {
                Some(a) => a,
                None => continue,
            };
            for event in session.apply(action)? {
                log_event(&event);
                match event {
                    MazeEvent::PathShown { .. } => path_shown_at = Some(Instant::now()),
                    MazeEvent::Completed => finished_at = Some(clock.elapsed()),
                    _ => {}
                }
                if let Some(text) = event_message(&event, finished_at) {
                    message = text;
                    message_at = Instant::now();
                }
            }
        }
        if quit {
            break;
        }

        if path_shown_at.map_or(false, |t| t.elapsed() >= path_display) {
            session.maze_mut().clear_path();
            path_shown_at = None;
        }
        if finished_at.is_none() && !message.is_empty() && message_at.elapsed() >= MESSAGE_TIME {
            message.clear();
        }

        let hud = Hud {
            elapsed: finished_at.unwrap_or_else(|| clock.elapsed()),
            message: &message,
        };
        renderer.render(session, &hud)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_event(event: &MazeEvent) {
    match event {
        MazeEvent::PathUnavailable { to } => info!("no path to ({}, {})", to.x, to.y),
        MazeEvent::RevealedAll => warn!("maze revealed; session disqualified"),
        other => info!("{other:?}"),
    }
}

fn event_message(event: &MazeEvent, finished: Option<Duration>) -> Option<String> {
    match event {
        MazeEvent::NavigationStarted { .. } => Some("NAVIGATE  n: show path  t/e: teleport".into()),
        MazeEvent::NavigationCancelled => Some("Cannot teleport there".into()),
        MazeEvent::PathUnavailable { .. } => Some("No known path".into()),
        MazeEvent::RevealedAll => Some("Maze revealed".into()),
        MazeEvent::Completed => finished.map(|t| format!("Maze complete! {:.2}s  [q] quit", t.as_secs_f64())),
        MazeEvent::PathShown { .. } | MazeEvent::Teleported { .. } => Some(String::new()),
    }
}

// ── Key Constants ──

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_NAVIGATE: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_TELEPORT: &[KeyCode] = &[
    KeyCode::Char('t'), KeyCode::Char('T'), KeyCode::Char('e'), KeyCode::Char('E'),
];
const KEYS_REVEAL: &[KeyCode] = &[KeyCode::Char('c'), KeyCode::Char('C')];

/// Arrow keys move one cell.
const KEYS_STEP: &[(KeyCode, Direction)] = &[
    (KeyCode::Left, Direction::Left),
    (KeyCode::Right, Direction::Right),
    (KeyCode::Up, Direction::Up),
    (KeyCode::Down, Direction::Down),
];

/// Letter keys jump two cells, room to room.
const KEYS_LEAP: &[(char, Direction)] = &[
    ('h', Direction::Left), ('a', Direction::Left),
    ('l', Direction::Right), ('d', Direction::Right),
    ('k', Direction::Up), ('w', Direction::Up),
    ('j', Direction::Down), ('s', Direction::Down),
];

fn detect_action(code: KeyCode) -> Option<Action> {
    if KEYS_NAVIGATE.contains(&code) {
        return Some(Action::ToggleNavigate);
    }
    if KEYS_TELEPORT.contains(&code) {
        return Some(Action::Teleport);
    }
    if KEYS_REVEAL.contains(&code) {
        return Some(Action::RevealAll);
    }
    if let Some(&(_, dir)) = KEYS_STEP.iter().find(|(k, _)| *k == code) {
        return Some(Action::Step(dir));
    }
    if let KeyCode::Char(c) = code {
        let c = c.to_ascii_lowercase();
        if let Some(&(_, dir)) = KEYS_LEAP.iter().find(|(k, _)| *k == c) {
            return Some(Action::Leap(dir));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_step_and_letters_leap() {
        assert_eq!(detect_action(KeyCode::Up), Some(Action::Step(Direction::Up)));
        assert_eq!(detect_action(KeyCode::Char('j')), Some(Action::Leap(Direction::Down)));
        assert_eq!(detect_action(KeyCode::Char('D')), Some(Action::Leap(Direction::Right)));
    }

    #[test]
    fn mode_keys() {
        assert_eq!(detect_action(KeyCode::Char('n')), Some(Action::ToggleNavigate));
        assert_eq!(detect_action(KeyCode::Char('e')), Some(Action::Teleport));
        assert_eq!(detect_action(KeyCode::Char('c')), Some(Action::RevealAll));
        assert_eq!(detect_action(KeyCode::Char('z')), None);
    }
}
