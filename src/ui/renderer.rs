/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Reads the session through its read-only accessors; never mutates the maze.

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use mazewalk::sim::session::Session;
use mazewalk::{Maze, Position};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    const fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── Palette ──

const WALL: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const PLAYER: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const FOG: Color = Color::Rgb { r: 77, g: 77, b: 255 };
const PATH: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const DEAD: Color = Color::Rgb { r: 51, g: 51, b: 51 };

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }
}

// ── Camera ──

/// Top-left world cell of the viewport. Keeps the focus centred, except
/// near the maze edges where it stops scrolling.
fn camera_origin(focus: usize, world: usize, view: usize) -> usize {
    if world <= view || focus < view / 2 {
        0
    } else if focus > world - view / 2 {
        world - view
    } else {
        focus - view / 2
    }
}

// ── Renderer ──

/// Each maze cell is two terminal columns wide.
const CELL_W: usize = 2;

/// Rows reserved under the map: message, dead %, explored/time.
const STATUS_ROWS: usize = 3;

/// What the HUD shows besides the maze itself.
pub struct Hud<'a> {
    pub elapsed: Duration,
    pub message: &'a str,
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size()?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &Session, hud: &Hud) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.sync_size()?;
        }

        self.front.clear();
        self.compose_maze(session);
        self.compose_status(session, hud);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn sync_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))
    }

    // ── Composition ──

    fn compose_maze(&mut self, session: &Session) {
        let maze = session.maze();
        // the last row and column are never drawn
        let world_w = maze.width() - 1;
        let world_h = maze.height() - 1;
        let view_w = self.term_w / CELL_W;
        let view_h = self.term_h.saturating_sub(STATUS_ROWS);

        let focus = session.focus();
        let cam_x = camera_origin(focus.x, world_w, view_w);
        let cam_y = camera_origin(focus.y, world_h, view_h);

        for vy in 0..view_h.min(world_h) {
            for vx in 0..view_w.min(world_w) {
                let pos = Position::new(cam_x + vx, cam_y + vy);
                let (a, b) = tile_glyph(maze, session, pos);
                self.front.set(vx * CELL_W, vy, a);
                self.front.set(vx * CELL_W + 1, vy, b);
            }
        }
    }

    fn compose_status(&mut self, session: &Session, hud: &Hud) {
        let maze = session.maze();
        let base = self.term_h.saturating_sub(STATUS_ROWS);

        self.front.put_str(0, base, hud.message, Color::Yellow);
        self.front.put_str(0, base + 1, &format!("Dead: {:6.2}%", maze.dead_percent()), Color::White);

        let line = format!(
            "Explored: {:6.2}%   Time: {:.2}",
            maze.explored_percent(),
            hud.elapsed.as_secs_f64(),
        );
        self.front.put_str(0, base + 2, &line, Color::White);
        if session.is_disqualified() {
            self.front.put_str(line.chars().count() + 3, base + 2, "DISQUALIFIED", PATH);
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if last != Some((x.wrapping_sub(1), y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last = Some((x, y));
            }
        }

        self.writer.flush()
    }
}

/// Two-column glyph for one maze cell.
fn tile_glyph(maze: &Maze, session: &Session, pos: Position) -> (Cell, Cell) {
    let pair = |l: char, r: char, fg: Color| (Cell::new(l, fg), Cell::new(r, fg));

    if session.cursor() == Some(pos) {
        return pair('[', ']', PATH);
    }
    if session.player() == pos {
        return pair('[', ']', PLAYER);
    }

    let (x, y) = (pos.x, pos.y);
    if !maze.is_explored(x, y).unwrap_or(false) {
        return pair('*', '*', FOG);
    }
    if maze.is_wall(x, y).unwrap_or(true) {
        return pair('M', 'M', WALL);
    }
    if maze.is_on_path(x, y).unwrap_or(false) {
        return pair('o', 'o', PATH);
    }
    if maze.is_dead(x, y).unwrap_or(false) {
        return pair('X', 'X', DEAD);
    }
    (Cell::BLANK, Cell::BLANK)
}
