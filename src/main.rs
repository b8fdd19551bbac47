use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use maze_chase::{Dir, Game, GameConfig, Pos, RewardKind, ScatterRewards, Status, Tile};
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const FLASH: Duration = Duration::from_millis(400);

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Trail,
    Enemy,
    Wall,
    Empty,
    General,
    Bonus,
    Punishment,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    flash_until: Option<Instant>,
}

impl Glyph {
    fn text(self) -> &'static str {
        match self {
            Glyph::Player => "😃",
            Glyph::Trail => "🔥",
            Glyph::Enemy => "👻",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::General => "· ",
            Glyph::Bonus => "🍒",
            Glyph::Punishment => "☠",
        }
    }
}

impl Renderer {
    fn new(size: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            flash_until: None,
        }
    }

    /// Centres the map and its HUD line in the terminal. Returns `false`
    /// after printing a notice when the terminal is too small to hold them.
    fn fit(&mut self, stdout: &mut Stdout, size: usize) -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        let map_cols = u16::try_from(size * CELL_W).unwrap_or(u16::MAX);
        let map_rows = u16::try_from(size + 2).unwrap_or(u16::MAX);
        if cols < map_cols || rows < map_rows {
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(Print(format!(
                "Maze needs {map_cols}x{map_rows} cells, terminal has {cols}x{rows}."
            )))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(false);
        }
        let origin = ((cols - map_cols) / 2, (rows - map_rows) / 2 + 1);
        if origin != (self.origin_x, self.origin_y) {
            (self.origin_x, self.origin_y) = origin;
            self.needs_full = true;
        }
        Ok(true)
    }

    fn draw_hud(&mut self, stdout: &mut Stdout, game: &mut Game<ScatterRewards>) -> io::Result<()> {
        let now = Instant::now();
        if game.take_explosion() {
            self.flash_until = Some(now + FLASH);
        }
        let flashing = self.flash_until.is_some_and(|t| now < t);

        let player = game.player();
        let hud = format!(
            "Score: {}  Trail: {}  Rewards left: {}  Enemies: {}{}  (q to quit)",
            player.score(),
            player.trail_len(),
            game.rewards_left(),
            game.enemies().len(),
            if flashing { "  BOOM!" } else { "" }
        );
        if !self.needs_full && hud == self.last_hud {
            return Ok(());
        }
        stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        self.last_hud = hud;
        Ok(())
    }

    /// Draws `cell` at `pos` when it differs from what is on screen.
    fn update(&mut self, stdout: &mut Stdout, pos: Pos, size: usize, cell: Cell) -> io::Result<()> {
        let idx = pos.vertex(size);
        if !self.needs_full && self.last[idx] == cell {
            return Ok(());
        }
        self.last[idx] = cell;

        let text = cell.glyph.text();
        let x = self.origin_x + (pos.col * CELL_W) as u16;
        let y = self.origin_y + pos.row as u16;
        stdout.queue(MoveTo(x, y))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        let pad = CELL_W.saturating_sub(UnicodeWidthStr::width(text));
        stdout.queue(Print(" ".repeat(pad)))?;
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

fn main() -> maze_chase::Result<()> {
    init_logging()?;
    let config = GameConfig::from_env();
    config.validate()?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// Logs go to the file named by `MAZE_LOG`; the terminal belongs to the game.
fn init_logging() -> io::Result<()> {
    let Ok(path) = std::env::var("MAZE_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, config: &GameConfig) -> maze_chase::Result<()> {
    let mut rng = rand::thread_rng();
    let rewards = ScatterRewards::generate(config.size, &mut rng);
    let mut game = Game::new(config, rewards, &mut rng, Instant::now())?;
    let mut renderer = Renderer::new(config.size);
    let frame_time = config.frame_time();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Held keys repeat; only fresh presses move the player.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let dir = match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('w') | KeyCode::Up => Dir::Up,
                    KeyCode::Char('s') | KeyCode::Down => Dir::Down,
                    KeyCode::Char('a') | KeyCode::Left => Dir::Left,
                    KeyCode::Char('d') | KeyCode::Right => Dir::Right,
                    _ => continue,
                };
                game.press(dir);
            }
        }

        game.advance(Instant::now());
        render(stdout, &mut game, &mut renderer)?;
        if game.status() == Status::Cleared {
            render_cleared(stdout, &game, &renderer)?;
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn render(
    stdout: &mut Stdout,
    game: &mut Game<ScatterRewards>,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let size = game.grid().size();
    if !renderer.fit(stdout, size)? {
        return Ok(());
    }
    renderer.draw_hud(stdout, game)?;
    for (pos, tile) in game.grid().positions() {
        renderer.update(stdout, pos, size, cell_for(game, pos, tile))?;
    }
    renderer.needs_full = false;
    stdout.flush()
}

/// Actors cover the tile underneath: head, then enemies, then the tail.
fn cell_for(game: &Game<ScatterRewards>, pos: Pos, tile: Tile) -> Cell {
    let player = game.player();
    let (glyph, color) = if pos == player.head() {
        (Glyph::Player, Color::Yellow)
    } else if game.enemies().iter().any(|e| e.pos() == pos) {
        (Glyph::Enemy, Color::Red)
    } else if player.tail().contains(&Some(pos)) {
        (Glyph::Trail, Color::DarkYellow)
    } else {
        match tile {
            Tile::Wall => (Glyph::Wall, Color::Blue),
            Tile::Path | Tile::Margin => (Glyph::Empty, Color::Reset),
            Tile::Reward(RewardKind::General) => (Glyph::General, Color::White),
            Tile::Reward(RewardKind::Bonus) => (Glyph::Bonus, Color::Green),
            Tile::Reward(RewardKind::Punishment) => (Glyph::Punishment, Color::Magenta),
        }
    };
    Cell { glyph, color }
}

fn render_cleared(
    stdout: &mut Stdout,
    game: &Game<ScatterRewards>,
    renderer: &Renderer,
) -> io::Result<()> {
    let size = game.grid().size() as u16;
    stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + size))?;
    stdout.queue(Print(format!(
        "CLEARED - Final Score: {} (press q to quit)",
        game.player().score()
    )))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
