//! Terminal frontend
//!
//! Menus, input, rendering, and audio wiring around the pure simulation
//! cores. The jumper runs at a fixed tick; the sandbox integrates with the
//! measured frame delta. All persistence goes through a `FileStore` in the
//! user's home directory.

use std::io::{self, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{self, Color},
    terminal,
};

use dont_fall::audio::{AudioManager, SoundEffect};
use dont_fall::consts::{GAME_HEIGHT, GAME_WIDTH, PLATFORM_WIDTH, PLAYER_SIZE};
use dont_fall::platform::FileStore;
use dont_fall::sandbox::{
    PLAYER_H, PLAYER_W, SandboxEvent, SandboxInput, SandboxState, TILE, Tile,
};
use dont_fall::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use dont_fall::{HighScore, Settings, persistence};

/// Fixed simulation tick (~60 Hz)
const TICK: Duration = Duration::from_millis(16);
/// Frames a held key stays down without a repeat event
const HOLD_TICKS: u8 = 6;
/// Sandbox autosave interval
const AUTOSAVE: Duration = Duration::from_secs(15);

/// Jumper viewport in terminal cells
const VIEW_W: usize = 60;
const VIEW_H: usize = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    MainMenu,
    Settings,
    Jumper,
    Sandbox,
}

/// Terminals report key presses (with auto-repeat) far more reliably than
/// releases, so "held" is a press that refreshes a countdown.
#[derive(Debug, Default)]
struct Held {
    ticks: u8,
}

impl Held {
    fn press(&mut self) {
        self.ticks = HOLD_TICKS;
    }

    fn release(&mut self) {
        self.ticks = 0;
    }

    fn decay(&mut self) -> bool {
        let down = self.ticks > 0;
        self.ticks = self.ticks.saturating_sub(1);
        down
    }
}

/// A single character cell with a foreground color
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };
}

/// Character grid double buffer
struct Grid {
    w: usize,
    h: usize,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: i32, y: i32, ch: char, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.cells[y as usize * self.w + x as usize] = Cell { ch, color };
        }
    }

    fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set(x + i as i32, y, ch, color);
        }
    }

    fn text_centered(&mut self, y: i32, text: &str, color: Color) {
        let x = (self.w as i32 - text.chars().count() as i32) / 2;
        self.text(x, y, text, color);
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let mut current = Color::Reset;
        for row in 0..self.h {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..self.w {
                let cell = self.cells[row * self.w + col];
                if cell.color != current {
                    queue!(out, style::SetForegroundColor(cell.color))?;
                    current = cell.color;
                }
                queue!(out, style::Print(cell.ch))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

/// Everything the frontend threads through its loop
struct App {
    screen: Screen,
    menu_cursor: usize,
    settings_cursor: usize,
    jumper: GameState,
    sandbox: Option<SandboxState>,
    facing: f32,
    high: HighScore,
    settings: Settings,
    audio: AudioManager,
    store: FileStore,
    left: Held,
    right: Held,
    jump: Held,
    last_autosave: Instant,
    new_record: bool,
    quit: bool,
}

impl App {
    fn new(store: FileStore) -> Self {
        let high = HighScore::load(&store);
        let settings = Settings::load(&store);
        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());
        Self {
            screen: Screen::MainMenu,
            menu_cursor: 0,
            settings_cursor: 0,
            jumper: GameState::new(session_seed()),
            sandbox: None,
            facing: 1.0,
            high,
            settings,
            audio,
            store,
            left: Held::default(),
            right: Held::default(),
            jump: Held::default(),
            last_autosave: Instant::now(),
            new_record: false,
            quit: false,
        }
    }

    fn play(&self, effect: SoundEffect) {
        if self.settings.sfx {
            self.audio.play(effect);
        }
    }

    fn apply_settings(&mut self) {
        self.audio.set_volume(self.settings.effective_volume());
        self.settings.save(&self.store);
    }

    // === Input ===

    fn handle_key(&mut self, code: KeyCode, kind: KeyEventKind) {
        if kind == KeyEventKind::Release {
            match code {
                KeyCode::Left | KeyCode::Char('a') => self.left.release(),
                KeyCode::Right | KeyCode::Char('d') => self.right.release(),
                KeyCode::Up | KeyCode::Char(' ') => self.jump.release(),
                _ => {}
            }
            return;
        }

        match self.screen {
            Screen::MainMenu => self.menu_key(code),
            Screen::Settings => self.settings_key(code),
            Screen::Jumper => self.jumper_key(code),
            Screen::Sandbox => self.sandbox_key(code),
        }
    }

    fn menu_key(&mut self, code: KeyCode) {
        const ENTRIES: usize = 4;
        match code {
            KeyCode::Up | KeyCode::Char('w') => {
                self.menu_cursor = (self.menu_cursor + ENTRIES - 1) % ENTRIES;
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.menu_cursor = (self.menu_cursor + 1) % ENTRIES;
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.menu_cursor {
                0 => {
                    self.jumper = GameState::new(session_seed());
                    self.new_record = false;
                    self.screen = Screen::Jumper;
                }
                1 => {
                    self.enter_sandbox();
                }
                2 => self.screen = Screen::Settings,
                _ => self.quit = true,
            },
            KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Down | KeyCode::Char('w') | KeyCode::Char('s') => {
                self.settings_cursor = 1 - self.settings_cursor;
            }
            KeyCode::Left | KeyCode::Char('a') => {
                if self.settings_cursor == 0 {
                    self.settings.sfx = !self.settings.sfx;
                } else {
                    self.settings.volume = (self.settings.volume - 0.1).max(0.0);
                }
                self.apply_settings();
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Enter => {
                if self.settings_cursor == 0 {
                    self.settings.sfx = !self.settings.sfx;
                } else {
                    self.settings.volume = (self.settings.volume + 0.1).min(1.0);
                }
                self.apply_settings();
            }
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::MainMenu,
            _ => {}
        }
    }

    fn jumper_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('a') => self.left.press(),
            KeyCode::Right | KeyCode::Char('d') => self.right.press(),
            KeyCode::Char('p') => {
                tick(
                    &mut self.jumper,
                    &TickInput {
                        pause: true,
                        ..TickInput::default()
                    },
                );
            }
            KeyCode::Char('r') => {
                self.jumper.reset(session_seed());
                self.new_record = false;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::MainMenu,
            _ => {}
        }
    }

    fn sandbox_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('a') => {
                self.left.press();
                self.facing = -1.0;
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.right.press();
                self.facing = 1.0;
            }
            KeyCode::Up | KeyCode::Char(' ') => self.jump.press(),
            KeyCode::Char('x') => self.sandbox_dig(),
            KeyCode::Char('z') => self.sandbox_place(Tile::Dirt),
            KeyCode::Char('c') => self.sandbox_place(Tile::Stone),
            KeyCode::Char('s') => self.save_sandbox(),
            KeyCode::Char('l') => self.enter_sandbox(),
            KeyCode::Esc | KeyCode::Char('q') => {
                self.save_sandbox();
                self.screen = Screen::MainMenu;
            }
            _ => {}
        }
    }

    // === Per-screen stepping ===

    fn step(&mut self, dt: f32) {
        match self.screen {
            Screen::Jumper => self.step_jumper(),
            Screen::Sandbox => self.step_sandbox(dt),
            _ => {}
        }
    }

    fn step_jumper(&mut self) {
        let input = TickInput {
            move_left: self.left.decay(),
            move_right: self.right.decay(),
            pause: false,
        };
        tick(&mut self.jumper, &input);

        for event in self.jumper.drain_events() {
            match event {
                GameEvent::Bounced => self.play(SoundEffect::Bounce),
                GameEvent::CoinCollected { .. } => self.play(SoundEffect::Coin),
                GameEvent::Ended { score } => {
                    self.new_record = self.high.submit(score, &self.store);
                    if self.new_record {
                        self.play(SoundEffect::HighScore);
                    } else {
                        self.play(SoundEffect::GameOver);
                    }
                }
                _ => {}
            }
        }
    }

    fn step_sandbox(&mut self, dt: f32) {
        let Some(sandbox) = &mut self.sandbox else {
            return;
        };
        let input = SandboxInput {
            left: self.left.decay(),
            right: self.right.decay(),
            jump: self.jump.decay(),
            dig: None,
            place: None,
        };
        sandbox.step(&input, dt);

        let events = sandbox.drain_events();
        for event in events {
            match event {
                SandboxEvent::CoinCollected => self.play(SoundEffect::Coin),
                SandboxEvent::Dug(_) => self.play(SoundEffect::Dig),
                SandboxEvent::Placed(_) => self.play(SoundEffect::Place),
                SandboxEvent::Hurt { .. } => self.play(SoundEffect::Hurt),
                SandboxEvent::Respawned => self.play(SoundEffect::GameOver),
            }
        }

        if self.last_autosave.elapsed() >= AUTOSAVE {
            self.save_sandbox();
        }
    }

    // === Sandbox actions ===

    fn enter_sandbox(&mut self) {
        let sandbox = match persistence::load_snapshot(&self.store) {
            Some(snapshot) => SandboxState::from_snapshot(snapshot, session_seed()),
            None => SandboxState::new(session_seed()),
        };
        self.sandbox = Some(sandbox);
        self.last_autosave = Instant::now();
        self.screen = Screen::Sandbox;
    }

    fn save_sandbox(&mut self) {
        if let Some(sandbox) = &self.sandbox {
            persistence::save_snapshot(&sandbox.snapshot(), &self.store);
            self.last_autosave = Instant::now();
            log::info!("sandbox saved");
        }
    }

    /// Dig the tile one cell ahead of the player, at chest height
    fn sandbox_dig(&mut self) {
        if let Some(sandbox) = &mut self.sandbox {
            let (wx, wy) = Self::reach_point(sandbox, self.facing);
            sandbox.dig_at(wx, wy);
        }
    }

    fn sandbox_place(&mut self, tile: Tile) {
        if let Some(sandbox) = &mut self.sandbox {
            let (wx, wy) = Self::reach_point(sandbox, self.facing);
            sandbox.place_at(wx, wy, tile);
        }
    }

    fn reach_point(sandbox: &SandboxState, facing: f32) -> (f32, f32) {
        let player = &sandbox.player;
        let wx = player.pos.x + PLAYER_W / 2.0 + facing * TILE;
        let wy = player.pos.y + PLAYER_H / 2.0;
        (wx, wy)
    }

    // === Rendering ===

    fn draw(&self, grid: &mut Grid) {
        grid.clear();
        match self.screen {
            Screen::MainMenu => self.draw_menu(grid),
            Screen::Settings => self.draw_settings(grid),
            Screen::Jumper => self.draw_jumper(grid),
            Screen::Sandbox => self.draw_sandbox(grid),
        }
    }

    fn draw_menu(&self, grid: &mut Grid) {
        grid.text_centered(4, "D O N ' T   F A L L", Color::Yellow);
        grid.text_centered(6, &format!("high score {}", self.high.best), Color::Grey);

        let entries = ["Play", "Sandbox", "Settings", "Quit"];
        for (i, entry) in entries.iter().enumerate() {
            let marker = if i == self.menu_cursor { "> " } else { "  " };
            let color = if i == self.menu_cursor {
                Color::White
            } else {
                Color::DarkGrey
            };
            grid.text_centered(9 + i as i32 * 2, &format!("{marker}{entry}"), color);
        }
        grid.text_centered(
            grid.h as i32 - 2,
            "arrows move, enter selects, q quits",
            Color::DarkGrey,
        );
    }

    fn draw_settings(&self, grid: &mut Grid) {
        grid.text_centered(4, "SETTINGS", Color::Yellow);
        let rows = [
            format!("sound   {}", if self.settings.sfx { "on" } else { "off" }),
            format!("volume  {:.0}%", self.settings.volume * 100.0),
        ];
        for (i, row) in rows.iter().enumerate() {
            let marker = if i == self.settings_cursor { "> " } else { "  " };
            let color = if i == self.settings_cursor {
                Color::White
            } else {
                Color::DarkGrey
            };
            grid.text_centered(8 + i as i32 * 2, &format!("{marker}{row}"), color);
        }
        grid.text_centered(grid.h as i32 - 2, "left/right adjust, esc back", Color::DarkGrey);
    }

    /// The jumper world is y-up; the terminal is y-down. Flip here, and
    /// scale the logical viewport onto the character grid.
    fn draw_jumper(&self, grid: &mut Grid) {
        let sx = VIEW_W as f32 / GAME_WIDTH;
        let sy = VIEW_H as f32 / GAME_HEIGHT;
        let flip = |y: f32| ((GAME_HEIGHT - y) * sy) as i32;

        for platform in &self.jumper.platforms {
            let x0 = (platform.pos.x * sx) as i32;
            let x1 = ((platform.pos.x + PLATFORM_WIDTH) * sx) as i32;
            let y = flip(platform.top());
            for x in x0..x1 {
                grid.set(x, y, '=', Color::Green);
            }
        }
        for coin in &self.jumper.coins {
            grid.set((coin.pos.x * sx) as i32, flip(coin.pos.y), 'o', Color::Yellow);
        }

        let px = (self.jumper.player.pos.x * sx) as i32;
        let pw = ((PLAYER_SIZE * sx) as i32).max(1);
        let py = flip(self.jumper.player.pos.y);
        for x in px..px + pw {
            grid.set(x, py, '@', Color::Cyan);
        }

        grid.text(
            1,
            0,
            &format!("score {}   best {}", self.jumper.score, self.high.best),
            Color::White,
        );

        match self.jumper.phase {
            GamePhase::Paused => grid.text_centered(VIEW_H as i32 / 2, "PAUSED", Color::White),
            GamePhase::GameOver => {
                grid.text_centered(VIEW_H as i32 / 2 - 1, "GAME OVER", Color::Red);
                if self.new_record {
                    grid.text_centered(VIEW_H as i32 / 2 + 1, "new record!", Color::Yellow);
                }
                grid.text_centered(VIEW_H as i32 / 2 + 3, "r restarts, q for menu", Color::Grey);
            }
            GamePhase::Playing => {}
        }
    }

    fn draw_sandbox(&self, grid: &mut Grid) {
        let Some(sandbox) = &self.sandbox else {
            return;
        };
        let cam = sandbox.camera();
        let c0 = (cam.x / TILE).floor() as i32;
        let r0 = (cam.y / TILE).floor() as i32;

        for row in 0..grid.h as i32 - 1 {
            for col in 0..grid.w as i32 {
                let (ch, color) = match sandbox.map.get(r0 + row, c0 + col) {
                    Tile::Empty => (' ', Color::Reset),
                    Tile::Dirt => ('#', Color::DarkYellow),
                    Tile::Stone => ('H', Color::Grey),
                    Tile::Coin => ('o', Color::Yellow),
                };
                grid.set(col, row + 1, ch, color);
            }
        }

        let ex = (sandbox.enemy.pos.x / TILE) as i32 - c0;
        let ey = (sandbox.enemy.pos.y / TILE) as i32 - r0;
        grid.set(ex, ey + 1, '&', Color::Red);

        let px = ((sandbox.player.pos.x + PLAYER_W / 2.0) / TILE) as i32 - c0;
        let py = ((sandbox.player.pos.y + PLAYER_H / 2.0) / TILE) as i32 - r0;
        grid.set(px, py + 1, '@', Color::Cyan);

        let inv = &sandbox.inventory;
        grid.text(
            1,
            0,
            &format!(
                "score {}  hp {}  coins {}  dirt {}  stone {}",
                sandbox.score, sandbox.player.health, inv.coins, inv.dirt, inv.stone
            ),
            Color::White,
        );
    }
}

fn session_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn storage_root() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dont-fall")
}

fn main() -> io::Result<()> {
    env_logger::init();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut out);

    execute!(out, terminal::LeaveAlternateScreen, cursor::Show)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(out: &mut io::Stdout) -> io::Result<()> {
    let mut app = App::new(FileStore::new(storage_root()));
    let mut grid = Grid::new(VIEW_W, VIEW_H);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32().min(0.05);
        last_frame = frame_start;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.kind);
            }
        }
        if app.quit {
            // Leaving mid-session keeps the sandbox world
            app.save_sandbox();
            return Ok(());
        }

        app.step(dt);
        app.draw(&mut grid);
        grid.render(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < TICK {
            std::thread::sleep(TICK - elapsed);
        }
    }
}
