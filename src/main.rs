mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jungle_platformer::clock::FrameClock;
use jungle_platformer::compute::Simulation;
use jungle_platformer::config::Tuning;
use jungle_platformer::entities::{Collectible, CollectibleKind, Enemy, PowerUpKind};
use jungle_platformer::events::{GameHooks, HookSet};
use jungle_platformer::input::{Action, InputState};
use jungle_platformer::level::{jungle_hijinx, LevelDefinition};
use jungle_platformer::persistence::{FileStore, ScoreKeeper};

use display::{Overlay, Screen};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "jungle_platformer", version, about = "Jungle platformer in your terminal")]
struct Args {
    /// Level file (JSON).  Defaults to the built-in "Jungle Hijinx".
    #[arg(long)]
    level: Option<PathBuf>,

    /// Tuning overrides (JSON); missing fields keep their defaults.
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Seed for the cosmetic RNG (particles, camera shake).
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game.
    #[arg(long, default_value = "jungle_platformer.log")]
    log_file: PathBuf,

    /// Progress file.  Defaults to ~/.jungle_platformer.json.
    #[arg(long)]
    scores: Option<PathBuf>,
}

// ── Key tracking ──────────────────────────────────────────────────────────────

/// Steps a key stays held after its last press or repeat event.  Terminals
/// without release events only re-send presses at the OS repeat rate, so
/// the window has to outlast one repeat interval (8 steps is about 133 ms).
const HOLD_WINDOW: u64 = 8;

/// Most simulation steps run to catch up after a stall.
const MAX_CATCH_UP: u32 = 5;

/// How long a hook banner stays on screen, in steps.
const BANNER_STEPS: u32 = 120;

const KEY_BINDINGS: &[(KeyCode, Action)] = &[
    (KeyCode::Left, Action::MoveLeft),
    (KeyCode::Char('a'), Action::MoveLeft),
    (KeyCode::Char('A'), Action::MoveLeft),
    (KeyCode::Right, Action::MoveRight),
    (KeyCode::Char('d'), Action::MoveRight),
    (KeyCode::Char('D'), Action::MoveRight),
    (KeyCode::Char(' '), Action::Jump),
    (KeyCode::Down, Action::GroundPound),
    (KeyCode::Char('s'), Action::GroundPound),
    (KeyCode::Char('S'), Action::GroundPound),
    (KeyCode::Up, Action::Grab),
    (KeyCode::Char('w'), Action::Grab),
    (KeyCode::Char('W'), Action::Grab),
    (KeyCode::Char('x'), Action::Roll),
    (KeyCode::Char('X'), Action::Roll),
    (KeyCode::Char('f'), Action::Dash),
    (KeyCode::Char('F'), Action::Dash),
    (KeyCode::Tab, Action::SwitchCharacter),
    (KeyCode::Char('p'), Action::Pause),
    (KeyCode::Char('P'), Action::Pause),
];

/// Returns true if `key` was seen within the last `HOLD_WINDOW` steps.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Refresh every action from the live keys.
fn sample_input(input: &mut InputState, key_frame: &HashMap<KeyCode, u64>, frame: u64) {
    for action in Action::ALL {
        let held = KEY_BINDINGS
            .iter()
            .filter(|(_, a)| *a == action)
            .any(|(key, _)| is_held(key_frame, key, frame));
        input.set_held(action, held);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn default_scores_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".jungle_platformer.json")
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn invalid_data(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Everything that can fail before the terminal is taken over.
fn build_session(args: &Args) -> io::Result<(Simulation, ScoreKeeper<FileStore>)> {
    let level = match &args.level {
        Some(path) => LevelDefinition::load(path).map_err(invalid_data)?,
        None => jungle_hijinx(),
    };
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path).map_err(invalid_data)?,
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let sim = Simulation::new(level, tuning, seed).map_err(invalid_data)?;

    let scores = args.scores.clone().unwrap_or_else(default_scores_path);
    let keeper = ScoreKeeper::new(FileStore::open(scores).map_err(invalid_data)?);
    Ok((sim, keeper))
}

// ── Notification banners ──────────────────────────────────────────────────────

/// Short-lived HUD messages driven by the simulation hooks.
#[derive(Debug, Default)]
struct Banner {
    text: Option<String>,
    steps_left: u32,
}

impl Banner {
    fn show(&mut self, text: String) {
        self.text = Some(text);
        self.steps_left = BANNER_STEPS;
    }

    fn tick(&mut self) {
        self.steps_left = self.steps_left.saturating_sub(1);
        if self.steps_left == 0 {
            self.text = None;
        }
    }

    fn clear(&mut self) {
        self.text = None;
        self.steps_left = 0;
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl GameHooks for Banner {
    fn on_collect(&mut self, item: &Collectible) {
        let text = match item.kind {
            CollectibleKind::Golden => "Golden banana!",
            CollectibleKind::Bonus => "Bonus banana!",
            CollectibleKind::PowerUp(PowerUpKind::ExtraLife) => "Extra life!",
            CollectibleKind::PowerUp(PowerUpKind::SpeedBoost) => "Speed boost!",
            CollectibleKind::PowerUp(PowerUpKind::Invincibility) => "Invincible!",
            CollectibleKind::PowerUp(PowerUpKind::DoubleJump) => "Double jump ready!",
            CollectibleKind::Normal => return,
        };
        self.show(text.to_string());
    }

    fn on_enemy_defeated(&mut self, _enemy: &Enemy, combo_count: u32) {
        if combo_count > 1 {
            self.show(format!("Combo x{combo_count}!"));
        }
    }

    fn on_player_died(&mut self, lives_remaining: u32) {
        if lives_remaining > 0 {
            self.show(format!("Ouch! {lives_remaining} lives left"));
        }
    }

    fn on_checkpoint(&mut self, id: u32) {
        self.show(format!("Checkpoint {id}"));
    }
}

// ── Title screen ──────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    level_name: &str,
    high_score: u32,
) -> io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "🍌  JUNGLE  PLATFORMER  🍌";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(title))?;

    let level_str = format!("Level: {level_name}");
    out.queue(cursor::MoveTo(
        cx.saturating_sub(level_str.chars().count() as u16 / 2),
        cy.saturating_sub(4),
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&level_str))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {high_score}");
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(3),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    let legend: &[(&str, Color, &str)] = &[
        (")", Color::Yellow, " banana        $ golden   % bonus"),
        ("♥", Color::Red, " extra life    » speed    * invincible   ↑ double jump"),
        ("K", Color::Green, " kremling: pounce on it or roll into it"),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(24), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(
        cx.saturating_sub(display::CONTROLS.chars().count() as u16 / 2),
        cy + 3,
    ))?;
    out.queue(Print(display::CONTROLS))?;

    let start = "ENTER : Start   Q : Quit";
    out.queue(cursor::MoveTo(cx.saturating_sub(start.len() as u16 / 2), cy + 5))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(start))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Play until the user quits.
///
/// `key_frame` maps each key to the clock frame of its last press or repeat.
/// Release events (kitty keyboard protocol) drop a key immediately; on other
/// terminals keys lapse after `HOLD_WINDOW` steps.  Before every fixed step
/// the live keys are folded into the `InputState` the simulation reads.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation,
    keeper: &mut ScoreKeeper<FileStore>,
    rx: &mpsc::Receiver<Event>,
) -> io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut input = InputState::new();
    let mut banner = Banner::default();
    let mut clock = FrameClock::new(sim.tuning().frames_per_second, MAX_CATCH_UP);
    let mut last = Instant::now();

    loop {
        let now = Instant::now();
        let steps = clock.advance(now - last);
        last = now;
        let frame = clock.frames();

        // ── Input events ──────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            sim.restart();
                            input.clear();
                            key_frame.clear();
                            banner.clear();
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Fixed steps ───────────────────────────────────────────────────────
        for _ in 0..steps {
            sample_input(&mut input, &key_frame, frame);
            {
                let mut hooks = HookSet::new().with(&mut *keeper).with(&mut banner);
                sim.update(&input, &mut hooks);
            }
            input.end_frame();
            banner.tick();
        }

        let (width, height) = terminal::size()?;
        let tuning = sim.tuning();
        let screen = Screen::fit(width, height, (tuning.viewport_width, tuning.viewport_height));
        let overlay = Overlay {
            high_score: keeper.high_score(),
            banner: banner.text(),
        };
        display::render(out, &sim.render_snapshot(), &screen, &overlay)?;

        thread::sleep(clock.until_next_step().max(Duration::from_millis(1)));
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Load before touching the terminal so errors print normally.
    let (mut sim, mut keeper) = build_session(&args)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events make held keys exact; without them HOLD_WINDOW applies.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    info!(keyboard_enhanced, "terminal ready");

    // Blocking reads live on their own thread; the loop polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "input thread stopped");
                break;
            }
        }
    });

    let result = match show_menu(&mut out, &rx, &sim.level().name, keeper.high_score()) {
        Ok(MenuResult::Start) => game_loop(&mut out, &mut sim, &mut keeper, &rx),
        Ok(MenuResult::Quit) => Ok(()),
        Err(e) => Err(e),
    };

    // Restore the terminal whatever the loop returned.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = sim.score, high_score = keeper.high_score(), "session ended");
    result
}
