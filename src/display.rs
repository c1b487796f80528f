/// ASCII renderer for a `RenderSnapshot`.
///
/// World pixels are projected onto terminal cells through a `Screen`; the
/// camera offset is applied here, never in the simulation.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use jungle_platformer::compute::RenderSnapshot;
use jungle_platformer::entities::{
    Camera, Character, Collectible, CollectibleKind, Crumble, Enemy, EnemyKind, GameStatus,
    Particle, ParticleKind, Platform, PlatformKind, PowerUpKind, Rect, Vine,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkGreen;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_INFO: Color = Color::White;
const C_DK: Color = Color::DarkYellow;
const C_DIDDY: Color = Color::Red;
const C_KREMLING: Color = Color::Green;
const C_CHASER: Color = Color::Red;
const C_PROJECTILE: Color = Color::Magenta;
const C_STUNNED: Color = Color::DarkGrey;
const C_GROUND: Color = Color::DarkYellow;
const C_WOOD: Color = Color::Yellow;
const C_MOVING: Color = Color::Cyan;
const C_BOUNCY: Color = Color::Magenta;
const C_CRUMBLING: Color = Color::Grey;
const C_VINE: Color = Color::Green;
const C_BANANA: Color = Color::Yellow;
const C_POWERUP: Color = Color::Cyan;
const C_CHECKPOINT: Color = Color::Green;
const C_GOAL: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_BANNER: Color = Color::Cyan;

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps world pixels inside the camera viewport onto the play area
/// (rows 2 .. height-3, columns 1 .. width-2).
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub width: u16,
    pub height: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Screen {
    pub fn fit(width: u16, height: u16, viewport: (f32, f32)) -> Self {
        let cols = f32::from(width.saturating_sub(2).max(1));
        let rows = f32::from(height.saturating_sub(4).max(1));
        Self {
            width,
            height,
            scale_x: viewport.0 / cols,
            scale_y: viewport.1 / rows,
        }
    }

    fn play_rows(&self) -> (u16, u16) {
        (2, self.height.saturating_sub(3))
    }

    /// Terminal cell for a world point, or `None` when it is off screen.
    fn cell(&self, camera: &Camera, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = ((x - camera.x) / self.scale_x).floor() + 1.0;
        let row = ((y - camera.y) / self.scale_y).floor() + 2.0;
        let (top, bottom) = self.play_rows();
        if col < 1.0 || col > f32::from(self.width.saturating_sub(2)) {
            return None;
        }
        if row < f32::from(top) || row > f32::from(bottom) {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Every cell a world rectangle covers (at least one if it is visible).
    fn cells(&self, camera: &Camera, rect: &Rect) -> Vec<(u16, u16)> {
        let cols = (rect.width / self.scale_x).ceil().max(1.0) as usize;
        let rows = (rect.height / self.scale_y).ceil().max(1.0) as usize;
        let mut out = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            for c in 0..cols {
                let x = rect.x + c as f32 * self.scale_x;
                let y = rect.y + r as f32 * self.scale_y;
                if let Some(cell) = self.cell(camera, x, y) {
                    out.push(cell);
                }
            }
        }
        out
    }
}

/// Extra text the front-end lays over the frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overlay<'a> {
    pub high_score: u32,
    pub banner: Option<&'a str>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot<'_>,
    screen: &Screen,
    overlay: &Overlay<'_>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, screen)?;
    draw_hud(out, snap, screen)?;

    for vine in snap.vines {
        draw_vine(out, vine, snap.camera, screen)?;
    }
    for platform in snap.platforms {
        draw_platform(out, platform, snap.camera, screen)?;
    }
    draw_markers(out, snap, screen)?;
    for item in snap.collectibles.iter().filter(|c| !c.collected) {
        draw_collectible(out, item, snap.camera, screen)?;
    }
    for enemy in snap.enemies.iter().filter(|e| e.alive) {
        draw_enemy(out, enemy, snap.camera, screen)?;
    }
    draw_player(out, snap, screen)?;
    for particle in snap.particles {
        draw_particle(out, particle, snap.camera, screen)?;
    }

    if let Some(text) = overlay.banner {
        draw_centered(out, screen, 2, text, C_BANNER)?;
    }
    draw_controls_hint(out, screen)?;

    match snap.status {
        GameStatus::Playing => {}
        GameStatus::Paused => draw_box(out, screen, &["    PAUSED    "], Color::Cyan, &[])?,
        GameStatus::LevelComplete => draw_result(out, snap, screen, overlay, true)?,
        GameStatus::GameOver => draw_result(out, snap, screen, overlay, false)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(
    out: &mut W,
    (col, row): (u16, u16),
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let w = screen.width as usize;
    let h = screen.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot<'_>,
    screen: &Screen,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}  Bananas:{:>3}", snap.score, snap.bananas)))?;

    // Level name, character and timer in the centre
    let secs = snap.elapsed.as_secs();
    let centre = format!(
        "[ {} | {} {} | {:02}:{:02} ]",
        snap.level_name,
        snap.player.character.name(),
        snap.player.state.label(),
        secs / 60,
        secs % 60
    );
    let cx = (screen.width / 2).saturating_sub(centre.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_INFO))?;
    out.queue(Print(&centre))?;

    // Timed power-ups + lives on the right
    let p = snap.player;
    let mut tags = String::new();
    if p.speed_boost_timer > 0 {
        tags.push_str("[» FAST] ");
    }
    if p.invulnerable_timer > 0 {
        tags.push_str("[* SAFE] ");
    }
    let lives_str = format!("Lives:{}", "♥".repeat(snap.lives as usize));
    let right = format!("{tags}{lives_str}");
    let rx = screen.width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !tags.is_empty() {
        out.queue(style::SetForegroundColor(C_POWERUP))?;
        out.queue(Print(&tags))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(
    out: &mut W,
    platform: &Platform,
    camera: &Camera,
    screen: &Screen,
) -> std::io::Result<()> {
    let (glyph, color) = match platform.kind {
        PlatformKind::Ground => ("█", C_GROUND),
        PlatformKind::Wood => ("=", C_WOOD),
        PlatformKind::Moving(_) => ("~", C_MOVING),
        PlatformKind::Bouncy => ("^", C_BOUNCY),
        PlatformKind::Crumbling(Crumble { collapsed: true, .. }) => return Ok(()),
        PlatformKind::Crumbling(Crumble { triggered: true, .. }) => (":", C_CRUMBLING),
        PlatformKind::Crumbling(_) => ("▒", C_CRUMBLING),
    };
    for cell in screen.cells(camera, &platform.rect()) {
        put(out, cell, glyph, color)?;
    }
    Ok(())
}

/// Vines are sampled along their length; the free end is a grab handle.
fn draw_vine<W: Write>(
    out: &mut W,
    vine: &Vine,
    camera: &Camera,
    screen: &Screen,
) -> std::io::Result<()> {
    let (ex, ey) = vine.end();
    let samples = ((vine.length / screen.scale_y).ceil() as usize).max(1);
    for i in 0..samples {
        let t = i as f32 / samples as f32;
        let x = vine.x + (ex - vine.x) * t;
        let y = vine.y + (ey - vine.y) * t;
        if let Some(cell) = screen.cell(camera, x, y) {
            put(out, cell, "│", C_VINE)?;
        }
    }
    if let Some(cell) = screen.cell(camera, ex, ey) {
        put(out, cell, "o", C_VINE)?;
    }
    Ok(())
}

/// Checkpoint flags and the goal line.
fn draw_markers<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot<'_>,
    screen: &Screen,
) -> std::io::Result<()> {
    for checkpoint in snap.checkpoints {
        let color = if checkpoint.activated { C_CHECKPOINT } else { C_HINT };
        if let Some(cell) = screen.cell(snap.camera, checkpoint.x, checkpoint.respawn_y) {
            put(out, cell, "⚑", color)?;
        }
    }
    let (_, bottom) = screen.play_rows();
    for row in 2..=bottom {
        let y = snap.camera.y + f32::from(row - 2) * screen.scale_y;
        if let Some(cell) = screen.cell(snap.camera, snap.goal_x, y) {
            put(out, cell, "▐", C_GOAL)?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_collectible<W: Write>(
    out: &mut W,
    item: &Collectible,
    camera: &Camera,
    screen: &Screen,
) -> std::io::Result<()> {
    let (glyph, color) = match item.kind {
        CollectibleKind::Normal => (")", C_BANANA),
        CollectibleKind::Golden => ("$", C_BANANA),
        CollectibleKind::Bonus => ("%", C_BANANA),
        CollectibleKind::PowerUp(PowerUpKind::ExtraLife) => ("♥", C_HUD_LIVES),
        CollectibleKind::PowerUp(PowerUpKind::SpeedBoost) => ("»", C_POWERUP),
        CollectibleKind::PowerUp(PowerUpKind::Invincibility) => ("*", C_POWERUP),
        CollectibleKind::PowerUp(PowerUpKind::DoubleJump) => ("↑", C_POWERUP),
    };
    let rect = item.rect();
    if let Some(cell) = screen.cell(camera, rect.center_x(), rect.center_y()) {
        put(out, cell, glyph, color)?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    enemy: &Enemy,
    camera: &Camera,
    screen: &Screen,
) -> std::io::Result<()> {
    let (glyph, color) = match (enemy.stunned, enemy.kind) {
        (true, _) => ("@", C_STUNNED),
        (false, EnemyKind::Patrol) => ("K", C_KREMLING),
        (false, EnemyKind::Chaser) => ("K", C_CHASER),
        (false, EnemyKind::Projectile) => ("•", C_PROJECTILE),
    };
    for cell in screen.cells(camera, &enemy.rect()) {
        put(out, cell, glyph, color)?;
    }
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot<'_>,
    screen: &Screen,
) -> std::io::Result<()> {
    let p = snap.player;
    // Blink while invulnerable
    if p.invulnerable_timer > 0 && (p.invulnerable_timer / 6) % 2 == 1 {
        return Ok(());
    }
    let (glyph, color) = match p.character {
        Character::Dk => ("D", C_DK),
        Character::Diddy => ("d", C_DIDDY),
    };
    for cell in screen.cells(snap.camera, &p.rect()) {
        put(out, cell, glyph, color)?;
    }
    Ok(())
}

fn draw_particle<W: Write>(
    out: &mut W,
    particle: &Particle,
    camera: &Camera,
    screen: &Screen,
) -> std::io::Result<()> {
    let (glyph, color) = match particle.kind {
        ParticleKind::Dust => ("·", Color::DarkYellow),
        ParticleKind::Sparkle => ("'", Color::Yellow),
        ParticleKind::Star => ("*", Color::White),
        ParticleKind::Confetti => ("+", Color::Magenta),
        ParticleKind::Debris => (",", Color::Grey),
    };
    if let Some(cell) = screen.cell(camera, particle.x, particle.y) {
        put(out, cell, glyph, color)?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

pub const CONTROLS: &str = concat!(
    "←→ Move  SPACE Jump  ↓+SPACE Pound  X Roll  F Dash  ↑ Grab  ",
    "TAB Switch  P Pause  R Restart  Q Quit",
);

fn draw_controls_hint<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    screen: &Screen,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (screen.width / 2).saturating_sub(text.chars().count() as u16 / 2);
    put(out, (col, row), text, color)
}

/// A framed title with optional extra lines below it.
fn draw_box<W: Write>(
    out: &mut W,
    screen: &Screen,
    title: &[&str],
    color: Color,
    extra: &[(String, Color)],
) -> std::io::Result<()> {
    let inner = title.iter().map(|t| t.chars().count()).max().unwrap_or(0);
    let top = format!("╔{}╗", "═".repeat(inner));
    let bottom = format!("╚{}╝", "═".repeat(inner));

    let total_rows = title.len() + 2 + extra.len();
    let mut row = (screen.height / 2).saturating_sub(total_rows as u16 / 2);

    draw_centered(out, screen, row, &top, color)?;
    for line in title {
        row += 1;
        draw_centered(out, screen, row, &format!("║{line:<inner$}║"), color)?;
    }
    row += 1;
    draw_centered(out, screen, row, &bottom, color)?;
    for (line, c) in extra {
        row += 1;
        draw_centered(out, screen, row, line, *c)?;
    }
    Ok(())
}

fn draw_result<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot<'_>,
    screen: &Screen,
    overlay: &Overlay<'_>,
    won: bool,
) -> std::io::Result<()> {
    let (title, color) = if won {
        ("  LEVEL  COMPLETE  ", Color::Green)
    } else {
        ("     GAME  OVER    ", Color::Red)
    };

    let new_best = snap.score >= overlay.high_score && snap.score > 0;
    let best_line = if new_best {
        (format!("★ NEW BEST: {:>7} ★", snap.score), Color::Yellow)
    } else {
        (format!("Best Score:  {:>7}", overlay.high_score), Color::DarkGrey)
    };
    let secs = snap.elapsed.as_secs();
    let extra = [
        (format!("Final Score: {:>7}", snap.score), Color::Yellow),
        best_line,
        (
            format!("Bananas: {}   Time: {:02}:{:02}", snap.bananas, secs / 60, secs % 60),
            Color::White,
        ),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_box(out, screen, &[title], color, &extra)
}
