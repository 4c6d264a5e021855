//! Rendering layer.  All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable snapshot of the
//! session.  No game logic is performed; this module only scales field
//! coordinates onto terminal cells and translates sprites into commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use cyber_stage::entities::{FrameEvent, Phase, WeaponKind};
use cyber_stage::snapshot::{FrameSnapshot, Hud, SpriteKind, SpriteView};
use cyber_stage::tuning::Rgb;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::DarkGrey;
const C_HUD_STAGE: Color = Color::Cyan;
const C_HUD_HP: Color = Color::Green;
const C_HUD_HP_LOW: Color = Color::Red;
const C_HUD_WEAPON: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_BOSS_BAR: Color = Color::Red;

/// First terminal row of the play area (row 0 is the HUD).
const PLAY_TOP: u16 = 2;

fn rgb(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Field-to-terminal mapping for one frame.
struct Viewport {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(term_w: u16, term_h: u16, snap: &FrameSnapshot) -> Self {
        let cols = term_w.max(1);
        // HUD + spacer above, hint row below.
        let rows = term_h.saturating_sub(PLAY_TOP + 1).max(1);
        Viewport {
            cols,
            rows,
            scale_x: cols as f32 / snap.field.width,
            scale_y: rows as f32 / snap.field.height,
        }
    }

    fn col(&self, x: f32) -> u16 {
        ((x * self.scale_x).floor().max(0.0) as u16).min(self.cols - 1)
    }

    fn row(&self, y: f32) -> u16 {
        PLAY_TOP + ((y * self.scale_y).floor().max(0.0) as u16).min(self.rows - 1)
    }

    fn span_w(&self, w: f32) -> u16 {
        ((w * self.scale_x).round() as u16).max(1)
    }

    fn span_h(&self, h: f32) -> u16 {
        ((h * self.scale_y).round() as u16).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `notice` is the most recent end-of-stage or
/// end-of-run event, shown on the matching overlay.
pub fn render<W: Write>(
    out: &mut W,
    snap: &FrameSnapshot,
    notice: Option<&FrameEvent>,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(width, height, snap);

    match snap.hud.phase {
        Phase::Title => draw_title(out, width, height)?,
        _ => {
            draw_hud(out, &snap.hud, width)?;
            draw_ground(out, &view, snap)?;
            for sprite in &snap.sprites {
                draw_sprite(out, &view, sprite)?;
            }
            draw_controls_hint(out, height)?;
            draw_overlay(out, &snap.hud, notice, width, height)?;
        }
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STAGE))?;
    out.queue(Print(hud.stage_name))?;

    // HP bar, centred
    const BAR: usize = 20;
    let filled = (hud.health_fraction * BAR as f32).round() as usize;
    let bar = format!(
        "HP [{}{}] {:>3}/{}",
        "█".repeat(filled.min(BAR)),
        "░".repeat(BAR - filled.min(BAR)),
        hud.hp,
        hud.max_hp
    );
    let hp_color = if hud.health_fraction > 0.25 {
        C_HUD_HP
    } else {
        C_HUD_HP_LOW
    };
    let bx = (width / 2).saturating_sub(bar.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(hp_color))?;
    out.queue(Print(&bar))?;

    // Weapon and counters, right-aligned
    let right = format!(
        "{}  Enemies:{}  Shots:{}",
        hud.weapon, hud.enemy_count, hud.shot_count
    );
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
    out.queue(Print(&right))?;

    Ok(())
}

// ── Field ─────────────────────────────────────────────────────────────────────

fn draw_ground<W: Write>(out: &mut W, view: &Viewport, snap: &FrameSnapshot) -> std::io::Result<()> {
    let top = view.row(snap.field.ground_line());
    let bottom = PLAY_TOP + view.rows;
    out.queue(style::SetForegroundColor(C_GROUND))?;
    for row in top..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        let fill = if row == top { "▀" } else { "░" };
        out.queue(Print(fill.repeat(view.cols as usize)))?;
    }
    Ok(())
}

fn draw_sprite<W: Write>(out: &mut W, view: &Viewport, sprite: &SpriteView) -> std::io::Result<()> {
    if !sprite.visible {
        return Ok(());
    }
    let color = rgb(sprite.color);

    // Trail first so the head draws over it.
    out.queue(style::SetForegroundColor(color))?;
    for point in &sprite.trail {
        if point.alpha < 0.5 {
            continue;
        }
        out.queue(cursor::MoveTo(view.col(point.x), view.row(point.y)))?;
        out.queue(Print("·"))?;
    }

    let col = view.col(sprite.x);
    let row = view.row(sprite.y);
    let w = view.span_w(sprite.width).min(view.cols - col);
    let h = view.span_h(sprite.height);

    let glyph = match sprite.kind {
        SpriteKind::Player => "█",
        SpriteKind::Enemy(_) => "▓",
        SpriteKind::PlayerShot(_) => "=",
        SpriteKind::EnemyShot => "•",
    };
    out.queue(style::SetForegroundColor(color))?;
    for dy in 0..h {
        out.queue(cursor::MoveTo(col, row + dy))?;
        out.queue(Print(glyph.repeat(w as usize)))?;
    }

    if let Some(fraction) = sprite.health_fraction {
        let filled = ((fraction * w as f32).round() as u16).min(w);
        out.queue(cursor::MoveTo(col, row.saturating_sub(1).max(PLAY_TOP)))?;
        out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
        out.queue(Print("▄".repeat(filled as usize)))?;
    }

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Jump   Z X : Shoot   C : Weapon   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Screens & overlays ────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let lines = [
        ("★  CYBER  STAGE  ★".to_string(), Color::Cyan),
        (String::new(), Color::Reset),
        ("Clear seven stages and defeat every boss.".to_string(), Color::White),
        ("Each boss drops a new weapon.".to_string(), Color::DarkGrey),
        (String::new(), Color::Reset),
        ("ENTER : Start   Q : Quit".to_string(), Color::Yellow),
    ];
    draw_centered(out, &lines, width, height)
}

fn unlocked_line(unlocked: &Option<WeaponKind>) -> Option<(String, Color)> {
    unlocked.map(|w| (format!("New weapon: {}!", w.name()), Color::Yellow))
}

fn draw_overlay<W: Write>(
    out: &mut W,
    hud: &Hud,
    notice: Option<&FrameEvent>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut lines: Vec<(String, Color)> = Vec::new();
    match hud.phase {
        Phase::Title | Phase::Running => return Ok(()),
        Phase::Paused => {
            lines.push(("║   PAUSED   ║".to_string(), Color::White));
            lines.push(("P - Resume".to_string(), Color::DarkGrey));
        }
        Phase::StageClear => {
            lines.push(("╔══ STAGE CLEAR ══╗".to_string(), Color::Green));
            if let Some(FrameEvent::StageCleared { boss, unlocked, .. }) = notice {
                lines.push((format!("{boss} defeated!"), Color::White));
                lines.extend(unlocked_line(unlocked));
            }
            lines.push(("ENTER - Next Stage".to_string(), Color::DarkGrey));
        }
        Phase::GameOver => {
            lines.push(("╔════════════════════╗".to_string(), Color::Red));
            lines.push(("║    GAME  OVER      ║".to_string(), Color::Red));
            lines.push(("╚════════════════════╝".to_string(), Color::Red));
            lines.push((format!("Reached {}", hud.stage_name), Color::Yellow));
            lines.push(("R - Play Again  T - Title  Q - Quit".to_string(), Color::White));
        }
        Phase::GameComplete => {
            lines.push(("★ ALL STAGES CLEAR ★".to_string(), Color::Yellow));
            if let Some(FrameEvent::GameComplete { boss, unlocked }) = notice {
                lines.push((format!("{boss} defeated!"), Color::White));
                lines.extend(unlocked_line(unlocked));
            }
            lines.push(("ENTER - Title".to_string(), Color::DarkGrey));
        }
    }
    draw_centered(out, &lines, width, height)
}
