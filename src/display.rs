/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands, scaling the continuous field onto
/// whatever grid the terminal offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_raid::entities::{
    AvatarMode, Beam, Bomb, Enemy, Explosion, GameState, GameStatus, GravityWell, Shield,
};
use sky_raid::geometry::{FIELD_H, FIELD_W};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_AVATAR: Color = Color::White;
const C_AVATAR_HYPER: Color = Color::Cyan;
const C_AVATAR_PULSE: Color = Color::Yellow;
const C_BEAM: Color = Color::Cyan;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_DISARMED: Color = Color::DarkGrey;
const C_SHIELD: Color = Color::Blue;
const C_WELL: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_FLASH: Color = Color::Yellow;

/// One colour per bomb hue index.
const BOMB_COLORS: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
];

/// Oriented avatar glyph for each of the 8 facing directions.
const AVATAR_GLYPHS: [((i8, i8), char); 8] = [
    ((1, 0), '▶'),
    ((1, -1), '◹'),
    ((0, -1), '▲'),
    ((-1, -1), '◸'),
    ((-1, 0), '◀'),
    ((-1, 1), '◺'),
    ((0, 1), '▼'),
    ((1, 1), '◿'),
];

const ENEMY_GLYPHS: [char; 3] = ['Ψ', 'Ж', 'Ω'];
const EXPLOSION_GLYPHS: [char; 2] = ['✶', '✳'];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Terminal grid the field is scaled into.  Row 0 is the HUD, row 1 and
/// rows-2 the border, the last row the controls hint.
#[derive(Clone, Copy)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn current() -> std::io::Result<Viewport> {
        let (cols, rows) = terminal::size()?;
        Ok(Viewport { cols, rows })
    }

    fn interior(&self) -> (u16, u16) {
        (self.cols.saturating_sub(2).max(1), self.rows.saturating_sub(4).max(1))
    }

    /// Map a field-space point to a terminal cell inside the border.
    fn cell(&self, fx: f32, fy: f32) -> (u16, u16) {
        let (iw, ih) = self.interior();
        let col = 1 + ((fx / FIELD_W) * iw as f32) as i32;
        let row = 2 + ((fy / FIELD_H) * ih as f32) as i32;
        (
            col.clamp(1, iw as i32) as u16,
            row.clamp(2, 1 + ih as i32) as u16,
        )
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, vp: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, vp)?;

    if let Some(shield) = &state.shield {
        draw_shield(out, shield, vp)?;
    }
    draw_avatar(out, state, vp)?;
    for beam in &state.beams {
        draw_beam(out, beam, vp)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, vp)?;
    }
    for bomb in &state.bombs {
        draw_bomb(out, bomb, vp)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, explosion, vp)?;
    }
    for well in &state.wells {
        draw_well(out, well, vp)?;
    }

    draw_hud(out, state, vp)?;
    draw_controls_hint(out, vp)?;

    if state.status == GameStatus::GameOver {
        draw_defeat(out, state, vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Full-field flash shown for the EMP feedback beat.  The caller holds the
/// frame for the beat's duration before rendering resumes.
pub fn emp_flash<W: Write>(out: &mut W, vp: Viewport) -> std::io::Result<()> {
    let (iw, ih) = vp.interior();
    out.queue(style::SetForegroundColor(C_FLASH))?;
    for row in 2..2 + ih {
        out.queue(cursor::MoveTo(1, row))?;
        out.queue(Print("▓".repeat(iw as usize)))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border & HUD ──────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: Viewport) -> std::io::Result<()> {
    let w = vp.cols as usize;
    let h = vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, state: &GameState, vp: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score.value)))?;

    // Live ability state — right side
    let mut tags: Vec<String> = Vec::new();
    if state.avatar.mode == AvatarMode::Hyper {
        tags.push(format!("[HYPER {:>3}]", state.avatar.hyper_frames));
    }
    if let Some(shield) = &state.shield {
        tags.push(format!("[SHIELD {:>3}]", shield.life));
    }
    if let Some(well) = state.wells.first() {
        tags.push(format!("[WELL {:>3}]", well.life));
    }
    if !tags.is_empty() {
        let right = tags.join(" ");
        let rx = vp.cols.saturating_sub(right.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, 0))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(right))?;
    }

    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, vp: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→ Move  ⇧ Boost  SPACE Beam  Z+SPACE Fan  E EMP  S Shield  H Hyper  G Well  Q Quit",
    ))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_avatar<W: Write>(out: &mut W, state: &GameState, vp: Viewport) -> std::io::Result<()> {
    let avatar = &state.avatar;
    let glyph = AVATAR_GLYPHS
        .iter()
        .find(|(dire, _)| *dire == avatar.dire)
        .map(|&(_, g)| g)
        .unwrap_or('▶');

    let color = if state.status == GameStatus::GameOver {
        Color::Red
    } else if avatar.mode == AvatarMode::Hyper {
        C_AVATAR_HYPER
    } else if avatar.pulse_frames > 0 {
        C_AVATAR_PULSE
    } else {
        C_AVATAR
    };

    let (cx, cy) = avatar.rect.center();
    let (col, row) = vp.cell(cx, cy);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, vp: Viewport) -> std::io::Result<()> {
    let (cx, cy) = enemy.rect.center();
    let (col, row) = vp.cell(cx, cy);
    out.queue(cursor::MoveTo(col, row))?;
    if enemy.interval.is_some() {
        out.queue(style::SetForegroundColor(C_ENEMY))?;
        out.queue(Print(ENEMY_GLYPHS[enemy.look % ENEMY_GLYPHS.len()]))?;
    } else {
        // Disarmed by EMP
        out.queue(style::SetForegroundColor(C_ENEMY_DISARMED))?;
        out.queue(Print('ø'))?;
    }
    Ok(())
}

fn draw_bomb<W: Write>(out: &mut W, bomb: &Bomb, vp: Viewport) -> std::io::Result<()> {
    let (cx, cy) = bomb.rect.center();
    let (col, row) = vp.cell(cx, cy);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(BOMB_COLORS[bomb.hue % BOMB_COLORS.len()]))?;
    out.queue(Print('●'))?;
    Ok(())
}

fn draw_beam<W: Write>(out: &mut W, beam: &Beam, vp: Viewport) -> std::io::Result<()> {
    // Pick the glyph whose slope best matches the beam's angle
    let octant = ((beam.angle.rem_euclid(180.0) + 22.5) / 45.0) as i32 % 4;
    let glyph = match octant {
        0 => '─',
        1 => '╱',
        2 => '│',
        _ => '╲',
    };
    let (cx, cy) = beam.rect.center();
    let (col, row) = vp.cell(cx, cy);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_BEAM))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_explosion<W: Write>(
    out: &mut W,
    explosion: &Explosion,
    vp: Viewport,
) -> std::io::Result<()> {
    let (cx, cy) = explosion.rect.center();
    let (col, row) = vp.cell(cx, cy);
    out.queue(cursor::MoveTo(col, row))?;
    let color = if explosion.phase() == 0 { Color::Yellow } else { Color::Red };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(EXPLOSION_GLYPHS[explosion.phase()]))?;
    Ok(())
}

fn draw_shield<W: Write>(out: &mut W, shield: &Shield, vp: Viewport) -> std::io::Result<()> {
    // Three cells along the long axis, perpendicular to the facing
    let glyph = match shield.dire {
        (_, 0) => '▌',
        (0, _) => '▬',
        (1, 1) | (-1, -1) => '▞',
        _ => '▚',
    };
    let (cx, cy) = shield.rect.center();
    let (col, row) = vp.cell(cx, cy);
    let (dx, dy): (i32, i32) = match shield.dire {
        (_, 0) => (0, 1),
        (0, _) => (1, 0),
        _ => (1, -(shield.dire.0 * shield.dire.1) as i32),
    };
    out.queue(style::SetForegroundColor(C_SHIELD))?;
    for k in -1..=1i32 {
        let c = col as i32 + k * dx;
        let r = row as i32 + k * dy;
        if c >= 1 && r >= 2 && c < vp.cols as i32 - 1 && r < vp.rows as i32 - 2 {
            out.queue(cursor::MoveTo(c as u16, r as u16))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

fn draw_well<W: Write>(out: &mut W, _well: &GravityWell, vp: Viewport) -> std::io::Result<()> {
    // Translucent overlay: every other cell, so entities stay readable
    let (iw, ih) = vp.interior();
    out.queue(style::SetForegroundColor(C_WELL))?;
    for row in 0..ih {
        for col in 0..iw {
            if (row + col) % 2 == 0 {
                out.queue(cursor::MoveTo(1 + col, 2 + row))?;
                out.queue(Print('░'))?;
            }
        }
    }
    Ok(())
}

// ── Defeat overlay ────────────────────────────────────────────────────────────

fn draw_defeat<W: Write>(out: &mut W, state: &GameState, vp: Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score.value);

    let lines: &[&str] = &[
        "╔════════════════════╗",
        "║    AVATAR  DOWN    ║",
        "╚════════════════════╝",
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(2);

    out.queue(style::SetForegroundColor(Color::Red))?;
    for (i, msg) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*msg))?;
    }

    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, start_row + lines.len() as u16))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score_line))?;

    Ok(())
}
