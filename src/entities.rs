/// Entity types and their per-frame update rules.
///
/// Each entity owns its box, its velocity and its lifecycle counters; the
/// orchestration in `compute` only decides *when* things advance, spawn and
/// die.  Constructors take an injected RNG handle where spawn geometry is
/// randomized, so callers control determinism.

use rand::Rng;

use crate::geometry::{check_bound, direction_to, rotated_extent, Rect, FIELD_H, FIELD_W};

// ── Tuning constants ─────────────────────────────────────────────────────────

pub const AVATAR_SIZE: f32 = 60.0;
pub const AVATAR_SPEED: f32 = 10.0;
pub const AVATAR_BOOST_SPEED: f32 = 20.0;
/// Frames of invulnerability granted by the Hyper ability.
pub const HYPER_FRAMES: u32 = 500;
/// Frames the celebratory visual lingers after an enemy kill.
pub const PULSE_FRAMES: u32 = 30;

pub const ENEMY_SIZE: f32 = 70.0;
pub const ENEMY_DESCENT_SPEED: f32 = 6.0;
/// Number of distinct enemy looks the renderer can pick from.
pub const ENEMY_LOOKS: usize = 3;

pub const BOMB_SPEED: f32 = 6.0;
/// Number of entries in the bomb hue palette.
pub const BOMB_HUES: usize = 6;

pub const BEAM_SPEED: f32 = 10.0;
pub const BEAM_W: f32 = 50.0;
pub const BEAM_H: f32 = 16.0;
/// Half-arc of the beam fan, degrees to each side of the facing.
pub const FAN_HALF_ARC: f32 = 50.0;

pub const SHIELD_THICKNESS: f32 = 20.0;
pub const SHIELD_FRAMES: i64 = 400;
pub const WELL_FRAMES: i64 = 400;

/// Explosion lifetimes: long for enemies, short for bombs.
pub const EXPLOSION_LONG: i64 = 100;
pub const EXPLOSION_SHORT: i64 = 50;

// ── Input snapshot ───────────────────────────────────────────────────────────

/// Movement keys held during one frame.  Built by the platform layer from
/// whatever input source it has; the simulation only sees this snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

// ── Avatar ───────────────────────────────────────────────────────────────────

/// The 8 facing directions, as (dx, dy) sign tuples.  The renderer keys its
/// oriented glyphs off these exact values.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AvatarMode {
    Normal,
    Hyper,
}

#[derive(Clone, Debug)]
pub struct Avatar {
    pub rect: Rect,
    /// Facing direction, always one of `DIRECTIONS`.
    pub dire: (i8, i8),
    pub speed: f32,
    pub boost_speed: f32,
    pub mode: AvatarMode,
    /// Invulnerable frames remaining.  Positive iff `mode == Hyper`.
    pub hyper_frames: u32,
    /// Celebration countdown after an enemy kill.  Cosmetic only.
    pub pulse_frames: u32,
}

impl Avatar {
    pub fn new(cx: f32, cy: f32) -> Avatar {
        Avatar {
            rect: Rect::from_center(cx, cy, AVATAR_SIZE, AVATAR_SIZE),
            dire: (1, 0),
            speed: AVATAR_SPEED,
            boost_speed: AVATAR_BOOST_SPEED,
            mode: AvatarMode::Normal,
            hyper_frames: 0,
            pulse_frames: 0,
        }
    }

    /// Facing angle in degrees, counter-clockwise from +x (screen y is down).
    pub fn facing_angle(&self) -> f32 {
        (-self.dire.1 as f32).atan2(self.dire.0 as f32).to_degrees()
    }

    /// Apply one frame of held-key movement plus the mode countdowns.
    ///
    /// Held directions are summed, so opposing keys cancel and adjacent keys
    /// combine into a diagonal.  A move that would leave the field is
    /// reverted whole, never clamped.  The facing only changes when the net
    /// movement is non-zero.
    pub fn update(&mut self, keys: &MoveKeys) {
        let mut sum = (0i8, 0i8);
        if keys.up {
            sum.1 -= 1;
        }
        if keys.down {
            sum.1 += 1;
        }
        if keys.left {
            sum.0 -= 1;
        }
        if keys.right {
            sum.0 += 1;
        }

        let speed = if keys.boost { self.boost_speed } else { self.speed };

        self.rect.shift(speed * sum.0 as f32, speed * sum.1 as f32);
        if check_bound(&self.rect) != (true, true) {
            self.rect.shift(-speed * sum.0 as f32, -speed * sum.1 as f32);
        }

        if sum != (0, 0) {
            self.dire = sum;
        }

        if self.mode == AvatarMode::Hyper {
            self.hyper_frames = self.hyper_frames.saturating_sub(1);
            if self.hyper_frames == 0 {
                self.mode = AvatarMode::Normal;
            }
        }

        self.pulse_frames = self.pulse_frames.saturating_sub(1);
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyPhase {
    Descending,
    Holding,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    pub vy: f32,
    /// Stop row: the enemy holds once its center reaches this y.
    pub bound: f32,
    pub phase: EnemyPhase,
    /// Frames between bomb drops while holding.  `None` = disarmed by EMP.
    pub interval: Option<u64>,
    /// Which of the enemy looks the renderer draws.
    pub look: usize,
}

impl Enemy {
    pub fn spawn(rng: &mut impl Rng) -> Enemy {
        Enemy {
            rect: Rect::from_center(rng.gen_range(0.0..=FIELD_W), 0.0, ENEMY_SIZE, ENEMY_SIZE),
            vy: ENEMY_DESCENT_SPEED,
            bound: rng.gen_range(50.0..=FIELD_H / 2.0),
            phase: EnemyPhase::Descending,
            interval: Some(rng.gen_range(50..=300)),
            look: rng.gen_range(0..ENEMY_LOOKS),
        }
    }

    /// Descend until the stop row, then hold.  The Descending→Holding
    /// transition fires exactly once, the first frame center.y reaches the
    /// stop row.
    pub fn advance(&mut self) {
        if self.phase == EnemyPhase::Descending && self.rect.center().1 >= self.bound {
            self.vy = 0.0;
            self.phase = EnemyPhase::Holding;
        }
        self.rect.shift(0.0, self.vy);
    }

    /// True when a holding enemy's drop cadence lands on `frame`.
    pub fn ready_to_drop(&self, frame: u64) -> bool {
        self.phase == EnemyPhase::Holding
            && self.interval.map_or(false, |i| frame % i == 0)
    }

    /// EMP effect: never drops again.  Permanent; the disarmed look persists
    /// until the enemy is destroyed.
    pub fn disarm(&mut self) {
        self.interval = None;
    }
}

// ── Bomb ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BombState {
    Active,
    /// Half effective speed.  Entered only via EMP, never reverts.
    Slowed,
}

#[derive(Clone, Debug)]
pub struct Bomb {
    pub rect: Rect,
    /// Unit direction toward the avatar's position at spawn time.  No homing.
    pub dir: (f32, f32),
    pub speed: f32,
    pub state: BombState,
    /// Palette index for the renderer.
    pub hue: usize,
}

impl Bomb {
    /// Drop from `enemy`, aimed at where `avatar` is right now.
    pub fn new(enemy: &Enemy, avatar: &Avatar, rng: &mut impl Rng) -> Bomb {
        let radius: f32 = rng.gen_range(10.0..=50.0);
        let (cx, cy) = enemy.rect.center();
        Bomb {
            rect: Rect::from_center(cx, cy + enemy.rect.h / 2.0, 2.0 * radius, 2.0 * radius),
            dir: direction_to(&enemy.rect, &avatar.rect),
            speed: BOMB_SPEED,
            state: BombState::Active,
            hue: rng.gen_range(0..BOMB_HUES),
        }
    }

    pub fn advance(&mut self) {
        let speed = match self.state {
            BombState::Active => self.speed,
            BombState::Slowed => self.speed / 2.0,
        };
        self.rect.shift(speed * self.dir.0, speed * self.dir.1);
    }

    pub fn in_field(&self) -> bool {
        check_bound(&self.rect) == (true, true)
    }
}

// ── Beam ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Beam {
    pub rect: Rect,
    pub dir: (f32, f32),
    pub speed: f32,
    /// Absolute angle in degrees, kept for the oriented visual.
    pub angle: f32,
}

impl Beam {
    /// Fire from the avatar's facing, rotated by `offset_deg`.
    ///
    /// Velocity and box orientation are fixed at creation; the spawn point
    /// sits one avatar-box ahead along the resulting direction.
    pub fn new(avatar: &Avatar, offset_deg: f32) -> Beam {
        let angle = avatar.facing_angle() + offset_deg;
        let rad = angle.to_radians();
        let dir = (rad.cos(), -rad.sin());
        let (w, h) = rotated_extent(BEAM_W, BEAM_H, angle);
        let (cx, cy) = avatar.rect.center();
        Beam {
            rect: Rect::from_center(
                cx + avatar.rect.w * dir.0,
                cy + avatar.rect.h * dir.1,
                w,
                h,
            ),
            dir,
            speed: BEAM_SPEED,
            angle,
        }
    }

    /// A fan of `num` beams spread evenly across the ±`FAN_HALF_ARC` arc,
    /// endpoints included.  `num < 2` leaves the spacing undefined and is
    /// rejected.
    pub fn fan(avatar: &Avatar, num: usize) -> Option<Vec<Beam>> {
        if num < 2 {
            return None;
        }
        let step = 2.0 * FAN_HALF_ARC / (num - 1) as f32;
        Some(
            (0..num)
                .map(|i| Beam::new(avatar, -FAN_HALF_ARC + i as f32 * step))
                .collect(),
        )
    }

    pub fn advance(&mut self) {
        self.rect.shift(self.speed * self.dir.0, self.speed * self.dir.1);
    }

    pub fn in_field(&self) -> bool {
        check_bound(&self.rect) == (true, true)
    }
}

// ── Explosion ────────────────────────────────────────────────────────────────

/// Cosmetic destruction effect.  Never participates in collision.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    /// Remaining frames; the effect expires once this goes negative.
    pub life: i64,
}

impl Explosion {
    /// Snapshot the victim's box at its moment of destruction.
    pub fn new(at: &Rect, life: i64) -> Explosion {
        Explosion { rect: *at, life }
    }

    pub fn advance(&mut self) {
        self.life -= 1;
    }

    pub fn expired(&self) -> bool {
        self.life < 0
    }

    /// Alternates 0/1 every 10 frames of remaining life.
    pub fn phase(&self) -> usize {
        self.life.div_euclid(10).rem_euclid(2) as usize
    }
}

// ── Shield ───────────────────────────────────────────────────────────────────

/// One-sided blocker anchored ahead of the avatar.  Destroys bombs on
/// contact without being consumed; only its timer ends it.
#[derive(Clone, Debug)]
pub struct Shield {
    pub rect: Rect,
    /// Facing at creation, kept for the oriented visual.
    pub dire: (i8, i8),
    pub life: i64,
}

impl Shield {
    pub fn new(avatar: &Avatar, life: i64) -> Shield {
        let angle = avatar.facing_angle();
        let (w, h) = rotated_extent(SHIELD_THICKNESS, avatar.rect.h * 2.0, angle);
        let (cx, cy) = avatar.rect.center();
        Shield {
            rect: Rect::from_center(
                cx + avatar.dire.0 as f32 * avatar.rect.w,
                cy + avatar.dire.1 as f32 * avatar.rect.h,
                w,
                h,
            ),
            dire: avatar.dire,
            life,
        }
    }

    pub fn advance(&mut self) {
        self.life -= 1;
    }

    pub fn expired(&self) -> bool {
        self.life <= 0
    }
}

// ── Gravity well ─────────────────────────────────────────────────────────────

/// Full-field destroyer overlay.  No motion; purely a collision trigger.
#[derive(Clone, Debug)]
pub struct GravityWell {
    pub rect: Rect,
    pub life: i64,
}

impl GravityWell {
    pub fn new(life: i64) -> GravityWell {
        GravityWell {
            rect: Rect {
                x: 0.0,
                y: 0.0,
                w: FIELD_W,
                h: FIELD_H,
            },
            life,
        }
    }

    pub fn advance(&mut self) {
        self.life -= 1;
    }

    pub fn expired(&self) -> bool {
        self.life < 0
    }
}

// ── Score ledger ─────────────────────────────────────────────────────────────

/// The single resource currency.  Collision rewards add; abilities deduct
/// only after an explicit threshold check, so the value never underflows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    pub value: u32,
}

impl Score {
    pub fn new() -> Score {
        Score { value: 0 }
    }

    pub fn award(&mut self, points: u32) {
        self.value += points;
    }

    /// Deduct `cost` iff the balance covers it.  Returns whether it did.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if self.value >= cost {
            self.value -= cost;
            true
        } else {
            false
        }
    }
}

// ── Master game state ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// The entire simulation state.  Cloneable so the pure update functions in
/// `compute` and `abilities` can return a new copy without mutating the
/// original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub avatar: Avatar,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub beams: Vec<Beam>,
    pub explosions: Vec<Explosion>,
    /// At most one live shield, system-wide.
    pub shield: Option<Shield>,
    pub wells: Vec<GravityWell>,
    pub score: Score,
    pub status: GameStatus,
    pub frame: u64,
}
