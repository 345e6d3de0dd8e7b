/// Pure simulation orchestration.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where spawning needs it, an RNG handle) and returns a
/// brand-new `GameState`.  Side effects are limited to the injected RNG, so
/// a seeded RNG makes whole sessions reproducible.

use rand::Rng;

use crate::entities::{
    Avatar, Beam, Bomb, Enemy, Explosion, GameState, GameStatus, MoveKeys, Score,
    AvatarMode, EXPLOSION_LONG, EXPLOSION_SHORT, PULSE_FRAMES,
};

// ── Cadence & reward tables ──────────────────────────────────────────────────

/// Frames between enemy spawns.
pub const ENEMY_SPAWN_INTERVAL: u64 = 200;
/// Beams in the fan shot.
pub const FAN_BEAM_COUNT: usize = 5;

/// Score awarded per enemy destroyed.
const ENEMY_POINTS: u32 = 10;
/// Score awarded per bomb destroyed.
const BOMB_POINTS: u32 = 1;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: avatar on the right side of the field,
/// nothing else live yet.
pub fn init_state() -> GameState {
    GameState {
        avatar: Avatar::new(900.0, 400.0),
        enemies: Vec::new(),
        bombs: Vec::new(),
        beams: Vec::new(),
        explosions: Vec::new(),
        shield: None,
        wells: Vec::new(),
        score: Score::new(),
        status: GameStatus::Playing,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Fire a single beam along the avatar's facing.
pub fn fire_beam(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.beams.push(Beam::new(&next.avatar, 0.0));
    next
}

/// Fire the fan shot.
pub fn fire_fan(state: &GameState) -> GameState {
    let mut next = state.clone();
    if let Some(beams) = Beam::fan(&next.avatar, FAN_BEAM_COUNT) {
        next.beams.extend(beams);
    }
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one frame.
///
/// Strict order: avatar motion from the held-key snapshot, spawn cadence,
/// bomb drops, every entity advances, collisions resolve against the
/// post-motion positions, expired entities leave, the frame counter bumps.
pub fn tick(state: &GameState, keys: &MoveKeys, rng: &mut impl Rng) -> GameState {
    // Terminal state is frozen: nothing moves, nothing scores.
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let mut next = state.clone();

    // ── 1. Avatar motion + mode countdowns ───────────────────────────────────
    next.avatar.update(keys);

    // ── 2. Enemy spawn cadence ───────────────────────────────────────────────
    // Uses the pre-increment counter, so frame 0 spawns the first enemy.
    if next.frame % ENEMY_SPAWN_INTERVAL == 0 {
        next.enemies.push(Enemy::spawn(rng));
    }

    // ── 3. Holding enemies drop bombs ────────────────────────────────────────
    let drops: Vec<Bomb> = next
        .enemies
        .iter()
        .filter(|e| e.ready_to_drop(next.frame))
        .map(|e| Bomb::new(e, &next.avatar, rng))
        .collect();
    next.bombs.extend(drops);

    // ── 4. Advance every entity ──────────────────────────────────────────────
    for enemy in &mut next.enemies {
        enemy.advance();
    }
    for bomb in &mut next.bombs {
        bomb.advance();
    }
    for beam in &mut next.beams {
        beam.advance();
    }
    for explosion in &mut next.explosions {
        explosion.advance();
    }
    if let Some(shield) = &mut next.shield {
        shield.advance();
    }
    for well in &mut next.wells {
        well.advance();
    }

    // ── 5. Collision resolution ──────────────────────────────────────────────
    resolve_collisions(&mut next);

    // ── 6. Expiry cleanup ────────────────────────────────────────────────────
    next.bombs.retain(Bomb::in_field);
    next.beams.retain(Beam::in_field);
    next.explosions.retain(|e| !e.expired());
    if next.shield.as_ref().map_or(false, |s| s.expired()) {
        next.shield = None;
    }
    next.wells.retain(|w| !w.expired());

    next.frame += 1;
    next
}

// ── Collision engine ─────────────────────────────────────────────────────────

/// Remove the elements of `items` whose positions appear in `dead`.
fn drop_indices<T>(items: &mut Vec<T>, dead: &[usize]) {
    let mut i = 0;
    items.retain(|_| {
        let keep = !dead.contains(&i);
        i += 1;
        keep
    });
}

/// Group-vs-group resolution, in fixed order.  Each rule consumes its
/// victims before the next runs, so an entity destroyed early can never
/// match a later rule in the same frame.  The shield rule runs before the
/// avatar rule: a bomb overlapping both is blocked, not lethal.
fn resolve_collisions(state: &mut GameState) {
    // ── Enemy × Beam: both destroyed, long explosion, +10 ────────────────────
    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_beams: Vec<usize> = Vec::new();
    for (ei, enemy) in state.enemies.iter().enumerate() {
        for (bi, beam) in state.beams.iter().enumerate() {
            if enemy.rect.overlaps(&beam.rect) {
                if !killed_enemies.contains(&ei) {
                    killed_enemies.push(ei);
                }
                if !used_beams.contains(&bi) {
                    used_beams.push(bi);
                }
            }
        }
    }
    for &ei in &killed_enemies {
        state
            .explosions
            .push(Explosion::new(&state.enemies[ei].rect, EXPLOSION_LONG));
        state.score.award(ENEMY_POINTS);
        state.avatar.pulse_frames = PULSE_FRAMES;
    }
    drop_indices(&mut state.enemies, &killed_enemies);
    drop_indices(&mut state.beams, &used_beams);

    // ── Bomb × Beam: both destroyed, short explosion, +1 ─────────────────────
    let mut killed_bombs: Vec<usize> = Vec::new();
    let mut used_beams: Vec<usize> = Vec::new();
    for (bi, bomb) in state.bombs.iter().enumerate() {
        for (mi, beam) in state.beams.iter().enumerate() {
            if bomb.rect.overlaps(&beam.rect) {
                if !killed_bombs.contains(&bi) {
                    killed_bombs.push(bi);
                }
                if !used_beams.contains(&mi) {
                    used_beams.push(mi);
                }
            }
        }
    }
    for &bi in &killed_bombs {
        state
            .explosions
            .push(Explosion::new(&state.bombs[bi].rect, EXPLOSION_SHORT));
        state.score.award(BOMB_POINTS);
    }
    drop_indices(&mut state.bombs, &killed_bombs);
    drop_indices(&mut state.beams, &used_beams);

    // ── Bomb × Shield: bomb destroyed, shield survives, no score ─────────────
    if let Some(shield) = &state.shield {
        let shield_rect = shield.rect;
        let mut blocked: Vec<usize> = Vec::new();
        for (bi, bomb) in state.bombs.iter().enumerate() {
            if bomb.rect.overlaps(&shield_rect) {
                blocked.push(bi);
            }
        }
        for &bi in &blocked {
            state
                .explosions
                .push(Explosion::new(&state.bombs[bi].rect, EXPLOSION_SHORT));
        }
        drop_indices(&mut state.bombs, &blocked);
    }

    // ── Bomb × Avatar: blocked above by the shield, lethal unless Hyper ──────
    let mut struck: Vec<usize> = Vec::new();
    for (bi, bomb) in state.bombs.iter().enumerate() {
        if bomb.rect.overlaps(&state.avatar.rect) {
            struck.push(bi);
        }
    }
    if !struck.is_empty() {
        if state.avatar.mode == AvatarMode::Hyper {
            for &bi in &struck {
                state
                    .explosions
                    .push(Explosion::new(&state.bombs[bi].rect, EXPLOSION_SHORT));
                state.score.award(BOMB_POINTS);
            }
            drop_indices(&mut state.bombs, &struck);
        } else {
            // Terminal: the frame's mutations so far stand, nothing later
            // in this frame scores.
            drop_indices(&mut state.bombs, &struck);
            state.status = GameStatus::GameOver;
            log::info!("avatar destroyed at frame {}", state.frame);
            return;
        }
    }

    // ── GravityWell × Bomb / Enemy: blanket destruction, scored ──────────────
    for wi in 0..state.wells.len() {
        let well_rect = state.wells[wi].rect;

        let mut pulled: Vec<usize> = Vec::new();
        for (bi, bomb) in state.bombs.iter().enumerate() {
            if bomb.rect.overlaps(&well_rect) {
                pulled.push(bi);
            }
        }
        for &bi in &pulled {
            state
                .explosions
                .push(Explosion::new(&state.bombs[bi].rect, EXPLOSION_SHORT));
            state.score.award(BOMB_POINTS);
        }
        drop_indices(&mut state.bombs, &pulled);

        let mut pulled: Vec<usize> = Vec::new();
        for (ei, enemy) in state.enemies.iter().enumerate() {
            if enemy.rect.overlaps(&well_rect) {
                pulled.push(ei);
            }
        }
        for &ei in &pulled {
            state
                .explosions
                .push(Explosion::new(&state.enemies[ei].rect, EXPLOSION_LONG));
            state.score.award(ENEMY_POINTS);
        }
        drop_indices(&mut state.enemies, &pulled);
    }
}
