use sky_raid::abilities::*;
use sky_raid::compute::init_state;
use sky_raid::entities::*;
use sky_raid::geometry::Rect;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn state_with_score(value: u32) -> GameState {
    let mut s = init_state();
    s.score.value = value;
    s
}

// ── Costs ─────────────────────────────────────────────────────────────────────

#[test]
fn ability_costs() {
    assert_eq!(Ability::Emp.cost(), 20);
    assert_eq!(Ability::Shield.cost(), 50);
    assert_eq!(Ability::Hyper.cost(), 100);
    assert_eq!(Ability::GravityWell.cost(), 200);
}

// ── Score gating ──────────────────────────────────────────────────────────────

#[test]
fn emp_with_enough_score_deducts() {
    let s = state_with_score(25);
    let next = activate(&s, Ability::Emp).expect("should activate");
    assert_eq!(next.score.value, 5);
}

#[test]
fn emp_below_threshold_is_a_no_op() {
    let s = state_with_score(15);
    assert!(activate(&s, Ability::Emp).is_none());
    assert_eq!(s.score.value, 15); // caller's state untouched
}

#[test]
fn exact_threshold_activates() {
    let s = state_with_score(200);
    let next = activate(&s, Ability::GravityWell).expect("should activate");
    assert_eq!(next.score.value, 0);
}

#[test]
fn every_ability_refuses_insufficient_score() {
    let s = state_with_score(19);
    assert!(activate(&s, Ability::Emp).is_none());
    assert!(activate(&s, Ability::Shield).is_none());
    assert!(activate(&s, Ability::Hyper).is_none());
    assert!(activate(&s, Ability::GravityWell).is_none());
}

// ── Shield ────────────────────────────────────────────────────────────────────

#[test]
fn shield_activation_spawns_one_shield() {
    let s = state_with_score(50);
    let next = activate(&s, Ability::Shield).expect("should activate");
    assert!(next.shield.is_some());
    assert_eq!(next.score.value, 0);
    assert_eq!(next.shield.as_ref().unwrap().life, SHIELD_FRAMES);
}

#[test]
fn second_shield_is_refused_and_costs_nothing() {
    let s = state_with_score(200);
    let one = activate(&s, Ability::Shield).expect("first should activate");
    assert_eq!(one.score.value, 150);

    assert!(activate(&one, Ability::Shield).is_none());
    assert_eq!(one.score.value, 150); // the refused press never spent
}

// ── Hyper ─────────────────────────────────────────────────────────────────────

#[test]
fn hyper_grants_invulnerable_frames() {
    let s = state_with_score(100);
    let next = activate(&s, Ability::Hyper).expect("should activate");
    assert_eq!(next.avatar.mode, AvatarMode::Hyper);
    assert_eq!(next.avatar.hyper_frames, HYPER_FRAMES);
    assert_eq!(next.score.value, 0);
}

#[test]
fn hyper_requires_normal_mode() {
    let mut s = state_with_score(300);
    s.avatar.mode = AvatarMode::Hyper;
    s.avatar.hyper_frames = 100;

    assert!(activate(&s, Ability::Hyper).is_none());
}

// ── Gravity well ──────────────────────────────────────────────────────────────

#[test]
fn wells_may_stack() {
    let s = state_with_score(400);
    let one = activate(&s, Ability::GravityWell).unwrap();
    let two = activate(&one, Ability::GravityWell).unwrap();
    assert_eq!(two.wells.len(), 2);
    assert_eq!(two.score.value, 0);
}

// ── EMP sweep ─────────────────────────────────────────────────────────────────

#[test]
fn emp_disarms_live_enemies_and_slows_live_bombs() {
    let mut rng = seeded_rng();
    let mut s = state_with_score(20);

    let mut enemy = Enemy::spawn(&mut rng);
    enemy.rect = Rect::from_center(200.0, 100.0, ENEMY_SIZE, ENEMY_SIZE);
    enemy.phase = EnemyPhase::Holding;
    let bomb = Bomb::new(&enemy, &s.avatar, &mut rng);
    s.enemies.push(enemy);
    s.bombs.push(bomb);

    let next = activate(&s, Ability::Emp).expect("should activate");

    assert_eq!(next.enemies[0].interval, None);
    assert_eq!(next.bombs[0].state, BombState::Slowed);
    // Slowing is a state flip, not a speed rewrite: half effective step
    assert_eq!(next.bombs[0].speed, BOMB_SPEED);
}

#[test]
fn entities_spawned_after_emp_are_unaffected() {
    let s = state_with_score(20);
    let mut next = activate(&s, Ability::Emp).expect("should activate");

    let mut rng = seeded_rng();
    let enemy = Enemy::spawn(&mut rng);
    assert!(enemy.interval.is_some());
    let bomb = Bomb::new(&enemy, &next.avatar, &mut rng);
    assert_eq!(bomb.state, BombState::Active);

    next.enemies.push(enemy);
    next.bombs.push(bomb);
    assert!(next.enemies[0].interval.is_some());
}
