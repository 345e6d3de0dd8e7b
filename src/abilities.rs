/// Score-gated special abilities.
///
/// Activation is atomic: the threshold check (and any uniqueness gate) runs
/// first, and only a passing check deducts the cost and applies the effect.
/// A failed activation returns `None` and the caller's state is untouched,
/// so an ignored key press costs nothing.

use crate::entities::{
    AvatarMode, BombState, GameState, GravityWell, Shield, HYPER_FRAMES, SHIELD_FRAMES,
    WELL_FRAMES,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ability {
    Emp,
    Shield,
    Hyper,
    GravityWell,
}

impl Ability {
    pub const fn cost(self) -> u32 {
        match self {
            Ability::Emp => 20,
            Ability::Shield => 50,
            Ability::Hyper => 100,
            Ability::GravityWell => 200,
        }
    }
}

/// Attempt to activate `ability`, returning the resulting state, or `None`
/// when the score check or a uniqueness gate fails.
pub fn activate(state: &GameState, ability: Ability) -> Option<GameState> {
    // Uniqueness gates come before the spend so a blocked activation never
    // costs anything.
    match ability {
        Ability::Shield if state.shield.is_some() => return None,
        Ability::Hyper if state.avatar.mode != AvatarMode::Normal => return None,
        _ => {}
    }

    let mut next = state.clone();
    if !next.score.try_spend(ability.cost()) {
        return None;
    }

    match ability {
        Ability::Emp => apply_emp(&mut next),
        Ability::Shield => next.shield = Some(Shield::new(&next.avatar, SHIELD_FRAMES)),
        Ability::Hyper => {
            next.avatar.mode = AvatarMode::Hyper;
            next.avatar.hyper_frames = HYPER_FRAMES;
        }
        Ability::GravityWell => next.wells.push(GravityWell::new(WELL_FRAMES)),
    }

    log::debug!("{:?} activated, score {}", ability, next.score.value);
    Some(next)
}

/// One-shot pulse over everything currently live: enemies stop dropping
/// bombs for good, bombs crawl at half speed for good.  Entities spawned
/// afterwards are unaffected.
fn apply_emp(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.disarm();
    }
    for bomb in &mut state.bombs {
        bomb.state = BombState::Slowed;
    }
}
