//! Hidden role assignment

use rand::{seq::SliceRandom, Rng};

use crate::types::{GameSettings, Player};

/// Result of assigning roles for one round
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Final display order, which is also the reveal order
    pub players: Vec<Player>,
    /// Who opens the discussion; unrelated to roles
    pub starting_player_index: usize,
    /// How many players were actually made imposters
    pub imposter_count: usize,
}

/// Number of imposters for this round. With randomization on, any count in
/// `0..=imposter_count` is equally likely.
pub fn draw_imposter_count<R: Rng + ?Sized>(settings: &GameSettings, rng: &mut R) -> usize {
    if settings.randomize_imposters {
        rng.random_range(0..=settings.imposter_count)
    } else {
        settings.imposter_count
    }
}

/// Shuffle the roster and hand out imposter roles.
///
/// The count is not validated against the roster size beyond clamping; the
/// setup form keeps it in range. Imposters are marked on the first slots of
/// one shuffle and the roster is shuffled again, so the final position says
/// nothing about a player's role.
pub fn assign_roles<R: Rng + ?Sized>(
    players: Vec<Player>,
    settings: &GameSettings,
    rng: &mut R,
) -> Assignment {
    let imposter_count = draw_imposter_count(settings, rng).min(players.len());

    let mut players = players;
    players.shuffle(rng);

    for (i, player) in players.iter_mut().enumerate() {
        player.is_imposter = i < imposter_count;
        player.has_seen_role = false;
    }

    players.shuffle(rng);

    let starting_player_index = if players.is_empty() {
        0
    } else {
        rng.random_range(0..players.len())
    };

    Assignment {
        players,
        starting_player_index,
        imposter_count,
    }
}
