use log::debug;

use crate::{
    config::{NO_CRACK, SPRITE_PATTERN_BANK},
    platform::Video,
    session::{CheckpointState, PlayerState, Session, WorldId},
};

/// Put the player, world, and checkpoint back to a new-game state.
///
/// Anything not touched here (death count, crack timer) keeps its power-on
/// zero until the state that owns it resets it. Calling this twice is the same
/// as calling it once.
pub fn initialize_variables<V: Video + ?Sized>(session: &mut Session, video: &mut V) {
    session.player = PlayerState::spawn();
    session.world = WorldId::Overworld;
    session.layer = 0;

    session.checkpoint = CheckpointState::capture(&session.player, session.layer);
    session.nearest_crack = NO_CRACK;

    // sprites and backgrounds use different pattern tables
    video.set_sprite_bank(SPRITE_PATTERN_BANK);

    debug!("variables initialized, player at {:?}", (session.player.x, session.player.y));
}
