use crate::action::Action;
use crate::rules::Rules;
use crate::state::State;

/// A seat at the table: anything that can choose an action for a state.
///
/// Strategies must not share mutable state across games. The arena calls
/// [`Player::copy`] once per game and runs copies on different threads.
pub trait Player: Send + Sync {
    /// Chooses an action for `state.current_player()`. It must be legal.
    fn play(&mut self, state: &State) -> Action;

    /// Rejects configurations the strategy cannot handle, before play begins.
    fn check_rules(&self, _rules: &Rules) -> bool {
        true
    }

    /// Optional spectator hook fed the same events as registered observers.
    fn observer(&mut self) -> Option<&mut dyn Observer> {
        None
    }

    /// Non-fatal failure reported back to the strategy, e.g. an illegal action.
    fn error(&mut self, message: &str) {
        tracing::warn!(player = %self.player_type(), message, "player error");
    }

    /// Short identifier used in reports.
    fn player_type(&self) -> String;

    /// An independent instance, safe to use concurrently in another game.
    fn copy(&self) -> Box<dyn Player>;

    /// Restarts any internal random stream from `seed`.
    fn reseed(&mut self, _seed: u64) {}
}

/// Notification-only view of a game.
#[allow(unused_variables)]
pub trait Observer: Send {
    /// Seats in turn order for the first round.
    fn start_game(&mut self, seat_order: &[usize]) {}

    fn new_round(&mut self, state: &State) {}

    fn action_played(&mut self, action: Action) {}

    /// `winners` holds every seat sharing the top score.
    fn end_game(&mut self, state: &State, winners: &[usize]) {}
}
