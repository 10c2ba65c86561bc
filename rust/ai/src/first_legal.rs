use tessera_engine::action::Action;
use tessera_engine::game::Game;
use tessera_engine::player::Player;
use tessera_engine::state::State;

/// Always plays the first action in enumeration order. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalPlayer;

impl Player for FirstLegalPlayer {
    fn play(&mut self, state: &State) -> Action {
        Game::all_legal(state)
            .first()
            .copied()
            .unwrap_or_else(crate::no_move)
    }

    fn player_type(&self) -> String {
        "fl".to_string()
    }

    fn copy(&self) -> Box<dyn Player> {
        Box::new(*self)
    }
}
