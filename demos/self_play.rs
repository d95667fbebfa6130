extern crate fightopia;

use fightopia::board::Side;
use fightopia::boards::fightopia::State;
use fightopia::error::GameError;
use fightopia::mcts::{Budget, search};
use fightopia::random::SeededRandomGenerator;

const ROUNDS_PER_MOVE: u32 = 60;
const MAX_PLIES: u32 = 200;

fn main() -> Result<(), GameError> {
    env_logger::init();

    // Both sides search from the same state; each ply gets its own seed
    let mut state = State::initial();
    let mut ply = 0;
    while ply < MAX_PLIES && state.terminal_outcome().is_none() {
        let side = state.side_to_move();
        let random = SeededRandomGenerator::new(u64::from(ply));
        let action = match search(state.clone(), side, Budget::Rounds(ROUNDS_PER_MOVE), random) {
            Ok(action) => action,
            Err(GameError::NoLegalAction { side }) => {
                println!("{ply:>3}: {side} has no legal action");
                break;
            }
            Err(e) => return Err(e),
        };

        println!("{ply:>3}: {side} plays {action}");
        state.apply(&action)?;
        ply += 1;
    }

    match state.terminal_outcome() {
        Some(winner) => println!("{winner} side wins after {ply} plies"),
        None => println!("no winner after {ply} plies"),
    }
    for side in Side::ALL {
        println!("{side} scores {}", state.score(side));
    }

    Ok(())
}
