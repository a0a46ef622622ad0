//! Spymaster prompt construction.

use crate::domain::board::{Cell, Color};
use crate::ai::ClueRequest;

fn unrevealed(board: &[Cell], color: Color) -> Vec<&str> {
    board
        .iter()
        .filter(|c| c.color == color && !c.revealed)
        .map(|c| c.word.as_str())
        .collect()
}

pub fn build_prompt(request: &ClueRequest) -> String {
    let team = request.team;
    let mine = unrevealed(&request.board, team.color()).join(", ");
    let theirs = unrevealed(&request.board, team.opponent().color()).join(", ");
    let neutral = unrevealed(&request.board, Color::Neutral).join(", ");
    let assassin = unrevealed(&request.board, Color::Assassin).join(", ");
    let team_label = team.as_str().to_uppercase();

    format!(
        "You are the Spymaster in a game of Codenames. You must give a ONE-WORD clue and a NUMBER.

Your team ({team_label}) needs to guess these words:
{mine}

AVOID these opponent words:
{theirs}

NEUTRAL words (not terrible if guessed):
{neutral}

ASSASSIN (instant loss if guessed):
{assassin}

Rules:
1. Your clue must be a SINGLE WORD (no hyphens, no proper nouns from the board)
2. The number indicates how many of YOUR words relate to the clue
3. Aim to connect 2-3 words while avoiding opponent/assassin words
4. The clue cannot be any word on the board or a variant of one

Respond with ONLY this format (no explanation):
CLUE: [your one-word clue]
COUNT: [number of related words]"
    )
}
