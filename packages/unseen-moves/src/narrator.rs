//! Spoken rendering of the opening plies of a game.
//!
//! Moves are replayed on a fresh board so the SAN that gets read out has the
//! board's canonical disambiguation. A `+`/`#` written in the record is kept;
//! the board only supplies one when the record has none. Each move then
//! goes through a fixed chain of rewrites. The rewrites only touch SAN
//! syntax, never the words they produce, so running the chain over its own
//! output changes nothing.

use shakmaty::san::San;
use shakmaty::{Chess, Position};
use tracing::debug;
use unseen_moves_domain::{EpisodeError, Result};

use crate::pgn::GameRecord;
use crate::ssml;

/// Plies narrated per episode (five full moves).
pub const DEFAULT_PLIES: usize = 10;

const MOVE_PAUSE_SECS: u32 = 5;

type Rewrite = fn(&str) -> String;

/// Applied in order; later steps never re-trigger earlier ones.
const REWRITES: [Rewrite; 6] = [
    spell_captures,
    capitalise_a_file,
    expand_piece_letters,
    collapse_to_takes,
    spell_checks,
    spell_castling,
];

/// Narrated plies of one game, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narration {
    pub moves: Vec<String>,
}

impl Narration {
    pub fn plies(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves joined with a pause; empty for a game without moves.
    pub fn to_ssml(&self) -> String {
        ssml::join_with_pause(&self.moves, MOVE_PAUSE_SECS)
    }
}

/// Replay the first `plies` moves of `record` and narrate each one.
pub fn narrate_game(record: &GameRecord, plies: usize) -> Result<Narration> {
    let sans = replay_san(record, plies)?;
    let moves = sans.iter().map(|san| narrate_move(san)).collect();
    debug!(game_id = record.id(), plies = sans.len(), "Narrated opening moves");
    Ok(Narration { moves })
}

/// SAN with check suffix for the first `plies` moves.
///
/// The recorded suffix wins over the board's verdict.
pub fn replay_san(record: &GameRecord, plies: usize) -> Result<Vec<String>> {
    let mut position = Chess::default();
    let mut rendered = Vec::with_capacity(plies.min(record.moves().len()));

    for (ply, token) in record.moves().iter().take(plies).enumerate() {
        let san: San = token
            .trim_end_matches(['+', '#'])
            .parse()
            .map_err(|e| illegal(record, ply, token, format!("{e}")))?;
        let m = san
            .to_move(&position)
            .map_err(|e| illegal(record, ply, token, format!("{e}")))?;

        let text = San::from_move(&position, &m).to_string();
        position = position
            .play(&m)
            .map_err(|_| illegal(record, ply, token, "move rejected by board".into()))?;

        let suffix = match recorded_suffix(token) {
            "" if position.is_checkmate() => "#",
            "" if position.is_check() => "+",
            recorded => recorded,
        };
        rendered.push(format!("{text}{suffix}"));
    }

    Ok(rendered)
}

fn recorded_suffix(token: &str) -> &'static str {
    if token.ends_with('#') {
        "#"
    } else if token.ends_with('+') {
        "+"
    } else {
        ""
    }
}

fn illegal(record: &GameRecord, ply: usize, token: &str, reason: String) -> EpisodeError {
    EpisodeError::FetchFailure(format!(
        "game {} has an unplayable move `{token}` at ply {}: {reason}",
        record.id(),
        ply + 1
    ))
}

/// Run one SAN move through the rewrite chain.
pub fn narrate_move(san: &str) -> String {
    REWRITES
        .iter()
        .fold(san.to_string(), |text, rewrite| rewrite(&text))
}

fn spell_captures(text: &str) -> String {
    text.replace('x', " takes ")
}

/// A lone "a" reads as the article, so the a-file is spoken as a letter.
fn capitalise_a_file(text: &str) -> String {
    match text.strip_prefix("a takes") {
        Some(rest) => format!("A takes{rest}"),
        None => text.to_string(),
    }
}

fn piece_name(letter: char) -> Option<&'static str> {
    match letter {
        'K' => Some("King"),
        'N' => Some("Knight"),
        'B' => Some("Bishop"),
        'Q' => Some("Queen"),
        'R' => Some("Rook"),
        _ => None,
    }
}

/// `Nf3` becomes `Knight to f3`; `e8=Q` becomes `e8 promotes to Queen`.
///
/// A piece letter only counts when it is followed by SAN (a file, a rank or
/// the space left by a capture), so already-spelled names are left alone.
fn expand_piece_letters(text: &str) -> String {
    let text = expand_promotion(text);
    let mut chars = text.chars();
    let (Some(letter), Some(next)) = (chars.next(), chars.next()) else {
        return text;
    };
    match piece_name(letter) {
        Some(name) if matches!(next, 'a'..='h' | '1'..='8' | ' ') => {
            format!("{name} to {}", text[letter.len_utf8()..].trim_start())
        }
        _ => text,
    }
}

fn expand_promotion(text: &str) -> String {
    let Some((square, rest)) = text.split_once('=') else {
        return text.to_string();
    };
    let mut rest = rest.chars();
    match rest.next().and_then(piece_name) {
        Some(name) => format!("{square} promotes to {name}{}", rest.as_str()),
        None => text.to_string(),
    }
}

fn collapse_to_takes(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" to takes", " takes")
}

fn spell_checks(text: &str) -> String {
    text.replace('+', " check!").replace('#', " checkmate!")
}

/// Queenside first: `O-O` is a prefix of `O-O-O`.
fn spell_castling(text: &str) -> String {
    text.replace("O-O-O", "castles queenside")
        .replace("O-O", "castles kingside")
}
