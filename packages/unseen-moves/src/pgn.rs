//! Minimal PGN reader for single-game documents.
//!
//! The explorer returns one game per request, so this reads the tag pairs and
//! the mainline SAN tokens of the first game and ignores comments, variations,
//! NAGs, move numbers and annotation glyphs. Move legality is checked later,
//! when the narrator replays the moves on a board.

use std::collections::BTreeMap;

use unseen_moves_domain::{EpisodeError, Result};

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A fetched game: its explorer id, tag pairs and mainline moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    id: String,
    headers: BTreeMap<String, String>,
    moves: Vec<String>,
}

impl GameRecord {
    pub fn new(
        id: impl Into<String>,
        headers: BTreeMap<String, String>,
        moves: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            headers,
            moves,
        }
    }

    /// Parse the first game in `text`.
    pub fn from_pgn(id: impl Into<String>, text: &str) -> Result<Self> {
        let id = id.into();
        let mut headers = BTreeMap::new();
        let mut movetext = String::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('%') {
                continue;
            }
            if trimmed.starts_with('[') && movetext.trim().is_empty() {
                let (name, value) = parse_tag(trimmed)
                    .ok_or_else(|| malformed(&id, format!("bad tag pair `{trimmed}`")))?;
                headers.insert(name, value);
                continue;
            }
            if trimmed.starts_with('[') && game_is_over(&movetext) {
                // Tag section of a second game.
                break;
            }
            movetext.push_str(line);
            movetext.push('\n');
        }

        let moves = parse_movetext(&movetext).map_err(|reason| malformed(&id, reason))?;

        if headers.is_empty() && moves.is_empty() {
            return Err(malformed(&id, "document contains no tags and no moves".into()));
        }

        Ok(Self { id, headers, moves })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Like [`header`](Self::header) but a missing or empty tag is a fetch failure.
    pub fn require_header(&self, name: &str) -> Result<&str> {
        match self.header(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(EpisodeError::FetchFailure(format!(
                "game {} has no {name} header",
                self.id
            ))),
        }
    }

    /// Mainline moves in SAN, in game order.
    pub fn moves(&self) -> &[String] {
        &self.moves
    }
}

/// True once `movetext` closes with a result token outside any comment.
fn game_is_over(movetext: &str) -> bool {
    let mut depth = 0usize;
    let mut outside = String::with_capacity(movetext.len());
    for c in movetext.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => outside.push(c),
            _ => {}
        }
    }
    depth == 0
        && outside
            .split_whitespace()
            .last()
            .is_some_and(|token| RESULT_TOKENS.contains(&token))
}

fn malformed(id: &str, reason: String) -> EpisodeError {
    EpisodeError::FetchFailure(format!("game {id} is not a readable PGN: {reason}"))
}

/// `[Name "Value"]` with `\"` and `\\` escapes inside the value.
fn parse_tag(line: &str) -> Option<(String, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    let (name, rest) = inner.split_once(char::is_whitespace)?;
    let quoted = rest.trim().strip_prefix('"')?.strip_suffix('"')?;

    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            value.push(chars.next()?);
        } else {
            value.push(c);
        }
    }
    Some((name.to_string(), value))
}

fn parse_movetext(text: &str) -> std::result::Result<Vec<String>, String> {
    let mut moves = Vec::new();
    let mut token = String::new();
    let mut variation_depth = 0usize;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                flush(&mut token, &mut moves, variation_depth);
                if !chars.by_ref().any(|c| c == '}') {
                    return Err("unterminated comment".into());
                }
            }
            ';' => {
                flush(&mut token, &mut moves, variation_depth);
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' => {
                flush(&mut token, &mut moves, variation_depth);
                variation_depth += 1;
            }
            ')' => {
                flush(&mut token, &mut moves, variation_depth);
                variation_depth = variation_depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced `)`".to_string())?;
            }
            c if c.is_whitespace() => flush(&mut token, &mut moves, variation_depth),
            c => token.push(c),
        }
        if moves.last().is_some_and(|m: &String| RESULT_TOKENS.contains(&m.as_str())) {
            moves.pop();
            return Ok(moves);
        }
    }
    flush(&mut token, &mut moves, variation_depth);

    if variation_depth != 0 {
        return Err("unterminated variation".into());
    }
    if moves.last().is_some_and(|m| RESULT_TOKENS.contains(&m.as_str())) {
        moves.pop();
    }
    Ok(moves)
}

/// Push the pending token as a move unless it is a move number, a NAG or
/// sits inside a variation.
fn flush(token: &mut String, moves: &mut Vec<String>, variation_depth: usize) {
    if token.is_empty() {
        return;
    }
    let raw = std::mem::take(token);
    if variation_depth > 0 || raw.starts_with('$') {
        return;
    }
    if RESULT_TOKENS.contains(&raw.as_str()) {
        moves.push(raw);
        return;
    }

    // "12." / "12..." / "12.Nf3"
    let san = raw
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches('.')
        .trim_end_matches(['!', '?']);
    if !san.is_empty() {
        moves.push(san.to_string());
    }
}
