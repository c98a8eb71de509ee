//! Visualisation drills over randomly sampled board squares.
//!
//! Two drills open every episode: naming the colour of ten squares, and a
//! "journey" where a lone knight or bishop is sent to five target squares in
//! turn. Targets are only constrained to the right colour class for a bishop;
//! whether a target is reachable in one move is left to the listener.

use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use shakmaty::{Bitboard, Square};

use crate::ssml;

/// Squares named in the colour drill.
pub const COLOR_DRILL_SIZE: usize = 10;
/// Targets visited on a piece journey.
pub const JOURNEY_LENGTH: usize = 5;

const COLOR_ANSWER_PAUSE_SECS: u32 = 5;
const COLOR_ITEM_PAUSE_SECS: u32 = 2;
const JOURNEY_TARGET_PAUSE_SECS: u32 = 10;

/// Colour class of a square under the fixed light/dark partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareColor {
    Light,
    Dark,
}

impl SquareColor {
    pub fn of(square: Square) -> Self {
        if Bitboard::LIGHT_SQUARES.contains(square) {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// All 32 squares of this colour.
    pub fn squares(self) -> Bitboard {
        match self {
            Self::Light => Bitboard::LIGHT_SQUARES,
            Self::Dark => Bitboard::DARK_SQUARES,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for SquareColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ten distinct squares paired with their colours, in the order they are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDrill {
    pub items: Vec<(Square, SquareColor)>,
}

impl ColorDrill {
    /// Square name, a pause for the listener to answer, then the colour.
    pub fn to_ssml(&self) -> String {
        let answer_pause = ssml::pause(COLOR_ANSWER_PAUSE_SECS);
        ssml::join_with_pause(
            self.items
                .iter()
                .map(|(square, color)| format!("{square}{answer_pause}{color}")),
            COLOR_ITEM_PAUSE_SECS,
        )
    }
}

/// Piece sent on a journey across an otherwise empty board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyPiece {
    Knight,
    Bishop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyDrill {
    pub piece: JourneyPiece,
    pub start: Square,
    pub targets: Vec<Square>,
}

impl JourneyDrill {
    /// How the traveller is introduced, e.g. "the dark square Bishop".
    pub fn traveller(&self) -> String {
        match self.piece {
            JourneyPiece::Knight => "a Knight".to_string(),
            JourneyPiece::Bishop => format!("the {} square Bishop", SquareColor::of(self.start)),
        }
    }

    pub fn to_ssml(&self) -> String {
        ssml::join_with_pause(
            self.targets.iter().map(ToString::to_string),
            JOURNEY_TARGET_PAUSE_SECS,
        )
    }
}

fn all_squares() -> Vec<Square> {
    Bitboard::FULL.into_iter().collect()
}

/// Sample ten distinct squares uniformly from the whole board.
pub fn generate_color_drill<R: Rng + ?Sized>(rng: &mut R) -> ColorDrill {
    let items = all_squares()
        .choose_multiple(rng, COLOR_DRILL_SIZE)
        .map(|&square| (square, SquareColor::of(square)))
        .collect();
    ColorDrill { items }
}

/// Pick a knight or a bishop, a starting square, and five distinct targets.
///
/// A bishop's targets come from the 32 squares sharing its starting colour;
/// a knight may be sent anywhere.
pub fn generate_journey_drill<R: Rng + ?Sized>(rng: &mut R) -> JourneyDrill {
    let piece = if rng.random_bool(0.5) {
        JourneyPiece::Knight
    } else {
        JourneyPiece::Bishop
    };
    let start = Square::new(rng.random_range(0..64));

    let domain: Vec<Square> = match piece {
        JourneyPiece::Knight => all_squares(),
        JourneyPiece::Bishop => SquareColor::of(start).squares().into_iter().collect(),
    };

    let targets = domain
        .choose_multiple(rng, JOURNEY_LENGTH)
        .copied()
        .collect();

    JourneyDrill {
        piece,
        start,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn partition_matches_board_geometry() {
        // a1 is dark, h1 is light, and colours alternate along a rank.
        assert_eq!(SquareColor::of(Square::A1), SquareColor::Dark);
        assert_eq!(SquareColor::of(Square::H1), SquareColor::Light);
        assert_eq!(SquareColor::of(Square::B1), SquareColor::Light);
        assert_eq!(SquareColor::of(Square::D1), SquareColor::Light);
        assert_eq!(SquareColor::of(Square::E1), SquareColor::Dark);
        assert_eq!(SquareColor::Light.squares().count(), 32);
        assert_eq!(SquareColor::Dark.squares().count(), 32);
    }

    #[test]
    fn color_drill_has_ten_distinct_correctly_coloured_squares() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let drill = generate_color_drill(&mut rng);

            assert_eq!(drill.items.len(), COLOR_DRILL_SIZE);
            let distinct: HashSet<Square> = drill.items.iter().map(|(sq, _)| *sq).collect();
            assert_eq!(distinct.len(), COLOR_DRILL_SIZE);

            for (square, color) in &drill.items {
                let expected_light = (square.file() as u32 + square.rank() as u32) % 2 == 1;
                assert_eq!(*color == SquareColor::Light, expected_light, "{square}");
            }
        }
    }

    #[test]
    fn bishop_journeys_stay_on_the_starting_colour() {
        let mut bishops = 0;
        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let journey = generate_journey_drill(&mut rng);
            assert_eq!(journey.targets.len(), JOURNEY_LENGTH);

            let distinct: HashSet<Square> = journey.targets.iter().copied().collect();
            assert_eq!(distinct.len(), JOURNEY_LENGTH);

            if journey.piece == JourneyPiece::Bishop {
                bishops += 1;
                let start_color = SquareColor::of(journey.start);
                assert!(journey
                    .targets
                    .iter()
                    .all(|&target| SquareColor::of(target) == start_color));
            }
        }
        assert!(bishops > 0, "no bishop journeys sampled");
    }

    #[test]
    fn knight_journeys_reach_both_colours() {
        let mut seen = HashSet::new();
        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let journey = generate_journey_drill(&mut rng);
            if journey.piece == JourneyPiece::Knight {
                seen.extend(journey.targets.iter().map(|&sq| SquareColor::of(sq)));
            }
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn same_seed_same_drills() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(generate_color_drill(&mut a), generate_color_drill(&mut b));
        assert_eq!(generate_journey_drill(&mut a), generate_journey_drill(&mut b));
    }

    #[test]
    fn traveller_names_the_bishop_colour() {
        let journey = JourneyDrill {
            piece: JourneyPiece::Bishop,
            start: Square::C1,
            targets: vec![],
        };
        assert_eq!(journey.traveller(), "the dark square Bishop");

        let journey = JourneyDrill {
            piece: JourneyPiece::Knight,
            start: Square::C1,
            targets: vec![],
        };
        assert_eq!(journey.traveller(), "a Knight");
    }

    #[test]
    fn ssml_rendering_uses_drill_pauses() {
        let drill = ColorDrill {
            items: vec![
                (Square::E4, SquareColor::Light),
                (Square::A1, SquareColor::Dark),
            ],
        };
        assert_eq!(
            drill.to_ssml(),
            r#"e4<break time="5s"/>light<break time="2s"/>a1<break time="5s"/>dark"#
        );

        let journey = JourneyDrill {
            piece: JourneyPiece::Knight,
            start: Square::G1,
            targets: vec![Square::F3, Square::D4],
        };
        assert_eq!(journey.to_ssml(), r#"f3<break time="10s"/>d4"#);
    }
}
