//! The episode's SSML document.
//!
//! Everything here is plain templating over values produced by earlier
//! stages. Text taken from PGN headers or the music catalogue is escaped
//! before it is spliced in.

use unseen_moves_domain::Result;

use crate::exercises::{ColorDrill, JourneyDrill};
use crate::narrator::Narration;
use crate::pgn::GameRecord;
use crate::ssml::{escape, pause};

const NUMBER_WORDS: [&str; 11] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// `Last, First` becomes `First Last`; names without a comma are kept as is.
/// Fields after the second (`Jr`, titles) are dropped.
pub fn fix_name(name: &str) -> String {
    let mut fields = name.split(',');
    match (fields.next(), fields.next()) {
        (Some(last), Some(first)) => format!("{} {}", first.trim(), last.trim()),
        _ => name.trim().to_string(),
    }
}

/// A count as it is read aloud: words up to ten, digits beyond.
pub fn spoken_count(n: usize) -> String {
    NUMBER_WORDS
        .get(n)
        .map_or_else(|| n.to_string(), |word| (*word).to_string())
}

/// "the first five moves" for ten plies, "the first move" for one or two.
fn opening_span(plies: usize) -> String {
    match plies.div_ceil(2) {
        0 => "the moves".to_string(),
        1 => "the first move".to_string(),
        n => format!("the first {} moves", spoken_count(n)),
    }
}

/// Who played, when and where.
///
/// White, Black, Date, Event and Site must all be present.
pub fn game_intro(record: &GameRecord, plies: usize) -> Result<String> {
    let white = escape(&fix_name(record.require_header("White")?));
    let black = escape(&fix_name(record.require_header("Black")?));
    let year: String = record.require_header("Date")?.chars().take(4).collect();
    let event = escape(record.require_header("Event")?);
    let site = escape(record.require_header("Site")?);
    let span = opening_span(plies);

    Ok(format!(
        r#"
    <p>Finally, let's walk through {span} of a master game.</p>
    <p>Our game today will be between {white} with the white pieces and
    {black} with the black pieces. The game was played in {year} at the
    {event} in {site}.</p>
    <p>Remember the goal is to visualise the board after each move.</p>
    <p>Let's begin!</p>
"#,
        year = escape(&year),
    ))
}

/// Assemble the full `<speak>` document.
pub fn compose_script(
    colors: &ColorDrill,
    journey: &JourneyDrill,
    record: &GameRecord,
    narration: &Narration,
    attribution: &str,
) -> Result<String> {
    let intro = game_intro(record, narration.plies())?;
    let color_items = colors.to_ssml();
    let traveller = journey.traveller();
    let start = journey.start;
    let targets = journey.to_ssml();
    let moves = narration.to_ssml();
    let attribution = escape(attribution);
    let short_break = pause(5);
    let long_break = pause(10);

    Ok(format!(
        r#"<speak>
    <p>Welcome to Unseen Moves, the podcast dedicated to enhancing your chess
    visualisation skills.</p>

    <p>In this podcast, we'll embark on a daily journey to help you sharpen
    your ability to visualise the chessboard without actually having it in
    front of you. Visualisation is a crucial skill for any chess player,
    letting you anticipate and plan your moves ahead of time and leading to
    better strategic decisions.</p>

    <p>We'll start with a fundamental exercise: naming the colour of a square.
    As you practise this skill, you will build up a mental model of the
    chessboard. You will hear the coordinates of a square, and you need to
    supply the colour of that square. Remember it's important to visualise the
    board in your mind; relying on rote memorisation or an algorithm isn't
    going to help you in the long run.</p>
    <p>Let's begin!</p>

    <p>{color_items}</p>

    {short_break}

    <p>Well done! Building that mental model of the chess board is the first
    step on the way to better visualisation in chess. Don't worry if you didn't
    get every square perfectly, you will get better with practice!</p>

    <p>For our next exercise you should start by visualising an empty board.
    We will add a single piece at a starting location, then attempt to travel
    around the board using only legal moves. You will hear the coordinates of
    a target square. Your job is to find the moves to get the piece to that
    target square, and from there to the next target square, and so on.</p>

    <p>Our traveller today will be {traveller}, starting on the {start}
    square.</p>

    <p>Let's begin!</p>

    <p>{targets}</p>

    {long_break}

    <p>Good job! Visualising how pieces move across the board is vital to
    designing attacks and seeing threats. Don't worry if you didn't hit every
    target perfectly, you will get better with more practice.</p>
{intro}
    <p>{moves}</p>

    {short_break}

    <p>Amazing work! Keeping track of multiple pieces can be challenging, but
    as you practise you will get better at it!</p>

    <p>The music for this episode was {attribution}. Thanks to lichess.org for
    providing sensible APIs to a master games database, text to speech is from
    Amazon Polly, and a big shout out to the open source developers behind
    shakmaty and rodio.</p>

    <p>That's all for today. Now get out there and play some chess!</p>
</speak>
"#
    ))
}
