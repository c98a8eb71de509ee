//! Small helpers for building the SSML handed to the speech engine.

/// A timed pause directive, e.g. `<break time="5s"/>`.
pub fn pause(seconds: u32) -> String {
    format!(r#"<break time="{seconds}s"/>"#)
}

/// Join spoken items with a pause of `seconds` between each pair.
pub fn join_with_pause<I, S>(items: I, seconds: u32) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let separator = pause(seconds);
    items
        .into_iter()
        .map(|item| item.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Escape text so it can sit inside an SSML element.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_renders_seconds() {
        assert_eq!(pause(10), r#"<break time="10s"/>"#);
    }

    #[test]
    fn join_places_pauses_between_items_only() {
        assert_eq!(
            join_with_pause(["e4", "e5"], 5),
            r#"e4<break time="5s"/>e5"#
        );
        assert_eq!(join_with_pause(Vec::<String>::new(), 5), "");
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(
            escape(r#"Hastings & "Premier" <A>"#),
            "Hastings &amp; &quot;Premier&quot; &lt;A&gt;"
        );
    }
}
