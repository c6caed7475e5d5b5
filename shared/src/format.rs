/// A run of transcript text and whether it sits between `**` delimiters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// Splits `text` on `**`; odd-numbered pieces are emphasized. Empty pieces are
/// dropped, an unmatched trailing `**` emphasizes the rest of the text.
pub fn emphasis_spans(text: &str) -> Vec<Span<'_>> {
    text.split("**")
        .enumerate()
        .filter(|(_, piece)| !piece.is_empty())
        .map(|(i, piece)| Span { text: piece, emphasized: i % 2 == 1 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span<'_> {
        Span { text, emphasized: false }
    }

    fn bold(text: &str) -> Span<'_> {
        Span { text, emphasized: true }
    }

    #[test]
    fn enclosed_segment_is_emphasized() {
        assert_eq!(emphasis_spans("**Cat**."), vec![bold("Cat"), plain(".")]);
    }

    #[test]
    fn text_without_delimiters_is_one_plain_span() {
        assert_eq!(emphasis_spans("just a cat"), vec![plain("just a cat")]);
        assert!(emphasis_spans("").is_empty());
    }

    #[test]
    fn alternates_across_multiple_pairs() {
        assert_eq!(
            emphasis_spans("A **cat** and a **dog** here"),
            vec![plain("A "), bold("cat"), plain(" and a "), bold("dog"), plain(" here")]
        );
    }

    #[test]
    fn unmatched_delimiter_emphasizes_tail() {
        assert_eq!(emphasis_spans("Hello **World"), vec![plain("Hello "), bold("World")]);
    }
}
