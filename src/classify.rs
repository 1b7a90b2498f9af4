//! Marvel-title detection.
//!
//! Detection is a publisher check followed by a substring scan of the title
//! against a table of Marvel characters, teams and events. Matching has no
//! word boundaries, so unrelated titles containing a short indicator (for
//! example "vision" or "storm") classify as Marvel. That is a known limit of
//! the heuristic; the lookup that follows simply finds no match for them.

/// A title needle and the canonical token it stands for.
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub needle: &'static str,
    pub token: &'static str,
}

const fn ind(needle: &'static str, token: &'static str) -> Indicator {
    Indicator { needle, token }
}

/// Ordered indicator table. Needles are lowercase.
pub const MARVEL_INDICATORS: &[Indicator] = &[
    ind("spider-man", "spider-man"),
    ind("spiderman", "spider-man"),
    ind("x-men", "x-men"),
    ind("avengers", "avengers"),
    ind("iron man", "iron man"),
    ind("thor", "thor"),
    ind("captain america", "captain america"),
    ind("hulk", "hulk"),
    ind("fantastic four", "fantastic four"),
    ind("daredevil", "daredevil"),
    ind("punisher", "punisher"),
    ind("deadpool", "deadpool"),
    ind("wolverine", "wolverine"),
    ind("black panther", "black panther"),
    ind("doctor strange", "doctor strange"),
    ind("venom", "venom"),
    ind("carnage", "carnage"),
    ind("ghost rider", "ghost rider"),
    ind("blade", "blade"),
    ind("moon knight", "moon knight"),
    ind("silver surfer", "silver surfer"),
    ind("guardians of the galaxy", "guardians of the galaxy"),
    ind("ant-man", "ant-man"),
    ind("wasp", "wasp"),
    ind("hawkeye", "hawkeye"),
    ind("black widow", "black widow"),
    ind("scarlet witch", "scarlet witch"),
    ind("quicksilver", "quicksilver"),
    ind("vision", "vision"),
    ind("war machine", "war machine"),
    ind("falcon", "falcon"),
    ind("winter soldier", "winter soldier"),
    ind("ms. marvel", "ms. marvel"),
    ind("captain marvel", "captain marvel"),
    ind("she-hulk", "she-hulk"),
    ind("luke cage", "luke cage"),
    ind("iron fist", "iron fist"),
    ind("jessica jones", "jessica jones"),
    ind("elektra", "elektra"),
    ind("kingpin", "kingpin"),
    ind("magneto", "magneto"),
    ind("cyclops", "cyclops"),
    ind("storm", "storm"),
    ind("rogue", "rogue"),
    ind("gambit", "gambit"),
    ind("jean grey", "jean grey"),
    ind("beast", "beast"),
    ind("the new mutants", "new mutants"),
    ind("x-force", "x-force"),
    ind("runaways", "runaways"),
    ind("young avengers", "young avengers"),
    ind("ultimate spider-man", "ultimate spider-man"),
    ind("ultimate x-men", "ultimate x-men"),
    ind("marvel knights", "marvel knights"),
    ind("what if", "what if"),
    ind("marvel zombies", "marvel zombies"),
    ind("marvel team-up", "marvel team-up"),
    ind("secret wars", "secret wars"),
    ind("infinity gauntlet", "infinity gauntlet"),
    ind("civil war", "civil war"),
    ind("house of m", "house of m"),
    ind("age of apocalypse", "age of apocalypse"),
];

/// Return true when the entry is likely a Marvel publication.
///
/// `author` is accepted for callers that have it but is not consulted.
pub fn is_marvel(title: &str, _author: &str, publisher: &str) -> bool {
    if publisher_is_marvel(publisher) {
        return true;
    }
    marvel_indicator(title).is_some()
}

pub fn publisher_is_marvel(publisher: &str) -> bool {
    !publisher.is_empty() && publisher.to_lowercase().contains("marvel")
}

/// First indicator whose needle occurs anywhere in `title` (case-insensitive).
pub fn marvel_indicator(title: &str) -> Option<&'static Indicator> {
    let title = title.to_lowercase();
    MARVEL_INDICATORS
        .iter()
        .find(|indicator| title.contains(indicator.needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_indicator_is_detected_regardless_of_case_or_publisher() {
        for indicator in MARVEL_INDICATORS {
            let title = format!("The {} Annual #1", indicator.needle.to_uppercase());
            assert!(
                is_marvel(&title, "", "DC Comics"),
                "expected {title:?} to classify as Marvel"
            );
        }
    }

    #[test]
    fn publisher_alone_is_authoritative() {
        assert!(is_marvel("Anything", "", "Marvel Worldwide"));
        assert!(is_marvel("Anything", "", "MARVEL"));
    }

    #[test]
    fn unrelated_titles_are_not_marvel() {
        assert!(!is_marvel("The Sandman #1", "Neil Gaiman", "DC Comics"));
        assert!(!is_marvel("Saga #12", "", ""));
    }

    #[test]
    fn author_is_not_consulted() {
        assert!(!is_marvel("Saga #12", "Stan Lee", ""));
    }

    #[test]
    fn substring_match_has_no_word_boundary() {
        // "Division" contains "vision": accepted false positive.
        assert!(is_marvel("Division Zero", "", "Image"));
    }

    #[test]
    fn indicator_reports_canonical_token() {
        let indicator = marvel_indicator("Spiderman: Blue").expect("indicator");
        assert_eq!(indicator.token, "spider-man");
        assert!(marvel_indicator("Watchmen").is_none());
    }
}
