use std::collections::HashMap;

use crate::device::Hsv;

/// Pair of colors a burst alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamColorPair {
    /// First color of each alternation.
    pub primary: Hsv,
    /// Second color of each alternation.
    pub secondary: Hsv,
}

impl TeamColorPair {
    /// Build a pair from two HSV triples.
    pub const fn new(primary: Hsv, secondary: Hsv) -> Self {
        Self { primary, secondary }
    }
}

/// Red and white, used for team codes missing from the table.
pub const FALLBACK_COLORS: TeamColorPair =
    TeamColorPair::new(Hsv::new(0, 100, 100), Hsv::new(0, 0, 100));

const RED: Hsv = Hsv::new(0, 100, 100);
const BLACK: Hsv = Hsv::new(0, 0, 0);
const WHITE: Hsv = Hsv::new(0, 0, 100);
const BLUE: Hsv = Hsv::new(216, 100, 100);
const GOLD: Hsv = Hsv::new(45, 100, 100);
const ORANGE: Hsv = Hsv::new(25, 100, 100);
const GREEN: Hsv = Hsv::new(120, 100, 70);
const TEAL: Hsv = Hsv::new(180, 100, 70);
const DARK: Hsv = Hsv::new(0, 0, 20);

/// Built-in team colors keyed by NHL team code.
const BUILTIN_COLORS: &[(&str, TeamColorPair)] = &[
    ("ANA", TeamColorPair::new(Hsv::new(22, 100, 100), BLACK)),
    ("ARI", TeamColorPair::new(Hsv::new(22, 78, 85), Hsv::new(202, 100, 57))),
    ("BOS", TeamColorPair::new(GOLD, BLACK)),
    ("BUF", TeamColorPair::new(BLUE, GOLD)),
    ("CGY", TeamColorPair::new(RED, GOLD)),
    ("CAR", TeamColorPair::new(RED, BLACK)),
    ("CHI", TeamColorPair::new(RED, BLACK)),
    ("COL", TeamColorPair::new(Hsv::new(215, 86, 83), Hsv::new(0, 73, 86))),
    ("CBJ", TeamColorPair::new(BLUE, RED)),
    ("DAL", TeamColorPair::new(GREEN, DARK)),
    ("DET", TeamColorPair::new(RED, WHITE)),
    ("EDM", TeamColorPair::new(BLUE, ORANGE)),
    ("FLA", TeamColorPair::new(BLUE, RED)),
    ("LAK", TeamColorPair::new(BLACK, Hsv::new(270, 3, 62))),
    ("MIN", TeamColorPair::new(GREEN, RED)),
    ("MTL", TeamColorPair::new(RED, BLUE)),
    ("NSH", TeamColorPair::new(GOLD, BLUE)),
    ("NJD", TeamColorPair::new(RED, BLACK)),
    ("NYI", TeamColorPair::new(BLUE, ORANGE)),
    ("NYR", TeamColorPair::new(BLUE, RED)),
    ("OTT", TeamColorPair::new(RED, BLACK)),
    ("PHI", TeamColorPair::new(ORANGE, BLACK)),
    ("PIT", TeamColorPair::new(BLACK, GOLD)),
    ("SJS", TeamColorPair::new(TEAL, DARK)),
    ("SEA", TeamColorPair::new(TEAL, BLUE)),
    ("STL", TeamColorPair::new(BLUE, GOLD)),
    ("TBL", TeamColorPair::new(BLUE, WHITE)),
    ("TOR", TeamColorPair::new(BLUE, WHITE)),
    ("VAN", TeamColorPair::new(BLUE, GREEN)),
    ("VGK", TeamColorPair::new(GOLD, DARK)),
    ("WSH", TeamColorPair::new(RED, BLUE)),
    ("WPG", TeamColorPair::new(BLUE, DARK)),
];

/// Immutable lookup table from team code to burst colors.
#[derive(Debug, Clone)]
pub struct TeamColors {
    pairs: HashMap<String, TeamColorPair>,
}

impl TeamColors {
    /// Table holding only the built-in entries.
    pub fn builtin() -> Self {
        Self::with_overrides(std::iter::empty())
    }

    /// Built-in table with `overrides` replacing or adding entries.
    pub fn with_overrides(overrides: impl IntoIterator<Item = (String, TeamColorPair)>) -> Self {
        let mut pairs: HashMap<String, TeamColorPair> = BUILTIN_COLORS
            .iter()
            .map(|(code, pair)| ((*code).to_string(), *pair))
            .collect();
        pairs.extend(
            overrides
                .into_iter()
                .map(|(code, pair)| (code.trim().to_ascii_uppercase(), pair)),
        );
        Self { pairs }
    }

    /// Colors for `team`, or [`FALLBACK_COLORS`] when the code is unknown.
    pub fn lookup(&self, team: &str) -> TeamColorPair {
        self.pairs
            .get(team)
            .copied()
            .unwrap_or(FALLBACK_COLORS)
    }
}

impl Default for TeamColors {
    fn default() -> Self {
        Self::builtin()
    }
}
