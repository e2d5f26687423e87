//! Request-scoped selection constraints and the named presets they are built
//! from.
//!
//! Presets expand to keyword lists. Keywords are written in their canonical
//! spelling (`7vs7`, `build-up`); the keyword matcher normalizes both sides,
//! so `7 vs 7` or `7v7` in a drill description still match.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declares a preset enum with a kebab-case string form and a keyword list.
macro_rules! keyword_preset {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal [$($kw:literal),* $(,)?] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Kebab-case identifier accepted by `FromStr`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $key, )+
                }
            }

            /// Keywords this preset expands to.
            pub fn keywords(&self) -> &'static [&'static str] {
                match self {
                    $( $name::$variant => &[$($kw),*], )+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let known: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!(
                            "Invalid {}: {s} (expected one of: {})",
                            stringify!($name),
                            known.join(", ")
                        )
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

keyword_preset! {
    /// Age brackets offered to coaches. The keyword list holds the canonical
    /// age tokens the bracket covers.
    AgeBracket {
        U7ToU9 => "u7-u9" ["u7", "u8", "u9"],
        U10ToU11 => "u10-u11" ["u10", "u11"],
        U12ToU13 => "u12-u13" ["u12", "u13"],
        U14ToU15 => "u14-u15" ["u14", "u15"],
        U16ToU19 => "u16-u19" ["u16", "u17", "u18", "u19"],
        AdultAmateur => "adult-amateur" ["men", "women", "adult"],
        AdultPro => "adult-pro" ["men", "women", "adult"],
        /// No age restriction
        Any => "any" [],
    }
}

keyword_preset! {
    /// Primary tactical objective of the session.
    TacticalGoal {
        BuildUp => "build-up" ["build-up", "building up", "4-3-3", "4-4-2", "opening the field"],
        Pressing => "pressing" ["pressing", "win the ball", "counter-press", "pressure"],
        Finishing => "finishing" ["finishing", "shot on goal", "goal", "scoring", "final third"],
        Possession => "possession" ["keeping the ball", "possession", "passing game"],
    }
}

keyword_preset! {
    /// Technical focus areas; several may be selected at once.
    TechnicalFocus {
        ShortPassing => "short-passing" ["short pass", "combination", "passing", "one touch"],
        LongPasses => "long-passes" ["long pass", "cross", "switch play", "diagonal"],
        BallControl => "ball-control" ["ball control", "trapping", "first touch", "receiving"],
        Attacking1v1 => "1v1-attacking" ["1vs1", "dribbling", "feint"],
        Defending1v1 => "1v1-defending" ["1vs1", "defending", "tackle"],
    }
}

keyword_preset! {
    /// Physical priority of the session.
    FitnessFocus {
        Speed => "speed" ["sprint", "speed", "reaction"],
        Endurance => "endurance" ["endurance", "continuous", "high intensity"],
        Strength => "strength" ["duel", "1vs1", "physical", "contact"],
        Explosiveness => "explosiveness" ["explosive", "acceleration", "change of direction"],
    }
}

keyword_preset! {
    /// Preferred player format for the larger tactical game.
    LargeFormat {
        FiveVsFive => "5v5" ["5vs5"],
        SixVsSix => "6v6" ["6vs6"],
        SevenPlus => "7v7-plus" ["7vs7", "8vs8", "9vs9"],
        NoPreference => "none" [],
    }
}

keyword_preset! {
    /// Game profile wanted for the main phase.
    MainProfile {
        Finishing => "finishing" ["finishing game", "finishing", "shot on goal", "goal", "scoring"],
        BuildUp => "build-up" ["build-up game", "possession game", "possession", "keeping the ball"],
        Pressing => "pressing" ["pressing game", "pressing", "transition game", "transition", "win the ball"],
        NoPreference => "none" [],
    }
}

keyword_preset! {
    /// Preferred player format for the main phase.
    MainFormat {
        HalfField => "6v6-half-field" ["6vs6", "half-field"],
        Reduced => "7v7-8v8" ["7vs7", "8vs8"],
        FullMatch => "full-match" ["10vs10", "11vs11", "full pitch", "match"],
        NoPreference => "none" [],
    }
}

impl AgeBracket {
    /// Whether the bracket covers adult teams.
    pub fn is_adult(&self) -> bool {
        matches!(self, AgeBracket::AdultAmateur | AgeBracket::AdultPro)
    }

    /// Match sizes appropriate for the bracket, used as a main-phase
    /// fallback when no drill looks like a match game.
    pub fn match_size_tokens(&self) -> &'static [&'static str] {
        match self {
            AgeBracket::U7ToU9 => &["4vs4", "5vs5"],
            AgeBracket::U10ToU11 => &["6vs6", "7vs7"],
            AgeBracket::U12ToU13 => &["7vs7", "8vs8", "9vs9"],
            AgeBracket::U14ToU15 | AgeBracket::U16ToU19 => &["10vs10", "11vs11"],
            AgeBracket::AdultAmateur | AgeBracket::AdultPro => {
                &["10vs10", "11vs11", "full pitch", "match"]
            }
            AgeBracket::Any => &[],
        }
    }
}

/// Desired attributes for one plan-generation call.
///
/// Immutable once built; the relaxation pipeline derives weaker copies via
/// [`SelectionConstraints::relaxed`] instead of mutating it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectionConstraints {
    /// Canonical age tokens; empty means any age
    pub age_tokens: BTreeSet<String>,
    pub tactical: Vec<String>,
    pub technical: Vec<String>,
    pub fitness: Vec<String>,
    /// Format preference for the larger tactical game
    pub large_format: Vec<String>,
    /// Format preference for the main phase
    pub main_format: Vec<String>,
    /// Game profile keywords for the main phase
    pub main_profile: Vec<String>,
    /// Age-appropriate match sizes for the main-phase fallback
    pub match_sizes: Vec<String>,
}

fn owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| (*k).to_string()).collect()
}

impl SelectionConstraints {
    /// Starts a constraint set for the given age bracket.
    pub fn for_age(age: AgeBracket) -> Self {
        Self {
            age_tokens: age.keywords().iter().map(|t| (*t).to_string()).collect(),
            match_sizes: owned(age.match_size_tokens()),
            ..Default::default()
        }
    }

    pub fn with_tactical(mut self, goal: TacticalGoal) -> Self {
        self.tactical = owned(goal.keywords());
        self
    }

    /// Adds the keywords of every selected technical focus, skipping
    /// duplicates shared between focuses.
    pub fn with_technical(mut self, focuses: &[TechnicalFocus]) -> Self {
        self.technical.clear();
        for keyword in focuses.iter().flat_map(|f| f.keywords()) {
            if !self.technical.iter().any(|k| k == keyword) {
                self.technical.push((*keyword).to_string());
            }
        }
        self
    }

    pub fn with_fitness(mut self, focus: FitnessFocus) -> Self {
        self.fitness = owned(focus.keywords());
        self
    }

    pub fn with_large_format(mut self, format: LargeFormat) -> Self {
        self.large_format = owned(format.keywords());
        self
    }

    pub fn with_main_profile(mut self, profile: MainProfile) -> Self {
        self.main_profile = owned(profile.keywords());
        self
    }

    pub fn with_main_format(mut self, format: MainFormat) -> Self {
        self.main_format = owned(format.keywords());
        self
    }

    /// Replaces the main-phase format with the match sizes of the age
    /// bracket, so the main phase asks for a genuine match game.
    pub fn wanting_match_game(mut self, age: AgeBracket) -> Self {
        self.main_format = if age.is_adult() {
            owned(&["11vs11", "full pitch", "match"])
        } else {
            owned(age.match_size_tokens())
        };
        self
    }
}
