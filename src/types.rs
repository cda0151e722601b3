use serde::{Deserialize, Serialize};
use std::fmt;

/// Total players in a lobby (humans + bots)
pub const LOBBY_SIZE: u32 = 150;

/// Number of fixed skill brackets
pub const NUM_BRACKETS: usize = 6;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 42;

/// A fixed skill tier with its default population share
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SkillBracket {
    pub label: &'static str,
    /// Share of the human population before churn (0-1)
    pub default_proportion: f64,
    /// K/D that humans in this bracket are centered on
    pub representative_kd: f64,
    /// Bar color used by chart front ends
    pub color: &'static str,
}

/// The six brackets, ordered from lowest to highest K/D
pub const BRACKETS: [SkillBracket; NUM_BRACKETS] = [
    SkillBracket {
        label: "Bottom 10% (≤0.35)",
        default_proportion: 0.10,
        representative_kd: 0.25,
        color: "powderblue",
    },
    SkillBracket {
        label: "Next 10% (0.36–0.55)",
        default_proportion: 0.10,
        representative_kd: 0.45,
        color: "cyan",
    },
    SkillBracket {
        label: "Middle 50% (0.56–0.92)",
        default_proportion: 0.50,
        representative_kd: 0.75,
        color: "gray",
    },
    SkillBracket {
        label: "Top 20% (1.15–2.08)",
        default_proportion: 0.19,
        representative_kd: 1.5,
        color: "red",
    },
    SkillBracket {
        label: "Top 1% (2.08–3.57)",
        default_proportion: 0.009,
        representative_kd: 2.5,
        color: "purple",
    },
    SkillBracket {
        label: "Top 0.1% (≥3.57)",
        default_proportion: 0.001,
        representative_kd: 4.0,
        color: "black",
    },
];

/// Default bracket proportions in bracket order
pub fn default_proportions() -> [f64; NUM_BRACKETS] {
    BRACKETS.map(|b| b.default_proportion)
}

/// Lobby simulation parameters (one per UI control)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyParams {
    /// Bots injected into the lobby
    pub bot_count: u32,
    /// Fraction of the two lowest brackets that churned out (0-1)
    pub churn_level: f64,
    /// Use the K/D cutoff churn instead of proportional churn
    pub advanced_churn: bool,
    /// Brackets whose representative K/D is below this are removed
    pub kd_churn_cutoff: f64,
}

impl Default for LobbyParams {
    fn default() -> Self {
        Self {
            bot_count: 0,
            churn_level: 0.0,
            advanced_churn: false,
            kd_churn_cutoff: 0.85,
        }
    }
}

impl LobbyParams {
    /// Humans filling the rest of the lobby
    pub fn human_count(&self) -> u32 {
        LOBBY_SIZE.saturating_sub(self.bot_count)
    }

    /// Reject parameters the simulator cannot honor
    pub fn validate(&self) -> Result<(), String> {
        if self.bot_count > LOBBY_SIZE {
            return Err(format!(
                "bot_count {} exceeds lobby size {}",
                self.bot_count, LOBBY_SIZE
            ));
        }
        if !self.churn_level.is_finite() || !(0.0..=1.0).contains(&self.churn_level) {
            return Err(format!("churn_level {} must be within [0, 1]", self.churn_level));
        }
        if !self.kd_churn_cutoff.is_finite() {
            return Err(format!("kd_churn_cutoff {} must be finite", self.kd_churn_cutoff));
        }
        Ok(())
    }
}

/// Kind of UI control backing a parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    IntSlider,
    FloatSlider,
    Checkbox,
}

/// Description of one interactive control, for front ends building sliders
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ControlRange {
    /// Matching field name in `LobbyParams`
    pub param: &'static str,
    pub description: &'static str,
    pub kind: ControlKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

pub const CONTROLS: [ControlRange; 4] = [
    ControlRange {
        param: "bot_count",
        description: "Number of Bots",
        kind: ControlKind::IntSlider,
        min: 0.0,
        max: 140.0,
        step: 10.0,
        default: 0.0,
    },
    ControlRange {
        param: "churn_level",
        description: "% Churn Low Skill",
        kind: ControlKind::FloatSlider,
        min: 0.0,
        max: 1.0,
        step: 0.05,
        default: 0.0,
    },
    ControlRange {
        param: "advanced_churn",
        description: "Churn all < K/D",
        kind: ControlKind::Checkbox,
        min: 0.0,
        max: 1.0,
        step: 1.0,
        default: 0.0,
    },
    ControlRange {
        param: "kd_churn_cutoff",
        description: "K/D Churn Cutoff",
        kind: ControlKind::FloatSlider,
        min: 0.1,
        max: 2.0,
        step: 0.05,
        default: 0.85,
    },
];

/// Human head-count per bracket for a single sampled lobby
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LobbyComposition {
    pub bot_count: u32,
    pub human_count: u32,
    /// Sampled humans per bracket, sums to `human_count`
    pub per_bracket_human_counts: [u32; NUM_BRACKETS],
    /// Post-churn sampling proportions, sums to 1
    pub proportions: [f64; NUM_BRACKETS],
    /// Mean head-count per bracket (`human_count * proportion`)
    pub expected_counts: [f64; NUM_BRACKETS],
}

impl LobbyComposition {
    /// Share of humans per bracket in percent (all zero for an all-bot lobby)
    pub fn percentages(&self) -> [f64; NUM_BRACKETS] {
        if self.human_count == 0 {
            return [0.0; NUM_BRACKETS];
        }
        let total = self.human_count as f64;
        self.per_bracket_human_counts
            .map(|count| count as f64 / total * 100.0)
    }
}

/// Qualitative lobby difficulty
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweatRating {
    Chill,
    Normal,
    Sweaty,
    UltraSweaty,
}

impl SweatRating {
    pub fn from_score(sweat: f64) -> Self {
        if sweat < 4.0 {
            SweatRating::Chill
        } else if sweat < 7.0 {
            SweatRating::Normal
        } else if sweat < 9.0 {
            SweatRating::Sweaty
        } else {
            SweatRating::UltraSweaty
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SweatRating::Chill => "Chill",
            SweatRating::Normal => "Normal",
            SweatRating::Sweaty => "Sweaty",
            SweatRating::UltraSweaty => "Ultra Sweaty!",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SweatRating::Chill => "😎",
            SweatRating::Normal => "🙂",
            SweatRating::Sweaty => "😰",
            SweatRating::UltraSweaty => "🔥",
        }
    }
}

impl fmt::Display for SweatRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Sweat score with the numbers it was derived from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweatScore {
    /// 1-10, one decimal
    pub value: f64,
    /// Weighted blend of median and top-N mean
    pub composite: f64,
    pub median_kd: f64,
    pub top10_mean_kd: f64,
    pub rating: SweatRating,
}

/// Full result of one lobby simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LobbyReport {
    pub params: LobbyParams,
    pub seed: u64,
    pub composition: LobbyComposition,
    pub score: SweatScore,
    /// Median over humans only, absent for an all-bot lobby
    pub human_median_kd: Option<f64>,
    pub churn_description: String,
}
