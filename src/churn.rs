use crate::types::*;

/// How low-skill players leave the population before a lobby is sampled
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChurnModel {
    /// Down-weight the two lowest brackets by `level` (0-1)
    Proportional { level: f64 },
    /// Drop every bracket whose representative K/D is below `cutoff`
    Threshold { cutoff: f64 },
}

impl ChurnModel {
    pub fn from_params(params: &LobbyParams) -> Self {
        if params.advanced_churn {
            ChurnModel::Threshold {
                cutoff: params.kd_churn_cutoff,
            }
        } else {
            ChurnModel::Proportional {
                level: params.churn_level,
            }
        }
    }

    /// Post-churn bracket proportions; always sums to 1
    pub fn apply(&self, defaults: &[f64; NUM_BRACKETS]) -> [f64; NUM_BRACKETS] {
        match *self {
            ChurnModel::Proportional { level } => {
                let mut props = *defaults;
                props[0] *= 1.0 - level;
                props[1] *= 1.0 - level;
                normalize(&mut props);
                props
            }
            ChurnModel::Threshold { cutoff } => {
                let mut props = *defaults;
                for (prop, bracket) in props.iter_mut().zip(BRACKETS.iter()) {
                    if bracket.representative_kd < cutoff {
                        *prop = 0.0;
                    }
                }

                if props.iter().sum::<f64>() <= 0.0 {
                    // Everyone churned: the lobby is all top bracket
                    #[cfg(feature = "debug")]
                    crate::debug_log!("Threshold churn at {:.2} removed every bracket, using top bracket", cutoff);
                    let mut fallback = [0.0; NUM_BRACKETS];
                    fallback[NUM_BRACKETS - 1] = 1.0;
                    return fallback;
                }

                normalize(&mut props);
                props
            }
        }
    }

    /// Short human-readable label used in chart titles
    pub fn description(&self) -> String {
        match *self {
            ChurnModel::Proportional { level } => {
                format!("Churn {:.0}% of lowest 20%", level * 100.0)
            }
            ChurnModel::Threshold { cutoff } => format!("Churn ALL under {:.2} K/D", cutoff),
        }
    }
}

fn normalize(props: &mut [f64; NUM_BRACKETS]) {
    let total: f64 = props.iter().sum();
    if total > 0.0 {
        for p in props.iter_mut() {
            *p /= total;
        }
    }
}
