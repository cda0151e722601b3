use crate::churn::ChurnModel;
use crate::scoring::{median, sweat_score, TOP_N};
use crate::types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution, Normal};

/// Spread of human K/D around the bracket's representative value
pub const KD_SPREAD: f64 = 0.05;
/// Sampled K/Ds never drop below this
pub const KD_FLOOR: f64 = 0.05;
/// Bot K/D range (uniform)
pub const BOT_KD_MIN: f64 = 0.1;
pub const BOT_KD_MAX: f64 = 0.6;

/// Samples synthetic lobbies and scores them
///
/// The RNG is rebuilt from `seed` on every call to [`LobbySimulator::simulate`],
/// so a report depends only on the parameters and the seed.
#[derive(Clone, Debug)]
pub struct LobbySimulator {
    seed: u64,
}

impl Default for LobbySimulator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl LobbySimulator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Sample one lobby for `params` and score it
    pub fn simulate(&self, params: &LobbyParams) -> Result<LobbyReport, String> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let churn = ChurnModel::from_params(params);
        let proportions = churn.apply(&default_proportions());
        let human_count = params.human_count();

        let counts = multinomial_sample(human_count, &proportions, &mut rng)?;
        let human_kds = sample_human_kds(&counts, &mut rng)?;
        let bot_kds = sample_bot_kds(params.bot_count, &mut rng);

        let mut all_kds = Vec::with_capacity(human_kds.len() + bot_kds.len());
        all_kds.extend_from_slice(&human_kds);
        all_kds.extend_from_slice(&bot_kds);
        let score = sweat_score(&all_kds, TOP_N);

        #[cfg(feature = "debug")]
        crate::debug_log!(
            "seed {} bots {} humans {} counts {:?} -> sweat {:.1} (composite {:.2})",
            self.seed,
            params.bot_count,
            human_count,
            counts,
            score.value,
            score.composite
        );

        let expected_counts = proportions.map(|p| human_count as f64 * p);

        Ok(LobbyReport {
            params: params.clone(),
            seed: self.seed,
            composition: LobbyComposition {
                bot_count: params.bot_count,
                human_count,
                per_bracket_human_counts: counts,
                proportions,
                expected_counts,
            },
            score,
            human_median_kd: median(&human_kds),
            churn_description: churn.description(),
        })
    }
}

/// Multinomial draw via conditional binomials
///
/// Counts are non-negative and always sum to `n`. The last bracket with mass
/// takes whatever is left so float drift in `probs` cannot lose players.
pub fn multinomial_sample(
    n: u32,
    probs: &[f64; NUM_BRACKETS],
    rng: &mut impl Rng,
) -> Result<[u32; NUM_BRACKETS], String> {
    let mut counts = [0u32; NUM_BRACKETS];
    if n == 0 {
        return Ok(counts);
    }

    let last = probs
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or_else(|| "Cannot sample from brackets with no probability mass".to_string())?;

    let mut remaining = n as u64;
    let mut remaining_mass: f64 = probs[..=last].iter().sum();

    for i in 0..last {
        if remaining == 0 {
            break;
        }
        let p = probs[i];
        let conditional = if remaining_mass > 0.0 {
            (p / remaining_mass).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let drawn = Binomial::new(remaining, conditional)
            .map_err(|e| format!("Binomial error for bracket {}: {}", i, e))?
            .sample(rng);
        counts[i] = drawn as u32;
        remaining -= drawn;
        remaining_mass -= p;
    }
    counts[last] += remaining as u32;

    Ok(counts)
}

/// K/D per human, bracket by bracket in bracket order
pub fn sample_human_kds(
    counts: &[u32; NUM_BRACKETS],
    rng: &mut impl Rng,
) -> Result<Vec<f64>, String> {
    let total: u32 = counts.iter().sum();
    let mut kds = Vec::with_capacity(total as usize);

    for (&count, bracket) in counts.iter().zip(BRACKETS.iter()) {
        let dist = Normal::new(bracket.representative_kd, KD_SPREAD)
            .map_err(|e| format!("K/D distribution error for {}: {}", bracket.label, e))?;
        kds.extend((0..count).map(|_| dist.sample(rng).max(KD_FLOOR)));
    }

    Ok(kds)
}

/// Bot K/Ds, uniform over the bot range regardless of brackets
pub fn sample_bot_kds(bot_count: u32, rng: &mut impl Rng) -> Vec<f64> {
    (0..bot_count)
        .map(|_| rng.gen_range(BOT_KD_MIN..BOT_KD_MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_human_count() {
        let sim = LobbySimulator::default();
        for bots in (0..=140).step_by(10) {
            for step in 0..=20 {
                let params = LobbyParams {
                    bot_count: bots,
                    churn_level: step as f64 * 0.05,
                    ..Default::default()
                };
                let report = sim.simulate(&params).unwrap();
                let comp = &report.composition;
                assert_eq!(comp.human_count, LOBBY_SIZE - bots);
                assert_eq!(comp.bot_count + comp.human_count, LOBBY_SIZE);
                assert_eq!(comp.per_bracket_human_counts.iter().sum::<u32>(), comp.human_count);

                let total: f64 = comp.proportions.iter().sum();
                assert!((total - 1.0).abs() < 1e-9);
                assert!((1.0..=10.0).contains(&report.score.value));
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let params = LobbyParams::default();
        let first = LobbySimulator::new(DEFAULT_SEED).simulate(&params).unwrap();
        let second = LobbySimulator::new(DEFAULT_SEED).simulate(&params).unwrap();
        assert_eq!(first.composition.per_bracket_human_counts, [19, 15, 80, 32, 4, 0]);
        assert_eq!(
            first.composition.per_bracket_human_counts,
            second.composition.per_bracket_human_counts
        );
        assert_eq!(first.score, second.score);
        assert_eq!(first.score.value, 8.2);
        assert_eq!(first.score.rating, SweatRating::Sweaty);
    }

    #[test]
    fn test_result_independent_of_call_order() {
        let sim = LobbySimulator::default();
        let base = LobbyParams::default();
        let other = LobbyParams {
            bot_count: 70,
            advanced_churn: true,
            ..Default::default()
        };

        let before = sim.simulate(&base).unwrap();
        sim.simulate(&other).unwrap();
        let after = sim.simulate(&base).unwrap();
        assert_eq!(before.composition, after.composition);
        assert_eq!(before.score, after.score);
    }

    #[test]
    fn test_default_params_use_renormalized_defaults() {
        let report = LobbySimulator::default().simulate(&LobbyParams::default()).unwrap();
        let expected = [0.10, 0.10, 0.50, 0.19, 0.009, 0.001].map(|p| p / 0.9);
        for (p, e) in report.composition.proportions.iter().zip(expected.iter()) {
            assert!((p - e).abs() < 1e-12);
        }
        let total: f64 = report.composition.proportions.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((report.composition.expected_counts[2] - 150.0 * 0.5 / 0.9).abs() < 1e-9);
        assert_eq!(report.churn_description, "Churn 0% of lowest 20%");
    }

    #[test]
    fn test_threshold_churn_excludes_low_brackets() {
        let params = LobbyParams {
            advanced_churn: true,
            kd_churn_cutoff: 0.85,
            ..Default::default()
        };
        let report = LobbySimulator::default().simulate(&params).unwrap();
        let counts = report.composition.per_bracket_human_counts;
        assert_eq!(&counts[..3], &[0, 0, 0]);
        assert_eq!(counts.iter().sum::<u32>(), LOBBY_SIZE);
    }

    #[test]
    fn test_cutoff_above_top_bracket_fills_top_bracket() {
        let params = LobbyParams {
            bot_count: 50,
            advanced_churn: true,
            kd_churn_cutoff: 5.0,
            ..Default::default()
        };
        let report = LobbySimulator::default().simulate(&params).unwrap();
        assert_eq!(report.composition.per_bracket_human_counts, [0, 0, 0, 0, 0, 100]);
        assert_eq!(report.score.rating, SweatRating::UltraSweaty);
    }

    #[test]
    fn test_all_bot_lobby() {
        let params = LobbyParams {
            bot_count: LOBBY_SIZE,
            ..Default::default()
        };
        let report = LobbySimulator::default().simulate(&params).unwrap();
        assert_eq!(report.composition.human_count, 0);
        assert_eq!(report.composition.per_bracket_human_counts, [0; NUM_BRACKETS]);
        assert!(report.human_median_kd.is_none());
        assert!(report.score.median_kd >= BOT_KD_MIN && report.score.median_kd < BOT_KD_MAX);
        assert_eq!(report.score.rating, SweatRating::Chill);
    }

    #[test]
    fn test_bots_soften_the_lobby() {
        let sim = LobbySimulator::default();
        let humans_only = sim.simulate(&LobbyParams::default()).unwrap();
        let mostly_bots = sim
            .simulate(&LobbyParams {
                bot_count: 140,
                ..Default::default()
            })
            .unwrap();
        assert!(mostly_bots.score.value < humans_only.score.value);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = LobbyParams {
            bot_count: 151,
            ..Default::default()
        };
        assert!(LobbySimulator::default().simulate(&params).is_err());
    }

    #[test]
    fn test_multinomial_respects_zero_mass() {
        let mut rng = StdRng::seed_from_u64(7);
        let probs = [0.0, 0.5, 0.0, 0.5, 0.0, 0.0];
        for _ in 0..50 {
            let counts = multinomial_sample(100, &probs, &mut rng).unwrap();
            assert_eq!(counts.iter().sum::<u32>(), 100);
            assert_eq!(counts[0], 0);
            assert_eq!(counts[2], 0);
            assert_eq!(counts[4], 0);
            assert_eq!(counts[5], 0);
        }
    }

    #[test]
    fn test_multinomial_without_mass_errors() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(multinomial_sample(10, &[0.0; NUM_BRACKETS], &mut rng).is_err());
        assert_eq!(
            multinomial_sample(0, &[0.0; NUM_BRACKETS], &mut rng).unwrap(),
            [0; NUM_BRACKETS]
        );
    }

    #[test]
    fn test_sampled_kds_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let human = sample_human_kds(&[50, 0, 0, 0, 0, 50], &mut rng).unwrap();
        assert_eq!(human.len(), 100);
        assert!(human.iter().all(|&kd| kd >= KD_FLOOR));
        assert!(human[..50].iter().all(|&kd| (kd - 0.25).abs() < 0.5));
        assert!(human[50..].iter().all(|&kd| (kd - 4.0).abs() < 0.5));

        let bots = sample_bot_kds(200, &mut rng);
        assert_eq!(bots.len(), 200);
        assert!(bots.iter().all(|&kd| (BOT_KD_MIN..BOT_KD_MAX).contains(&kd)));
    }
}
