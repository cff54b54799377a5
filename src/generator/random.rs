use std::ops::RangeInclusive;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use uuid::Uuid;

use super::MatchSource;
use crate::models::{ExtendedOdds, GoalLine, Match, OddsSet, TotalsLine};

/// Matches generated per day
pub const MATCHES_PER_DAY: usize = 12;

/// Fixed team roster
pub const TEAMS: [&str; 20] = [
    "Arsenal",
    "Chelsea",
    "Liverpool",
    "Manchester City",
    "Manchester United",
    "Tottenham",
    "Newcastle",
    "Aston Villa",
    "Real Madrid",
    "Barcelona",
    "Atletico Madrid",
    "Sevilla",
    "Bayern Munich",
    "Borussia Dortmund",
    "Juventus",
    "Inter",
    "AC Milan",
    "Napoli",
    "Paris Saint-Germain",
    "Ajax",
];

const KICKOFF_HOURS: RangeInclusive<u32> = 12..=22;
const KICKOFF_MINUTES: [u32; 4] = [0, 15, 30, 45];

// Odds ranges in hundredths; the home side is favoured
const HOME_ODDS: RangeInclusive<i64> = 120..=250;
const DRAW_ODDS: RangeInclusive<i64> = 280..=450;
const AWAY_ODDS: RangeInclusive<i64> = 250..=700;

/// (line, over range, under range) in hundredths
const TOTALS_ODDS: [(GoalLine, RangeInclusive<i64>, RangeInclusive<i64>); 5] = [
    (GoalLine::Half, 105..=115, 600..=900),
    (GoalLine::OneAndHalf, 125..=150, 260..=340),
    (GoalLine::TwoAndHalf, 170..=220, 165..=210),
    (GoalLine::ThreeAndHalf, 260..=360, 125..=145),
    (GoalLine::FourAndHalf, 400..=650, 108..=118),
];

/// Lowest odd a derived double-chance price is allowed to take
const MIN_DOUBLE_CHANCE: Decimal = dec!(1.01);

/// Generates a random fixture list with favourite-biased odds
pub struct RandomMatchGenerator {
    rng: Mutex<StdRng>,
}

impl RandomMatchGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Generator with a fixed seed, for reproducible sequences
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generate a full day of matches
    pub fn generate(&self) -> Vec<Match> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..MATCHES_PER_DAY).map(|_| random_match(&mut *rng)).collect()
    }
}

impl Default for RandomMatchGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchSource for RandomMatchGenerator {
    fn name(&self) -> &'static str {
        "random"
    }

    async fn matches_for(&self, date: NaiveDate) -> Result<Vec<Match>> {
        let matches = self.generate();
        debug!("Generated {} matches for {}", matches.len(), date);
        Ok(matches)
    }
}

fn random_match(rng: &mut StdRng) -> Match {
    let home = pick_team(rng);
    let mut away = pick_team(rng);
    while away == home {
        away = pick_team(rng);
    }

    let hour = rng.gen_range(KICKOFF_HOURS);
    let minute = KICKOFF_MINUTES.choose(rng).copied().unwrap_or(0);

    let home_odd = random_odd(rng, HOME_ODDS);
    let draw_odd = random_odd(rng, DRAW_ODDS);
    let away_odd = random_odd(rng, AWAY_ODDS);

    let totals = TOTALS_ODDS
        .iter()
        .map(|(line, over, under)| TotalsLine {
            line: *line,
            over: random_odd(rng, over.clone()),
            under: random_odd(rng, under.clone()),
        })
        .collect();

    let extended = ExtendedOdds {
        home_or_draw: double_chance(home_odd, draw_odd),
        home_or_away: double_chance(home_odd, away_odd),
        draw_or_away: double_chance(draw_odd, away_odd),
        totals,
    };

    Match {
        id: Uuid::new_v4(),
        home: home.to_string(),
        away: away.to_string(),
        kickoff: format!("{:02}:{:02}", hour, minute),
        odds: OddsSet {
            home: home_odd,
            draw: draw_odd,
            away: away_odd,
            extended: Some(extended),
        },
    }
}

fn pick_team(rng: &mut StdRng) -> &'static str {
    TEAMS[rng.gen_range(0..TEAMS.len())]
}

/// Uniform odd at two-decimal resolution
fn random_odd(rng: &mut StdRng, hundredths: RangeInclusive<i64>) -> Decimal {
    Decimal::new(rng.gen_range(hundredths), 2)
}

/// Price of a bet that wins on either of two outcomes
fn double_chance(a: Decimal, b: Decimal) -> Decimal {
    let combined = Decimal::ONE / (Decimal::ONE / a + Decimal::ONE / b);
    combined.round_dp(2).max(MIN_DOUBLE_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_twelve_matches() {
        let generator = RandomMatchGenerator::with_seed(7);
        assert_eq!(generator.generate().len(), MATCHES_PER_DAY);
    }

    #[test]
    fn test_generated_matches_respect_ranges() {
        let generator = RandomMatchGenerator::with_seed(42);

        for _ in 0..20 {
            for m in generator.generate() {
                assert_ne!(m.home, m.away);
                assert!(TEAMS.contains(&m.home.as_str()));
                assert!(TEAMS.contains(&m.away.as_str()));

                let kickoff = m.kickoff_time().expect("kickoff should parse");
                assert!(KICKOFF_HOURS.contains(&chrono::Timelike::hour(&kickoff)));
                assert!(KICKOFF_MINUTES.contains(&chrono::Timelike::minute(&kickoff)));

                assert!(m.odds.home >= dec!(1.20) && m.odds.home <= dec!(2.50));
                assert!(m.odds.draw >= dec!(2.80) && m.odds.draw <= dec!(4.50));
                assert!(m.odds.away >= dec!(2.50) && m.odds.away <= dec!(7.00));
                assert!(m.odds.is_valid());

                let extended = m.odds.extended.as_ref().unwrap();
                assert_eq!(extended.totals.len(), GoalLine::ALL.len());
            }
        }
    }

    #[test]
    fn test_same_seed_same_odds() {
        let a = RandomMatchGenerator::with_seed(99).generate();
        let b = RandomMatchGenerator::with_seed(99).generate();

        let odds_a: Vec<_> = a.iter().map(|m| (&m.home, &m.away, &m.kickoff, &m.odds)).collect();
        let odds_b: Vec<_> = b.iter().map(|m| (&m.home, &m.away, &m.kickoff, &m.odds)).collect();
        assert_eq!(odds_a, odds_b);
    }

    #[test]
    fn test_repeated_calls_differ() {
        let generator = RandomMatchGenerator::with_seed(3);
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_double_chance() {
        // 1 / (1/2 + 1/2) = 1.00, floored
        assert_eq!(double_chance(dec!(2.00), dec!(2.00)), dec!(1.01));
        // 1 / (1/2 + 1/4) = 1.333...
        assert_eq!(double_chance(dec!(2.00), dec!(4.00)), dec!(1.33));
    }
}
