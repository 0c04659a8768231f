//! Arithmetic challenge generation and the mission session.
//!
//! A ringing alarm is dismissed by solving `required_streak(difficulty)`
//! problems in a row. Operand ranges widen and the operator mix shifts
//! toward multiplication as difficulty rises. A wrong answer resets the
//! in-progress streak and issues a fresh problem.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::alarm::Difficulty;

/// Operator of an arithmetic problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Add,
    Subtract,
    Multiply,
}

impl Op {
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Subtract => "-",
            Op::Multiply => "*",
        }
    }

    fn apply(&self, a: i64, b: i64) -> i64 {
        match self {
            Op::Add => a + b,
            Op::Subtract => a - b,
            Op::Multiply => a * b,
        }
    }
}

/// One arithmetic problem. Ephemeral except while a mission is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub a: i64,
    pub b: i64,
    pub op: Op,
    /// Ordinary integer arithmetic; subtraction may go negative.
    pub answer: i64,
}

impl Problem {
    fn new(a: i64, b: i64, op: Op) -> Self {
        Self {
            a,
            b,
            op,
            answer: op.apply(a, b),
        }
    }

    /// Rendering like `7 + 4 = ?`.
    pub fn prompt(&self) -> String {
        format!("{} {} {} = ?", self.a, self.op.symbol(), self.b)
    }
}

/// Consecutive correct answers needed to resolve a mission.
pub fn required_streak(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 3,
        Difficulty::Medium => 5,
        Difficulty::Hard => 7,
        Difficulty::Unknown => 3,
    }
}

/// Generate one problem for the given tier.
pub fn generate(difficulty: Difficulty, rng: &mut impl Rng) -> Problem {
    match difficulty {
        Difficulty::Medium => {
            let a = rng.gen_range(5..=24);
            let b = rng.gen_range(5..=24);
            let r: f64 = rng.gen();
            let op = if r < 0.4 {
                Op::Add
            } else if r < 0.8 {
                Op::Subtract
            } else {
                Op::Multiply
            };
            Problem::new(a, b, op)
        }
        Difficulty::Hard => {
            let a = rng.gen_range(10..=49);
            let b = rng.gen_range(5..=24);
            let op = if rng.gen_bool(0.6) {
                Op::Multiply
            } else if rng.gen_bool(0.5) {
                Op::Add
            } else {
                Op::Subtract
            };
            Problem::new(a, b, op)
        }
        // Unknown tiers play the gentlest mission.
        Difficulty::Easy | Difficulty::Unknown => {
            let a = rng.gen_range(1..=10);
            let b = rng.gen_range(1..=10);
            let op = if rng.gen_bool(0.5) { Op::Add } else { Op::Subtract };
            Problem::new(a, b, op)
        }
    }
}

/// Outcome of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MissionOutcome {
    /// Streak advanced; more problems to go.
    Correct { remaining: u32 },
    /// Streak reset to zero, fresh problem issued.
    Wrong,
    /// Required streak reached; the ring cycle can be resolved.
    Solved,
}

/// An in-flight mission for one ring cycle.
///
/// Serializable so a CLI invocation can park it in the kv store between
/// answers. Holds no RNG -- callers pass one to `submit`, which keeps the
/// session deterministic under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub alarm_id: String,
    pub difficulty: Difficulty,
    pub required: u32,
    pub correct: u32,
    pub problem: Problem,
}

impl Mission {
    pub fn begin(alarm_id: impl Into<String>, difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        Self {
            alarm_id: alarm_id.into(),
            difficulty,
            required: required_streak(difficulty),
            correct: 0,
            problem: generate(difficulty, rng),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.correct)
    }

    /// Grade an answer and advance the session.
    ///
    /// On `Solved` the mission is finished and `submit` must not be called
    /// again; the caller routes into the reconciler's resolve-success path.
    pub fn submit(&mut self, answer: i64, rng: &mut impl Rng) -> MissionOutcome {
        if answer == self.problem.answer {
            self.correct += 1;
            if self.correct >= self.required {
                return MissionOutcome::Solved;
            }
            self.problem = generate(self.difficulty, rng);
            MissionOutcome::Correct {
                remaining: self.remaining(),
            }
        } else {
            self.correct = 0;
            self.problem = generate(self.difficulty, rng);
            MissionOutcome::Wrong
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn rng(seed: u64) -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(seed)
    }

    #[test]
    fn required_streak_per_tier() {
        assert_eq!(required_streak(Difficulty::Easy), 3);
        assert_eq!(required_streak(Difficulty::Medium), 5);
        assert_eq!(required_streak(Difficulty::Hard), 7);
        assert_eq!(required_streak(Difficulty::Unknown), 3);
    }

    #[test]
    fn easy_problems_stay_in_range_without_multiplication() {
        let mut rng = rng(7);
        for _ in 0..200 {
            let p = generate(Difficulty::Easy, &mut rng);
            assert!((1..=10).contains(&p.a));
            assert!((1..=10).contains(&p.b));
            assert_ne!(p.op, Op::Multiply);
            assert_eq!(p.answer, p.op.apply(p.a, p.b));
        }
    }

    #[test]
    fn medium_problems_mix_in_multiplication() {
        let mut rng = rng(11);
        let mut saw_multiply = false;
        for _ in 0..200 {
            let p = generate(Difficulty::Medium, &mut rng);
            assert!((5..=24).contains(&p.a));
            assert!((5..=24).contains(&p.b));
            saw_multiply |= p.op == Op::Multiply;
            assert_eq!(p.answer, p.op.apply(p.a, p.b));
        }
        assert!(saw_multiply, "medium tier never multiplied in 200 draws");
    }

    #[test]
    fn hard_problems_widen_operands_and_bias_multiplication() {
        let mut rng = rng(13);
        let mut multiplies = 0;
        for _ in 0..200 {
            let p = generate(Difficulty::Hard, &mut rng);
            assert!((10..=49).contains(&p.a));
            assert!((5..=24).contains(&p.b));
            if p.op == Op::Multiply {
                multiplies += 1;
            }
        }
        assert!(multiplies > 80, "hard tier should be multiplication-biased");
    }

    #[test]
    fn subtraction_may_go_negative() {
        let mut rng = rng(3);
        let negative = std::iter::repeat_with(|| generate(Difficulty::Easy, &mut rng))
            .take(500)
            .any(|p| p.answer < 0);
        assert!(negative, "no negative answer in 500 easy draws");
    }

    #[test]
    fn mission_resolves_after_required_streak() {
        let mut rng = rng(21);
        let mut mission = Mission::begin("a1", Difficulty::Easy, &mut rng);

        let answer = mission.problem.answer;
        assert_eq!(
            mission.submit(answer, &mut rng),
            MissionOutcome::Correct { remaining: 2 }
        );
        let answer = mission.problem.answer;
        assert_eq!(
            mission.submit(answer, &mut rng),
            MissionOutcome::Correct { remaining: 1 }
        );
        let answer = mission.problem.answer;
        assert_eq!(mission.submit(answer, &mut rng), MissionOutcome::Solved);
    }

    #[test]
    fn wrong_answer_resets_streak_without_resolving() {
        let mut rng = rng(23);
        let mut mission = Mission::begin("a1", Difficulty::Easy, &mut rng);

        let answer = mission.problem.answer;
        mission.submit(answer, &mut rng);
        let answer = mission.problem.answer;
        mission.submit(answer, &mut rng);
        assert_eq!(mission.correct, 2);

        let wrong = mission.problem.answer + 1;
        assert_eq!(mission.submit(wrong, &mut rng), MissionOutcome::Wrong);
        assert_eq!(mission.correct, 0);
        assert_eq!(mission.remaining(), 3);
    }

    #[test]
    fn mission_survives_serde_roundtrip() {
        let mut rng = rng(31);
        let mission = Mission::begin("a1", Difficulty::Hard, &mut rng);
        let json = serde_json::to_string(&mission).unwrap();
        let back: Mission = serde_json::from_str(&json).unwrap();
        assert_eq!(back.problem, mission.problem);
        assert_eq!(back.required, 7);
    }
}
