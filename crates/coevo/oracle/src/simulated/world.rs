//! A toy knowledge domain with a ground truth, used to exercise the full
//! co-evolution loop without a solver or a language model.
//!
//! Program text is one `predicate => answer` fact per line (`%` starts a
//! comment). A test is a `ask(predicate) ::: (answer) *` line, optionally
//! preceded by a `%` description. Synthesis is noisy: generated facts may use
//! a misspelled predicate (vocabulary noise) or a wrong answer (logic noise).

use crate::classify::{judge_prediction, OutcomeClassifier};
use crate::error::OracleError;
use crate::execution::ExecutionOracle;
use crate::request::SynthesisRequest;
use crate::synthesis::SynthesisOracle;
use async_trait::async_trait;
use coevo_types::{parse_gold_label, ExecutionResult, BLOCK_SEPARATOR};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Suffix appended to a predicate name when vocabulary noise strikes.
pub const MISSPELLING_SUFFIX: &str = "_v2";

const UNKNOWN_PROCEDURE: &str = "Unknown procedure ";

/// Ground truth: predicate name to its correct answer.
#[derive(Clone, Debug)]
pub struct KnowledgeWorld {
    facts: BTreeMap<String, String>,
}

impl KnowledgeWorld {
    pub fn new<K, V, I>(facts: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            facts: facts
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// A small insurance-contract world.
    pub fn insurance() -> Self {
        Self::new([
            ("covered_flood", "yes"),
            ("covered_fire", "yes"),
            ("covered_theft", "yes"),
            ("covered_skydiving", "no"),
            ("covered_war", "no"),
            ("covered_earthquake", "no"),
            ("refund_within_30_days", "yes"),
            ("requires_police_report", "yes"),
        ])
    }

    pub fn answer(&self, predicate: &str) -> Option<&str> {
        self.facts.get(predicate).map(String::as_str)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.facts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// A program answering every predicate correctly.
    pub fn reference_program(&self) -> String {
        render_program(&self.facts)
    }

    /// The canonical spelling of `predicate`, if the world knows it.
    fn canonical<'a>(&'a self, predicate: &str) -> Option<&'a str> {
        if let Some((k, _)) = self.facts.get_key_value(predicate) {
            return Some(k.as_str());
        }
        let stripped = predicate.strip_suffix(MISSPELLING_SUFFIX)?;
        self.facts.get_key_value(stripped).map(|(k, _)| k.as_str())
    }
}

/// Render a test for `predicate` with gold answer `gold`.
pub fn render_query(predicate: &str, gold: &str) -> String {
    format!(
        "% does the contract settle {}?\nask({}) ::: ({}) *",
        predicate, predicate, gold
    )
}

fn render_program(facts: &BTreeMap<String, String>) -> String {
    facts
        .iter()
        .map(|(k, v)| format!("{} => {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_program(text: &str) -> Result<BTreeMap<String, String>, String> {
    let mut facts = BTreeMap::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        match line.split_once("=>") {
            Some((k, v)) if !k.trim().is_empty() && !v.trim().is_empty() => {
                facts.insert(k.trim().to_string(), v.trim().to_string());
            }
            _ => return Err(format!("syntax error: line {}: {}", n + 1, line)),
        }
    }
    Ok(facts)
}

fn parse_goal(query: &str) -> Option<&str> {
    query.lines().find_map(|line| {
        let start = line.find("ask(")? + "ask(".len();
        let len = line[start..].find(')')?;
        let goal = line[start..start + len].trim();
        if goal.is_empty() {
            None
        } else {
            Some(goal)
        }
    })
}

fn unknown_procedure(error: &str) -> Option<&str> {
    let rest = error.strip_prefix(UNKNOWN_PROCEDURE)?;
    let (name, _arity) = rest.rsplit_once('/')?;
    Some(name)
}

fn flip(answer: &str) -> &'static str {
    if answer == "yes" {
        "no"
    } else {
        "yes"
    }
}

/// Executes world programs against world queries.
#[derive(Clone, Debug, Default)]
pub struct WorldExecutionOracle {
    classifier: OutcomeClassifier,
}

impl WorldExecutionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier deciding which solver diagnostics are vocabulary errors.
    pub fn with_classifier(mut self, classifier: OutcomeClassifier) -> Self {
        self.classifier = classifier;
        self
    }
}

#[async_trait]
impl ExecutionOracle for WorldExecutionOracle {
    async fn execute(&self, program: &str, query: &str) -> Result<ExecutionResult, OracleError> {
        if program.trim().is_empty() || query.trim().is_empty() {
            return Err(OracleError::MalformedInput(
                "missing program or test".into(),
            ));
        }
        let Some(goal) = parse_goal(query) else {
            return Ok(ExecutionResult::other_fail(
                "Malformed test case: no ask/1 goal",
            ));
        };
        let facts = match parse_program(program) {
            Ok(facts) => facts,
            Err(e) => return Ok(self.classifier.classify_failure(Some(e.as_str()))),
        };
        let Some(value) = facts.get(goal) else {
            let diagnostic = format!("{}{}/0", UNKNOWN_PROCEDURE, goal);
            return Ok(self.classifier.classify_failure(Some(diagnostic.as_str())));
        };
        let gold = parse_gold_label(query);
        Ok(judge_prediction(value, gold.as_deref()))
    }
}

/// Noisy synthesizer over a [`KnowledgeWorld`].
pub struct WorldSynthesisOracle {
    world: KnowledgeWorld,
    rng: Mutex<StdRng>,
    vocab_noise: f64,
    logic_noise: f64,
}

impl WorldSynthesisOracle {
    pub fn new(world: KnowledgeWorld, seed: u64) -> Self {
        Self {
            world,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            vocab_noise: 0.2,
            logic_noise: 0.3,
        }
    }

    /// Probability that a generated predicate name is misspelled.
    pub fn with_vocab_noise(mut self, p: f64) -> Self {
        self.vocab_noise = p.clamp(0.0, 1.0);
        self
    }

    /// Probability that a generated answer is wrong.
    pub fn with_logic_noise(mut self, p: f64) -> Self {
        self.logic_noise = p.clamp(0.0, 1.0);
        self
    }

    pub fn world(&self) -> &KnowledgeWorld {
        &self.world
    }

    fn noisy_name(&self, rng: &mut StdRng, predicate: &str) -> String {
        if rng.gen_bool(self.vocab_noise) {
            format!("{}{}", predicate, MISSPELLING_SUFFIX)
        } else {
            predicate.to_string()
        }
    }

    fn noisy_answer(&self, rng: &mut StdRng, predicate: &str) -> String {
        let truth = self.world.answer(predicate).unwrap_or("yes");
        if rng.gen_bool(self.logic_noise) {
            flip(truth).to_string()
        } else {
            truth.to_string()
        }
    }

    fn random_predicate(&self, rng: &mut StdRng) -> Result<String, OracleError> {
        self.world
            .predicates()
            .choose(rng)
            .map(str::to_string)
            .ok_or_else(|| OracleError::Unavailable("knowledge world is empty".into()))
    }

    fn query_for(&self, predicate: &str) -> String {
        render_query(predicate, self.world.answer(predicate).unwrap_or("yes"))
    }

    fn generate_program(&self, rng: &mut StdRng) -> String {
        let facts: BTreeMap<String, String> = self
            .world
            .predicates()
            .map(|p| (self.noisy_name(rng, p), self.noisy_answer(rng, p)))
            .collect();
        render_program(&facts)
    }

    fn generate_tests(&self, rng: &mut StdRng, count: usize) -> Result<String, OracleError> {
        let mut blocks = Vec::with_capacity(count);
        for _ in 0..count {
            let predicate = self.random_predicate(rng)?;
            let name = self.noisy_name(rng, &predicate);
            let gold = self.world.answer(&predicate).unwrap_or("yes");
            blocks.push(render_query(&name, gold));
        }
        Ok(blocks.join(&format!("\n{}\n", BLOCK_SEPARATOR)))
    }

    fn repair_program(&self, rng: &mut StdRng, program: &str, errors: &[String]) -> String {
        if errors.is_empty() {
            return program.to_string();
        }
        let mut facts = parse_program(program).unwrap_or_default();
        for error in errors {
            let Some(name) = unknown_procedure(error) else {
                continue;
            };
            if let Some(canonical) = self.world.canonical(name) {
                let answer = self.noisy_answer(rng, canonical);
                facts.insert(name.to_string(), answer);
            }
        }
        render_program(&facts)
    }

    fn repair_test(&self, rng: &mut StdRng, query: &str) -> Result<String, OracleError> {
        let predicate = match parse_goal(query).and_then(|g| self.world.canonical(g)) {
            Some(canonical) => canonical.to_string(),
            None => self.random_predicate(rng)?,
        };
        Ok(self.query_for(&predicate))
    }

    fn crossover(&self, rng: &mut StdRng, a: &str, b: &str) -> String {
        let fa = parse_program(a).unwrap_or_default();
        let fb = parse_program(b).unwrap_or_default();
        let mut child = BTreeMap::new();
        for key in fa.keys().chain(fb.keys()) {
            if child.contains_key(key) {
                continue;
            }
            let value = match (fa.get(key), fb.get(key)) {
                (Some(x), Some(y)) => {
                    if rng.gen_bool(0.5) {
                        x
                    } else {
                        y
                    }
                }
                (Some(x), None) | (None, Some(x)) => x,
                (None, None) => continue,
            };
            child.insert(key.clone(), value.clone());
        }
        render_program(&child)
    }

    fn mutate(&self, rng: &mut StdRng, program: &str) -> String {
        let mut facts = parse_program(program).unwrap_or_default();
        let Some(key) = facts.keys().choose(rng).cloned() else {
            return self.generate_program(rng);
        };
        let canonical = self.world.canonical(&key).map(str::to_string);
        let Some(canonical) = canonical else {
            facts.remove(&key);
            return render_program(&facts);
        };
        facts.remove(&key);
        let answer = self.noisy_answer(rng, &canonical);
        facts.insert(canonical, answer);
        render_program(&facts)
    }

    fn targeted_test(
        &self,
        rng: &mut StdRng,
        failing: &[String],
        passing: &[String],
    ) -> Result<String, OracleError> {
        let failing_known: Vec<&str> = failing
            .iter()
            .filter_map(|q| parse_goal(q).and_then(|g| self.world.canonical(g)))
            .collect();
        if let Some(p) = failing_known.iter().choose(rng) {
            return Ok(self.query_for(p));
        }
        let covered: Vec<&str> = passing.iter().filter_map(|q| parse_goal(q)).collect();
        let fresh = self
            .world
            .predicates()
            .filter(|p| !covered.contains(p))
            .choose(rng)
            .map(str::to_string);
        let predicate = match fresh {
            Some(p) => p,
            None => self.random_predicate(rng)?,
        };
        Ok(self.query_for(&predicate))
    }
}

#[async_trait]
impl SynthesisOracle for WorldSynthesisOracle {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, OracleError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| OracleError::Unavailable("rng lock poisoned".into()))?;
        let rng = &mut *rng;

        match request {
            SynthesisRequest::GenerateProgram { .. } => Ok(self.generate_program(rng)),
            SynthesisRequest::GenerateTests { count, .. } => self.generate_tests(rng, *count),
            SynthesisRequest::RepairProgram { program, errors } => {
                Ok(self.repair_program(rng, program, errors))
            }
            SynthesisRequest::RepairTest { query, .. } => self.repair_test(rng, query),
            SynthesisRequest::CrossoverPrograms {
                parent_a, parent_b, ..
            } => Ok(self.crossover(rng, parent_a, parent_b)),
            SynthesisRequest::MutateProgram { program, .. } => Ok(self.mutate(rng, program)),
            SynthesisRequest::TargetedTest {
                failing, passing, ..
            } => self.targeted_test(rng, failing, passing),
        }
    }
}
