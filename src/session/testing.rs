//! In-memory `LogicEngine` double for tests.
//!
//! Understands just enough to exercise the session protocol: ground
//! `relative/3` facts, goals over them with uppercase variables, plus a
//! few fixed goals (`true.`, `repeat.`, `throw(...)`, and `loop.`, which
//! answers once then runs out of resolution steps).

use std::collections::VecDeque;

use super::engine::{EngineError, LogicEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeAnswer {
    Bindings(Vec<(String, String)>),
    True,
    Exception(String),
    Limit,
}

#[derive(Debug, Default)]
pub struct FakeEngine {
    facts: Vec<[String; 3]>,
    pending: VecDeque<FakeAnswer>,
    infinite: bool,
    /// Every program passed to `consult`, successful or not
    pub consult_log: Vec<String>,
    /// Programs containing this text fail to consult
    pub consult_poison: Option<String>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: &str) -> Self {
        let mut engine = Self::new();
        engine.facts = parse_facts(program);
        engine
    }
}

fn parse_args(term: &str) -> Option<Vec<String>> {
    let inner = term.trim().strip_prefix("relative(")?.strip_suffix(").")?;
    let args: Vec<String> = inner.split(',').map(|a| a.trim().to_string()).collect();
    (args.len() == 3).then_some(args)
}

fn parse_facts(program: &str) -> Vec<[String; 3]> {
    program
        .lines()
        .filter_map(parse_args)
        .map(|a| [a[0].clone(), a[1].clone(), a[2].clone()])
        .collect()
}

fn is_variable(arg: &str) -> bool {
    arg.chars().next().is_some_and(|c| c.is_ascii_uppercase() || c == '_')
}

impl LogicEngine for FakeEngine {
    type Answer = FakeAnswer;

    async fn consult(&mut self, program: &str) -> Result<(), EngineError> {
        self.consult_log.push(program.to_string());
        if let Some(poison) = &self.consult_poison {
            if program.contains(poison.as_str()) {
                return Err(EngineError::new(format!("syntax error near {}", poison)));
            }
        }
        self.facts = parse_facts(program);
        Ok(())
    }

    async fn query(&mut self, goal: &str) -> Result<(), EngineError> {
        let goal = goal.trim();
        if !goal.ends_with('.') {
            return Err(EngineError::new("syntax error: unexpected end of goal"));
        }

        self.pending.clear();
        self.infinite = false;

        if goal == "true." {
            self.pending.push_back(FakeAnswer::True);
        } else if goal == "repeat." {
            self.infinite = true;
        } else if goal == "loop." {
            self.pending.push_back(FakeAnswer::True);
            self.pending.push_back(FakeAnswer::Limit);
            self.pending.push_back(FakeAnswer::True);
        } else if let Some(ball) = goal.strip_prefix("throw(").and_then(|g| g.strip_suffix(").")) {
            self.pending.push_back(FakeAnswer::Exception(ball.to_string()));
        } else if let Some(pattern) = parse_args(goal) {
            for fact in &self.facts {
                let mut bindings = Vec::new();
                let matched = pattern.iter().zip(fact.iter()).all(|(p, f)| {
                    if is_variable(p) {
                        bindings.push((p.clone(), f.clone()));
                        true
                    } else {
                        p == f
                    }
                });
                if matched {
                    self.pending.push_back(if bindings.is_empty() {
                        FakeAnswer::True
                    } else {
                        FakeAnswer::Bindings(bindings)
                    });
                }
            }
        } else {
            return Err(EngineError::new(format!("unknown procedure in {}", goal)));
        }

        Ok(())
    }

    async fn next_answer(&mut self) -> Option<FakeAnswer> {
        if self.infinite {
            return Some(FakeAnswer::True);
        }
        self.pending.pop_front()
    }

    fn format_answer(&self, answer: Option<&FakeAnswer>) -> String {
        match answer {
            None => "false.".to_string(),
            Some(FakeAnswer::True) => "true.".to_string(),
            Some(FakeAnswer::Bindings(bindings)) => {
                let parts: Vec<String> = bindings
                    .iter()
                    .map(|(var, value)| format!("{} = {}", var, value))
                    .collect();
                format!("{}.", parts.join(", "))
            }
            Some(FakeAnswer::Exception(ball)) => format!("uncaught exception: {}", ball),
            Some(FakeAnswer::Limit) => "limit exceeded ;".to_string(),
        }
    }

    fn ends_stream(&self, answer: &FakeAnswer) -> bool {
        *answer == FakeAnswer::Limit
    }
}
