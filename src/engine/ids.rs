//! Identifier allocation for duplicated entities
//!
//! Host ids are 18-19 digit numeric strings. The default generator builds them
//! from the millisecond clock plus a six digit random tail, which keeps new ids
//! in the same shape as the ones already in a configuration.

use chrono::Utc;
use log::debug;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;

static ID_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{18,19}$").unwrap());

/// Key fragments that mark a JSON field as holding an entity id
pub const ID_KEY_VOCABULARY: &[&str] = &[
    "id",
    "parameterId",
    "taskId",
    "stageId",
    "checklistId",
    "referencedParameterId",
    "autoInitialize",
    "actionId",
    "effectId",
    "triggerEntityId",
];

/// Source of fresh entity ids
pub trait IdGenerator {
    fn next_id(&mut self) -> String;

    /// Allocate `count` ids, none repeated within the batch
    fn allocate(&mut self, count: usize) -> Vec<String> {
        let mut seen = HashSet::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        while ids.len() < count {
            let id = self.next_id();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Clock + random generator matching the host id convention
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    issued: HashSet<String>,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw() -> String {
        let timestamp = Utc::now().timestamp_millis();
        let random: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{}{:06}", timestamp, random)
    }
}

impl IdGenerator for TimestampIdGenerator {
    /// Never repeats an id this generator has already handed out
    fn next_id(&mut self) -> String {
        loop {
            let id = Self::draw();
            if self.issued.insert(id.clone()) {
                return id;
            }
            debug!("Identifier collision on {}, drawing again", id);
        }
    }
}

/// Deterministic generator for tests and reproducible runs
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    pub const DEFAULT_START: u64 = 1_000_000_000_000_000_001;

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(Self::DEFAULT_START)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{:019}", self.next);
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }

    fn allocate(&mut self, count: usize) -> Vec<String> {
        (**self).allocate(count)
    }
}

/// Whether a value has the shape of a host entity id
pub fn looks_like_id(value: &serde_json::Value) -> bool {
    value.as_str().is_some_and(|s| ID_SHAPE.is_match(s))
}

/// Whether a field name suggests it holds an id
pub fn is_id_key(key: &str) -> bool {
    let key = key.to_lowercase();
    ID_KEY_VOCABULARY.iter().any(|fragment| key.contains(&fragment.to_lowercase()))
}

/// A key/value pair is treated as a reference only when both name and shape agree
pub fn is_id_reference(key: &str, value: &serde_json::Value) -> bool {
    is_id_key(key) && looks_like_id(value)
}
