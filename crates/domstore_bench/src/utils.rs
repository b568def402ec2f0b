//! Benchmark utilities.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

const TLDS: &[&str] = &["com", "net", "org", "io", "de", "co", "info"];

/// Generate a random lowercase label of 3 to 12 characters.
pub fn random_label(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(3..=12);
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}

/// Generate a random registrable domain such as `qwerty.net`.
pub fn random_root(rng: &mut impl Rng) -> String {
    let tld = TLDS.choose(rng).copied().unwrap_or("com");
    format!("{}.{tld}", random_label(rng))
}

/// Generate `count` distinct domains; about half are bare roots and the
/// rest are hosts under a root.
pub fn generate_corpus(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut seen = HashSet::with_capacity(count);
    let mut corpus = Vec::with_capacity(count);

    while corpus.len() < count {
        let root = random_root(&mut rng);
        let name = if rng.gen_bool(0.5) {
            root
        } else {
            format!("{}.{root}", random_label(&mut rng))
        };
        if seen.insert(name.clone()) {
            corpus.push(name);
        }
    }
    corpus
}

/// Write `corpus` as a carriage-return separated list and return its path.
pub fn write_corpus(dir: &Path, corpus: &[String]) -> io::Result<PathBuf> {
    let path = dir.join("domains.txt");
    std::fs::write(&path, corpus.join("\r"))?;
    Ok(path)
}

/// Queries that hit exactly.
pub fn exact_queries(corpus: &[String], count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .filter_map(|_| corpus.choose(&mut rng).cloned())
        .collect()
}

/// Queries that only hit through the root-domain fallback.
pub fn fallback_queries(corpus: &[String], count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let roots: Vec<&String> = corpus.iter().filter(|d| d.matches('.').count() == 1).collect();
    (0..count)
        .filter_map(|_| roots.choose(&mut rng))
        .map(|root| format!("fallback-{}.{root}", random_label(&mut rand::thread_rng())))
        .collect()
}

/// Queries that miss both lookups.
pub fn missing_queries(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| format!("{}.{}.invalid", random_label(&mut rng), random_label(&mut rng)))
        .collect()
}
