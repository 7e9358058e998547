use std::fmt::Write as _;

use lexrag_chunk::Chunk;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Picks up to `n` distinct chunks at random, returned in file order. A seed
/// makes the pick reproducible.
#[must_use]
pub fn sample_chunks(chunks: &[Chunk], n: usize, seed: Option<u64>) -> Vec<&Chunk> {
    let amount = n.min(chunks.len());
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut picked = rand::seq::index::sample(&mut rng, chunks.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| &chunks[i]).collect()
}

#[must_use]
pub fn render_sample(sample: &[&Chunk]) -> String {
    let mut out = String::new();
    for (i, chunk) in sample.iter().enumerate() {
        let _ = writeln!(out, "--- chunk {} ---", i + 1);
        for (key, value) in chunk.metadata.iter() {
            let _ = writeln!(out, "{key}: {value}");
        }
        let _ = writeln!(
            out,
            "words: {}\n\n{}\n",
            lexrag_chunk::types::word_count(&chunk.content),
            chunk.content
        );
    }
    out
}
