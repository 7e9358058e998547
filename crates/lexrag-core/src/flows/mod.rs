//! The commands exposed by the `lexrag` binary.

mod ask;
mod evaluate;
mod generate;
mod preprocess;
mod sample;
mod search;

pub use ask::{Answer, ask, render_answer};
pub use evaluate::{Comparison, evaluate, load_dataset, render_comparison};
pub use generate::{generate_dataset, save_dataset};
pub use preprocess::{PreprocessSummary, preprocess};
pub use sample::{render_sample, sample_chunks};
pub use search::{prepare_store, render_passages, search};
