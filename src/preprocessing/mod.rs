/*!
 * Document reduction pipeline.
 *
 * Raw text flows through these submodules in order:
 *
 * - `sanitize`: character whitelist
 * - `sections`: section and sentence splitting
 * - `extract`: pattern passes feeding the side-channels
 * - `redundancy`: near-duplicate sentence removal
 * - `topics`: topic-aware grouping
 * - `scoring`: sentence importance
 * - `selection`: batch-wise top share selection
 * - `pipeline`: the stages wired together
 */

// Re-export main types for easier usage
pub use self::extract::{PatternExtractor, SideChannel};
pub use self::pipeline::{PreprocessOutput, Preprocessor, ReductionOutput, Reducer};
pub use self::sections::Sentence;
pub use self::topics::TopicChunk;

// Submodules
pub mod extract;
pub mod pipeline;
pub mod redundancy;
pub mod sanitize;
pub mod scoring;
pub mod sections;
pub mod selection;
pub mod text;
pub mod topics;
