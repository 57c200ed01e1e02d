//! Top ten most used words of a text, served over HTTP.
//!
//! ```
//! use topwords::{top_words, Analysis};
//!
//! let text = "a b c d e f g h i j a";
//! let top = top_words(text, &Analysis::default()).unwrap();
//! assert_eq!(top[0].word, "a");
//! assert_eq!(top[0].count, 2);
//! ```

pub mod config;
pub mod count;
pub mod error;
pub mod http;
pub mod logger;
pub mod pool;
pub mod rank;
pub mod server;
pub mod text;

pub use error::{Error, Result};
pub use rank::{rank, top_words, Analysis, RankingPolicy, WordCount, TOP_N};
pub use server::Server;
pub use text::{normalize, tokenize, SplitMode};
