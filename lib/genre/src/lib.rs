//! Movie genre prediction from free-text descriptions
//!
//! ```
//! use roomie_genre::{GenrePredictor, NaiveBayesGenreModel, TrainingSample};
//!
//! let samples = vec![
//!     TrainingSample { genre: "horror".into(), description: "A haunted house at midnight".into() },
//!     TrainingSample { genre: "comedy".into(), description: "A clumsy clown slips on a banana".into() },
//! ];
//! let model = NaiveBayesGenreModel::train(&samples)?;
//! assert_eq!(model.predict("the clown and the banana")?, "comedy");
//! # Ok::<(), roomie_genre::GenreError>(())
//! ```

pub mod clean;
pub mod corpus;
pub mod error;
pub mod model;

pub use clean::clean_text;
pub use corpus::{balance, parse_corpus, read_corpus, TrainingSample, MAX_PER_GENRE, TOP_GENRES};
pub use error::{GenreError, Result};
pub use model::{GenrePredictor, NaiveBayesGenreModel};
