//! Output generation for the offline pipeline stages.
//!
//! # Submodules
//!
//! - [`tables`]: CSV files passed between stages and the final feature table
//! - [`json`]: fitted vectorisers and the specialist author list
//! - [`report`]: the plain-text analysis printed by `analyze`
//!
//! # Output Structure
//!
//! ```text
//! sensed_data.csv                  # sense
//! processed_data_separated.csv     # preprocess
//! dataset_features_final.csv       # features
//! models/
//! ├── tfidf_trail.json
//! ├── tfidf_tags.json
//! └── authors_list.json
//! ```

pub mod json;
pub mod report;
pub mod tables;
