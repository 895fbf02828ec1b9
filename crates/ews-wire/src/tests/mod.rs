//! Cross-module tests over the full marshal/unmarshal paths.

mod round_trip;
mod update_paths;
