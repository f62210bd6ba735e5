pub mod synthetic_matches;
