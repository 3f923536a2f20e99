pub mod api;
pub mod cli;
pub mod git;
pub mod manifest;
pub mod repo;
pub mod scale;
pub mod stats;
pub mod table;
pub mod terminal;
