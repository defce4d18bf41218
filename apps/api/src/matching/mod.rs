// Competency Match Engine
// Maps a selected competency set to occupations whose top-3 competencies
// intersect it, and assembles detailed occupation profiles.
// All store access goes through the CompetencyStore trait.

pub mod engine;
pub mod handlers;
pub mod scoring;
pub mod store;
pub mod taxonomy;
