// Database row types, one file per table.
// Pipeline payload types live next to the stage that produces them.

pub mod analysis;
pub mod job_match;
pub mod resume;
pub mod roadmap;
