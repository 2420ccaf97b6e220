// Storage collaborator: free functions over the connection pool.
// Lookups are return-or-absent; updates use RETURNING so a vanished id
// surfaces as None rather than an error.

pub mod analyses;
pub mod matches;
pub mod resumes;
pub mod roadmaps;
