pub mod version_repo;

pub use version_repo::VersionRepo;
