pub mod admin_seed;

pub use admin_seed::seed_admin;
