pub mod file;
pub mod supabase;
pub mod traits;
pub mod types;

pub use file::FileSource;
pub use supabase::SupabaseSource;
pub use traits::ListingSource;
pub use types::SourceConfig;
