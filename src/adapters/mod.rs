// Adapters layer: HTTP clients for the three keyword data providers.

pub mod ahrefs;
pub mod google_trends;
pub mod semrush;

pub use ahrefs::AhrefsClient;
pub use google_trends::GoogleTrendsClient;
pub use semrush::SemrushClient;
