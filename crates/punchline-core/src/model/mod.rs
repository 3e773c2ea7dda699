pub mod mode;
pub mod record;
pub mod table;

pub use mode::MatchMode;
pub use record::SimileRecord;
pub use table::SimileTable;
