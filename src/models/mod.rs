pub mod chart;
pub mod patch;
pub mod tooth;

pub use chart::{Chart, ChartFormatError};
pub use patch::Patch;
pub use tooth::{InvalidToothId, Site, ToothId, ToothRecord, SITES_PER_TOOTH};
