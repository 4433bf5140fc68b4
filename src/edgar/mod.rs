pub mod cik;
pub mod client;
pub mod filing;
pub mod harvest;
pub mod report;
pub mod submissions;

pub use cik::Cik;
pub use client::{EdgarClient, FetchError, SubmissionsSource};
pub use filing::{extract, FilingRecord};
pub use harvest::{harvest, run, save, write_records, HarvestError, HarvestReport};
pub use report::ReportType;
pub use submissions::{ExtractError, SubmissionsDocument};
