pub mod airports;
pub mod clouds;
pub mod error;
pub mod handlers;
pub mod models;
pub mod obs_time;
pub mod report;
pub mod routes;
pub mod services;
pub mod units;
pub mod utils;

pub use error::{DecodeError, SourceError};
pub use models::{CloudLayer, RawMetarFields, StationCode};
pub use report::{decode, decode_at, DecodedField, MetarReport};
