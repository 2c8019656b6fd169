pub mod controls;
pub mod lap_record;
pub mod run;
mod settings;
pub mod sink;
pub mod storage;
pub mod surface;
pub mod track;
pub mod vehicle;

pub use settings::GLOBAL_CONFIG;
