pub mod drawing;
pub mod ecg;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod logging;
