pub mod calibration;
pub mod consts;
pub mod error;
pub mod frame;
pub mod io;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod stack;
pub mod tools;
