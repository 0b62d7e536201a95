pub mod context;
pub mod dispatch;
pub mod handler;
pub mod opcode;
pub mod ops;
pub mod runtime;
pub mod segment;
pub mod segmenter;
