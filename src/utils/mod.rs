pub mod stabilize;
pub mod text;
