pub mod completion;
pub mod debug;
pub mod generate;
pub mod search;
pub mod tree;
