pub mod explanation;
pub mod understanding;
