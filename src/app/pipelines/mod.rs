pub mod assignment_pipeline;

pub use assignment_pipeline::{assemble_input, AssignmentPipeline};
