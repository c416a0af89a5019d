pub mod stage1_summarize;
pub mod stage2_classify;

pub use stage1_summarize::*;
pub use stage2_classify::*;
