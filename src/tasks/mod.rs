//! 命令驱动层：把模型操作组合成检查、校验、排序三个任务

pub mod check;
pub mod sort;
pub mod validate;

pub use check::{run_check, CheckOptions, CheckSummary, ErrorPolicy, PeerOutcome};
pub use sort::{run_sort, SortOptions, SortStatus, SortSummary};
pub use validate::{run_validate, ValidateSummary};
