// Domain models: metric identity/status, block summaries, renderer events

mod block;
mod event;
mod metric;

pub use block::{BlockRow, BlockSummary};
pub use event::{BlockListUpdate, DashboardEvent, DashboardSnapshot, MetricUpdate};
pub use metric::{MetricId, Status};
