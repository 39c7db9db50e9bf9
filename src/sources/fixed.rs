// Validator count has no live source; a configured constant stands in.

use super::{FetchResult, MetricSource, Reading, Target};
use crate::models::MetricId;
use async_trait::async_trait;

pub struct ValidatorCountSource {
    count: u32,
}

impl ValidatorCountSource {
    pub fn new(count: u32) -> Self {
        Self { count }
    }
}

#[async_trait]
impl MetricSource for ValidatorCountSource {
    fn target(&self) -> Target {
        Target::Metrics(&[MetricId::Validators])
    }

    async fn fetch(&self) -> FetchResult {
        Ok(Reading::Values(vec![(
            MetricId::Validators,
            f64::from(self.count),
        )]))
    }
}
