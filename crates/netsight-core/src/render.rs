// ── Metric classification ──
//
// Turns a metrics payload into chart specifications, one per metric, in
// payload order. No numeric transformation happens here.

use strum::Display;

use crate::model::{MetricValue, MetricsPayload};

/// Chart type used for every metric.
pub const CHART_KIND: &str = "bar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ChartShape {
    /// One bar per category.
    Distribution,
    /// A single bar labelled with the metric name.
    SingleValue,
}

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub label: String,
    pub value: f64,
}

impl BarSpec {
    /// The literal value, as shown next to the bar.
    pub fn display_value(&self) -> String {
        format!("{}", self.value)
    }
}

/// Everything a chart backend needs to draw one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Metric name; also the chart label and its identity.
    pub key: String,
    pub shape: ChartShape,
    pub bars: Vec<BarSpec>,
}

impl ChartSpec {
    pub fn kind(&self) -> &'static str {
        CHART_KIND
    }
}

pub struct MetricRenderer;

impl MetricRenderer {
    pub fn classify(payload: &MetricsPayload) -> Vec<ChartSpec> {
        payload
            .iter()
            .map(|(key, value)| Self::spec_for(key, value))
            .collect()
    }

    pub fn spec_for(key: &str, value: &MetricValue) -> ChartSpec {
        match value {
            MetricValue::Distribution(buckets) => ChartSpec {
                key: key.to_owned(),
                shape: ChartShape::Distribution,
                bars: buckets
                    .iter()
                    .map(|(label, &value)| BarSpec {
                        label: label.clone(),
                        value,
                    })
                    .collect(),
            },
            MetricValue::Scalar(value) => ChartSpec {
                key: key.to_owned(),
                shape: ChartShape::SingleValue,
                bars: vec![BarSpec {
                    label: key.to_owned(),
                    value: *value,
                }],
            },
        }
    }
}
