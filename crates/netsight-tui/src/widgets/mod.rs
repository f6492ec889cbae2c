pub mod metric_chart;
pub mod status_indicator;
