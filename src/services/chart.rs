//! Chart image references

use crate::models::ImageRef;

/// Supplies an optional chart image for a symbol
pub trait ChartSource {
    fn chart(&self, symbol: &str) -> Option<ImageRef>;
}

/// Chart URL built from a template containing `{symbol}`,
/// e.g. `https://finviz.com/chart.ashx?t={symbol}`
pub struct UrlTemplateChart {
    template: String,
}

impl UrlTemplateChart {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl ChartSource for UrlTemplateChart {
    fn chart(&self, symbol: &str) -> Option<ImageRef> {
        Some(ImageRef::url(self.template.replace("{symbol}", symbol)))
    }
}
