//! Chart shapes handed to the presentation layer
//!
//! Charts carry ordered (label, value) pairs plus the titles and colours the
//! dashboard draws them with; rendering is left to the client.

use serde::Serialize;

use crate::models::{ResearchArea, UniversityCitations, UniversityPublications};

/// Bar colour of the publications ranking
pub const PUBLICATIONS_COLOR: &str = "#1f77b4";

/// Bar colour of the citations ranking
pub const CITATIONS_COLOR: &str = "#ff7f0e";

/// Slice colours of the research-area pie, in slice order
pub const PIE_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// One labelled value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datum {
    pub label: String,
    pub value: i64,
}

impl Datum {
    fn new(label: &str, value: i64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Horizontal bar chart, bars in rank order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub value_axis: String,
    pub label_axis: String,
    pub color: String,
    pub bars: Vec<Datum>,
}

impl BarChart {
    pub fn publications(rows: &[UniversityPublications]) -> Self {
        Self {
            title: "Top Universities by Publications".to_string(),
            value_axis: "Total Publications".to_string(),
            label_axis: "University".to_string(),
            color: PUBLICATIONS_COLOR.to_string(),
            bars: rows
                .iter()
                .map(|r| Datum::new(&r.university_name, r.total_publications))
                .collect(),
        }
    }

    pub fn citations(rows: &[UniversityCitations]) -> Self {
        Self {
            title: "Top Universities by Citations".to_string(),
            value_axis: "Total Citations".to_string(),
            label_axis: "University".to_string(),
            color: CITATIONS_COLOR.to_string(),
            bars: rows
                .iter()
                .map(|r| Datum::new(&r.university_name, r.total_citations))
                .collect(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.value).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Both university rankings for one rank range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingCharts {
    pub publications: BarChart,
    pub citations: BarChart,
}

/// Pie chart of keyword shares
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<Datum>,
    pub colors: Vec<String>,
}

impl PieChart {
    pub fn research_areas(university: &str, rows: &[ResearchArea]) -> Self {
        Self {
            title: format!("Top Research Areas for {}", university),
            slices: rows
                .iter()
                .map(|r| Datum::new(&r.research_area, r.publication_count))
                .collect(),
            colors: PIE_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Sum of all slice values
    pub fn total(&self) -> i64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Percentage of the whole held by slice `idx`
    pub fn percent(&self, idx: usize) -> Option<f64> {
        let total = self.total();
        let slice = self.slices.get(idx)?;
        (total > 0).then(|| slice.value as f64 * 100.0 / total as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}
