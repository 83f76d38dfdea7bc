//! Chart-ready views of a task's rows.
//!
//! These are recomputed from the rows on every render. Row order is kept as
//! the server returned it.

use crate::dataset::DataRow;
use std::fmt;

/// An RGBA colour with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Blend against a black terminal background
    pub fn on_black(&self) -> (u8, u8, u8) {
        let scale = |c: u8| (c as f32 * self.a.clamp(0.0, 1.0)).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

pub const ELECTRIC_RANGE_COLOR: Rgba = Rgba::new(75, 192, 192, 0.6);
pub const BASE_MSRP_COLOR: Rgba = Rgba::new(255, 99, 132, 1.0);

pub const ELECTRIC_RANGE_LABEL: &str = "Electric Range";
pub const BASE_MSRP_LABEL: &str = "Base MSRP";

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub background_color: Option<Rgba>,
    pub border_color: Option<Rgba>,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData<L> {
    pub labels: Vec<L>,
    pub datasets: Vec<Dataset>,
}

impl<L> ChartData<L> {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The first dataset, which is the only one these charts carry
    pub fn primary(&self) -> Option<&Dataset> {
        self.datasets.first()
    }
}

/// Electric range per row, labelled by make
pub fn bar_chart(rows: &[DataRow]) -> ChartData<String> {
    ChartData {
        labels: rows.iter().map(|row| row.make.clone()).collect(),
        datasets: vec![Dataset {
            label: ELECTRIC_RANGE_LABEL,
            data: rows.iter().map(|row| row.electric_range).collect(),
            background_color: Some(ELECTRIC_RANGE_COLOR),
            border_color: None,
            fill: true,
        }],
    }
}

/// Base MSRP per row, labelled by model year
pub fn line_chart(rows: &[DataRow]) -> ChartData<i32> {
    ChartData {
        labels: rows.iter().map(|row| row.model_year).collect(),
        datasets: vec![Dataset {
            label: BASE_MSRP_LABEL,
            data: rows.iter().map(|row| row.base_msrp).collect(),
            background_color: None,
            border_color: Some(BASE_MSRP_COLOR),
            fill: false,
        }],
    }
}
