//! Presentation contract for event types.
//!
//! Every display label the classifier can produce gets a fixed marker shape
//! and color. Principal labels are styled per label; every tertiary file
//! reuses the same open/close pair.

use serde::Serialize;
use statement_core::SourceRole;
use statement_enrich::TypeClassifier;

/// Marker glyph of a plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    Circle,
    X,
    Square,
    TriangleUp,
    TriangleDown,
}

impl MarkerShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerShape::Circle => "circle",
            MarkerShape::X => "x",
            MarkerShape::Square => "square",
            MarkerShape::TriangleUp => "triangle-up",
            MarkerShape::TriangleDown => "triangle-down",
        }
    }
}

/// Style of one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub label: String,
    pub marker: MarkerShape,
    pub color: &'static str,
}

const PRINCIPAL_STYLES: [(MarkerShape, &str); 3] = [
    (MarkerShape::Circle, "blue"),
    (MarkerShape::X, "red"),
    (MarkerShape::Square, "purple"),
];

const TERTIARY_STYLES: [(MarkerShape, &str); 2] = [
    (MarkerShape::TriangleUp, "green"),
    (MarkerShape::TriangleDown, "orange"),
];

/// Styles for every label of the loaded files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleMap {
    entries: Vec<SeriesStyle>,
}

impl StyleMap {
    /// Principal styles plus one open/close pair per tertiary file id.
    pub fn new<'a>(file_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries = styled(&SourceRole::Principal, &PRINCIPAL_STYLES);
        for file_id in file_ids {
            entries.extend(styled(
                &SourceRole::Tertiary(file_id.to_string()),
                &TERTIARY_STYLES,
            ));
        }
        Self { entries }
    }

    fn find(&self, label: &str) -> Option<&SeriesStyle> {
        self.entries.iter().find(|s| s.label == label)
    }

    pub fn marker(&self, label: &str) -> Option<MarkerShape> {
        self.find(label).map(|s| s.marker)
    }

    pub fn color(&self, label: &str) -> Option<&'static str> {
        self.find(label).map(|s| s.color)
    }

    pub fn entries(&self) -> &[SeriesStyle] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn styled(role: &SourceRole, styles: &[(MarkerShape, &'static str)]) -> Vec<SeriesStyle> {
    TypeClassifier::for_role(role)
        .labels()
        .zip(styles)
        .map(|(label, (marker, color))| SeriesStyle {
            label: label.to_string(),
            marker: *marker,
            color: *color,
        })
        .collect()
}
