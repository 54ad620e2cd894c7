use serde::{Deserialize, Serialize};

/// One entry of the sheet catalog: backend sheet name plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    pub display_name: String,
}

impl SheetSpec {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Evaluation sheets loaded for every evaluator, in display order.
pub fn default_catalog() -> Vec<SheetSpec> {
    vec![
        SheetSpec::new("DT", "Design Thinking"),
        SheetSpec::new("PITCH", "Pitch"),
        SheetSpec::new("PROTÓTIPO", "Protótipo"),
        SheetSpec::new("PROTÓTIPO_FISICO", "Protótipo Físico"),
        // Kept for older events still using the single-sheet layout.
        SheetSpec::new("MARATONA", "Maratona"),
    ]
}

/// Display label for a sheet name, falling back to the name itself.
pub fn display_name<'a>(catalog: &'a [SheetSpec], name: &'a str) -> &'a str {
    catalog
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.display_name.as_str())
        .unwrap_or(name)
}
