//! Built-in analysis template catalog
//!
//! The demo analyses the notebook gallery offers. A real deployment would
//! fetch this from the backend; the POC ships a fixed table.

/// Kind of figure a template produces, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Boxplot,
    StackedBar,
    Heatmap,
}

impl FigureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Boxplot => "boxplot",
            Self::StackedBar => "stacked bar",
            Self::Heatmap => "heatmap",
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub figure: FigureKind,
}

/// The built-in demo templates.
pub const BUILTIN_TEMPLATES: &[TemplateInfo] = &[
    TemplateInfo {
        id: "alpha_diversity",
        title: "Alpha diversity",
        summary: "Within-sample diversity metrics across groups",
        figure: FigureKind::Boxplot,
    },
    TemplateInfo {
        id: "taxa_bar",
        title: "Taxonomic composition",
        summary: "Relative abundance per sample, stacked by taxon",
        figure: FigureKind::StackedBar,
    },
    TemplateInfo {
        id: "correlation_heatmap",
        title: "Feature correlation",
        summary: "Pairwise feature correlation matrix",
        figure: FigureKind::Heatmap,
    },
];

/// Look up a template by id.
pub fn find(id: &str) -> Option<&'static TemplateInfo> {
    BUILTIN_TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_diversity_is_builtin() {
        let info = find("alpha_diversity").unwrap();
        assert_eq!(info.figure, FigureKind::Boxplot);
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(find("beta_diversity").is_none());
    }

    #[test]
    fn builtin_ids_are_valid_template_ids() {
        for t in BUILTIN_TEMPLATES {
            assert!(crate::types::TemplateId::new(t.id).is_ok(), "{}", t.id);
        }
    }
}
