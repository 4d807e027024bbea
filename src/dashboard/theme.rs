//! Visual design for the dashboard panels

use ratatui::style::{Color, Modifier, Style};

use crate::message::Phase;

/// Slate/cyan palette echoing the original web dashboard.
pub struct DashTheme {
    pub slate: Color,
    pub cyan: Color,
    pub dim: Color,

    pub success_green: Color,
    pub warning_amber: Color,
    pub error_red: Color,
}

impl Default for DashTheme {
    fn default() -> Self {
        Self {
            slate: Color::Rgb(226, 232, 240),   // #E2E8F0
            cyan: Color::Rgb(34, 211, 238),     // #22D3EE
            dim: Color::Rgb(100, 116, 139),     // #64748B
            success_green: Color::Rgb(74, 222, 128), // #4ADE80
            warning_amber: Color::Rgb(251, 191, 36), // #FBBF24
            error_red: Color::Rgb(248, 113, 113),    // #F87171
        }
    }
}

impl DashTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for a lifecycle phase badge.
    pub fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Idle => self.dim,
            Phase::Running | Phase::Processing => self.warning_amber,
            Phase::Done => self.success_green,
            Phase::Error => self.error_red,
        }
    }

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.slate)
    }

    /// Dimmed text style
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Bold header style
    pub fn header(&self) -> Style {
        Style::default().fg(self.cyan).add_modifier(Modifier::BOLD)
    }

    /// Panel border style
    pub fn border(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Error text style
    pub fn error(&self) -> Style {
        Style::default().fg(self.error_red)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_colors_distinguish_terminal_states() {
        let theme = DashTheme::new();
        assert_ne!(theme.phase_color(Phase::Done), theme.phase_color(Phase::Error));
        assert_eq!(
            theme.phase_color(Phase::Running),
            theme.phase_color(Phase::Processing)
        );
    }
}
