use ratatui::style::{Color, Modifier, Style};

/// Colour palette for the terminal UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub border: Color,
    pub border_focused: Color,
    pub header: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            header: Color::Cyan,
            text: Color::White,
            muted: Color::Gray,
            highlight: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            border: Color::Gray,
            border_focused: Color::Blue,
            header: Color::Blue,
            text: Color::Black,
            muted: Color::DarkGray,
            highlight: Color::Magenta,
            success: Color::Rgb(0, 128, 0),
            warning: Color::Rgb(180, 110, 0),
            error: Color::Rgb(190, 0, 0),
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast",
            border: Color::White,
            border_focused: Color::Yellow,
            header: Color::Yellow,
            text: Color::White,
            muted: Color::White,
            highlight: Color::Yellow,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            error: Color::LightRed,
        }
    }

    /// Theme by config name; unknown names fall back to dark
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => Self::light(),
            "high-contrast" | "high_contrast" => Self::high_contrast(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, using dark");
                Self::dark()
            }
        }
    }

    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn urgency(&self, urgency: &str) -> Style {
        let color = match urgency.to_lowercase().as_str() {
            "high" | "emergency" | "severe" => self.error,
            "medium" | "moderate" => self.warning,
            "low" | "mild" => self.success,
            _ => self.text,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("Light").name, "light");
        assert_eq!(Theme::by_name("high_contrast").name, "high-contrast");
        assert_eq!(Theme::by_name("solarized").name, "dark");
    }

    #[test]
    fn test_cycle_returns_to_start() {
        let theme = Theme::dark();
        assert_eq!(theme.next().next().next(), theme);
    }
}
