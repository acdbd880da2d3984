use ratatui::style::Color;

/// The two input tabs of the upload form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadMode {
    /// Upload a file picked from disk or dropped onto the terminal
    #[default]
    File,
    /// Upload pasted text as a synthesized file
    Text,
}

impl UploadMode {
    pub const ALL: [UploadMode; 2] = [UploadMode::File, UploadMode::Text];

    /// The other tab
    pub fn toggle(&self) -> Self {
        match self {
            Self::File => Self::Text,
            Self::Text => Self::File,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::File => "File",
            Self::Text => "Text",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::File => 0,
            Self::Text => 1,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::File => Color::Cyan,
            Self::Text => Color::Magenta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(UploadMode::File.toggle(), UploadMode::Text);
        assert_eq!(UploadMode::Text.toggle(), UploadMode::File);
        assert_eq!(UploadMode::default(), UploadMode::File);
    }

    #[test]
    fn test_index_matches_all() {
        for (i, mode) in UploadMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }
}
