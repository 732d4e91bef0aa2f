use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub primary_color: String,
    pub primary_text_color: String,
    pub primary_border_color: String,
    pub line_color: String,
    pub root_fill: String,
    pub root_text_color: String,
    /// Fills for depth 1, 2, ... cycled when the tree is deeper.
    pub level_fills: Vec<String>,
    pub quote_marker_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            primary_color: "#ECECFF".to_string(),
            primary_text_color: "#333333".to_string(),
            primary_border_color: "#9370DB".to_string(),
            line_color: "#333333".to_string(),
            root_fill: "#9370DB".to_string(),
            root_text_color: "#FFFFFF".to_string(),
            level_fills: vec![
                "#ECECFF".to_string(),
                "#FFFFDE".to_string(),
                "#E8F5E9".to_string(),
            ],
            quote_marker_color: "#AAAA33".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            primary_color: "#F8FAFF".to_string(),
            primary_text_color: "#1C2430".to_string(),
            primary_border_color: "#C7D2E5".to_string(),
            line_color: "#7A8AA6".to_string(),
            root_fill: "#1C2430".to_string(),
            root_text_color: "#FFFFFF".to_string(),
            level_fills: vec![
                "#EEF2F8".to_string(),
                "#F7FAFF".to_string(),
                "#FFFFFF".to_string(),
            ],
            quote_marker_color: "#D97706".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn fill_for_depth(&self, depth: usize) -> &str {
        if depth == 0 {
            return &self.root_fill;
        }
        if self.level_fills.is_empty() {
            return &self.primary_color;
        }
        &self.level_fills[(depth - 1) % self.level_fills.len()]
    }

    pub fn text_color_for_depth(&self, depth: usize) -> &str {
        if depth == 0 {
            &self.root_text_color
        } else {
            &self.primary_text_color
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
