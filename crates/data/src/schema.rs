use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub names: Vec<String>,
}

impl RosterPreset {
    /// Roster text as it would be typed into the editor, one name per line.
    pub fn as_text(&self) -> String {
        self.names.join("\n")
    }
}

pub fn builtin_presets() -> Vec<RosterPreset> {
    vec![RosterPreset {
        id: "demo".to_string(),
        name: "Demo".to_string(),
        names: ["张三", "李四", "王五", "赵六", "钱七", "孙八", "周九", "吴十"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    }]
}
