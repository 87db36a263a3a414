use crate::Locale;
use serde::{Deserialize, Serialize};

/// User-facing notification raised by the session; front-ends decide how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    EmptyRoster,
    InvalidCount,
    OverRequest { available: usize, drawing: usize },
    Copied,
    NothingToCopy,
    CopyFailed,
    ResetDone,
    PresetLoaded { name: String },
}

impl Notice {
    pub fn title(&self, locale: Locale) -> String {
        let text = match self {
            Self::EmptyRoster => locale.text("Roster is empty", "名单为空"),
            Self::InvalidCount => locale.text("Invalid count", "人数不合法"),
            Self::OverRequest { .. } => locale.text("Too many requested", "人数过多"),
            Self::Copied => locale.text("Copied", "已复制"),
            Self::NothingToCopy => locale.text("Nothing to copy", "无内容"),
            Self::CopyFailed => locale.text("Copy failed", "复制失败"),
            Self::ResetDone => locale.text("Reset", "已重置"),
            Self::PresetLoaded { .. } => locale.text("Loaded", "已加载"),
        };
        text.to_string()
    }

    pub fn description(&self, locale: Locale) -> String {
        match self {
            Self::EmptyRoster => locale
                .text(
                    "Enter candidates in the roster pane, one name per line.",
                    "请在左侧输入候选人，每行一个名字。",
                )
                .to_string(),
            Self::InvalidCount => locale
                .text(
                    "Enter a draw count greater than 0.",
                    "请输入大于 0 的抽取人数。",
                )
                .to_string(),
            Self::OverRequest { available, drawing } => match locale {
                Locale::EnUs => format!(
                    "Only {available} candidates available, drawing {drawing}."
                ),
                Locale::ZhCn => format!("可用人数仅有 {available}，将自动抽取 {drawing} 人。"),
            },
            Self::Copied => locale
                .text("Result copied to clipboard.", "结果已复制到剪贴板")
                .to_string(),
            Self::NothingToCopy => locale
                .text("There is no result to copy.", "没有可复制的结果")
                .to_string(),
            Self::CopyFailed => locale
                .text("Please select and copy manually.", "请手动选择并复制。")
                .to_string(),
            Self::ResetDone => locale
                .text("All data has been cleared.", "所有数据已清除")
                .to_string(),
            Self::PresetLoaded { name } => match locale {
                Locale::EnUs => format!("Roster \"{name}\" loaded."),
                Locale::ZhCn => format!("{name}名单已加载完成"),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyRoster | Self::InvalidCount | Self::CopyFailed | Self::NothingToCopy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_request_mentions_both_numbers() {
        let notice = Notice::OverRequest {
            available: 3,
            drawing: 3,
        };
        assert_eq!(
            notice.description(Locale::ZhCn),
            "可用人数仅有 3，将自动抽取 3 人。"
        );
        assert!(notice.description(Locale::EnUs).contains("Only 3"));
        assert!(!notice.is_error());
    }

    #[test]
    fn titles_are_localized() {
        assert_eq!(Notice::EmptyRoster.title(Locale::ZhCn), "名单为空");
        assert_eq!(Notice::EmptyRoster.title(Locale::EnUs), "Roster is empty");
        assert!(Notice::CopyFailed.is_error());
    }
}
