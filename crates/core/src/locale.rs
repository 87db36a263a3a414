use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    EnUs,
    ZhCn,
}

impl Locale {
    pub fn from_opt(value: Option<&str>) -> Self {
        if normalize_locale(value) == "zh_CN" {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::ZhCn => "zh_CN",
        }
    }

    pub fn text<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        if matches!(self, Self::ZhCn) {
            zh
        } else {
            en
        }
    }
}

pub fn normalize_locale(locale: Option<&str>) -> String {
    let raw = locale.unwrap_or("en_US").trim();
    if raw.is_empty() {
        return "en_US".to_string();
    }
    let lowered = raw.replace('-', "_").to_ascii_lowercase();
    match lowered.as_str() {
        "zh" | "zh_cn" | "zh_hans" | "zh_hans_cn" => "zh_CN".to_string(),
        "en" | "en_us" => "en_US".to_string(),
        _ => raw.replace('-', "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_spellings() {
        assert_eq!(normalize_locale(Some("zh-CN")), "zh_CN");
        assert_eq!(normalize_locale(Some(" zh_Hans ")), "zh_CN");
        assert_eq!(normalize_locale(Some("en")), "en_US");
        assert_eq!(normalize_locale(Some("")), "en_US");
        assert_eq!(normalize_locale(None), "en_US");
        assert_eq!(normalize_locale(Some("fr-FR")), "fr_FR");
        assert_eq!(Locale::from_opt(Some("fr-FR")), Locale::EnUs);
        assert_eq!(Locale::from_opt(Some("zh")), Locale::ZhCn);
    }
}
