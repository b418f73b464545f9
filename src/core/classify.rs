/// Style classifier of a results-table cell, taken from its `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    EntityName,
    Fail,
    Pass,
    Other,
}

pub const PASS_MARK: &str = "1";
pub const FAIL_MARK: &str = "x";

impl CellClass {
    pub fn from_class_attr(attr: &str) -> Self {
        // 頁面上的 class 屬性可能帶有多餘空白，先正規化
        let normalized = attr.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            "boardmodel text-ellipsis" => Self::EntityName,
            "bucket cell-full bg-danger" => Self::Fail,
            "bucket cell-full" => Self::Pass,
            _ => Self::Other,
        }
    }
}

/// Maps one cell onto its report value. Unknown classes are blank.
pub fn classify(class: CellClass, raw_text: &str) -> String {
    let text = raw_text.trim();
    match class {
        // 名稱欄可能跨行（巢狀標籤），壓成單行
        CellClass::EntityName => text.split_whitespace().collect::<Vec<_>>().join(" "),
        CellClass::Fail => FAIL_MARK.to_string(),
        CellClass::Pass if !text.is_empty() => PASS_MARK.to_string(),
        CellClass::Pass | CellClass::Other => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_class_attr() {
        assert_eq!(
            CellClass::from_class_attr("boardmodel text-ellipsis"),
            CellClass::EntityName
        );
        assert_eq!(
            CellClass::from_class_attr("bucket cell-full bg-danger"),
            CellClass::Fail
        );
        assert_eq!(CellClass::from_class_attr("bucket cell-full "), CellClass::Pass);
        assert_eq!(CellClass::from_class_attr(" bucket  cell-full"), CellClass::Pass);
        assert_eq!(
            CellClass::from_class_attr("bucket cell-full bg-warning"),
            CellClass::Other
        );
        assert_eq!(CellClass::from_class_attr(""), CellClass::Other);
    }

    #[test]
    fn test_classify_values() {
        assert_eq!(classify(CellClass::EntityName, "  Board-A \n"), "Board-A");
        assert_eq!(
            classify(CellClass::EntityName, "Board-A\n                rev 2"),
            "Board-A rev 2"
        );
        assert_eq!(classify(CellClass::Fail, ""), "x");
        assert_eq!(classify(CellClass::Fail, "anything"), "x");
        assert_eq!(classify(CellClass::Pass, " 3 "), "1");
        assert_eq!(classify(CellClass::Pass, "   "), "");
        assert_eq!(classify(CellClass::Other, "decoration"), "");
    }

    #[test]
    fn test_classify_is_total() {
        let classes = [
            CellClass::EntityName,
            CellClass::Fail,
            CellClass::Pass,
            CellClass::Other,
        ];
        for class in classes {
            for text in ["", " ", "1", "x", "Board", "\u{a0}"] {
                let value = classify(class, text);
                assert!(
                    value.is_empty() || value == PASS_MARK || value == FAIL_MARK
                        || class == CellClass::EntityName,
                    "{:?} {:?} -> {:?}",
                    class,
                    text,
                    value
                );
            }
        }
    }
}
