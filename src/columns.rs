/// Column name constants for the spreadsheet contract, to ensure consistency
/// across the codebase. The upload layer hands the engine rows keyed by
/// exactly these labels; the set and spelling are a versioned external
/// contract shared with the dashboard frontend.

// Identity fields
pub const SEQUENCE: &str = "序号";
pub const NAME: &str = "姓名";
pub const GENDER: &str = "性别";
pub const AGE: &str = "年龄";
pub const BIRTH_DATE: &str = "出生日期";

// Background fields
pub const POLITICAL_STATUS: &str = "政治面貌";
pub const ORIGIN: &str = "籍贯";

// Application fields
pub const SIGNUP_STATUS: &str = "应聘状态";
pub const POSITION: &str = "应聘职位";

// Education fields
pub const DEGREE: &str = "最高学历";
pub const MAJOR: &str = "最高学历专业";
pub const MAJOR_CATEGORY: &str = "专业类型";
pub const INSTITUTION: &str = "最高学历毕业院校";
pub const INSTITUTION_CATEGORY: &str = "最高学历毕业院校类别";

/// All required columns, in the order the upload template lists them.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    SEQUENCE,
    NAME,
    GENDER,
    AGE,
    BIRTH_DATE,
    POLITICAL_STATUS,
    ORIGIN,
    SIGNUP_STATUS,
    POSITION,
    DEGREE,
    MAJOR,
    MAJOR_CATEGORY,
    INSTITUTION,
    INSTITUTION_CATEGORY,
];

/// Whether a column name belongs to the required contract.
pub fn is_required_column(name: &str) -> bool {
    REQUIRED_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_count() {
        assert_eq!(REQUIRED_COLUMNS.len(), 14);
    }

    #[test]
    fn test_is_required_column() {
        assert!(is_required_column("年龄"));
        assert!(is_required_column("最高学历毕业院校类别"));
        assert!(!is_required_column("备注"));
    }
}
