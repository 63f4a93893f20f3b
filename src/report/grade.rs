use super::types::MetricStatus;

/// Style applied to a value in the chat markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    Pass,
    Fail,
    Warning,
    Empty,
}

impl StyleTag {
    /// Font color understood by the group-bot markdown dialect.
    pub fn color(&self) -> &'static str {
        match self {
            StyleTag::Pass => "info",
            StyleTag::Fail | StyleTag::Warning => "warning",
            StyleTag::Empty => "comment",
        }
    }

    pub fn wrap(&self, text: &str) -> String {
        format!("<font color=\"{}\">{}</font>", self.color(), text)
    }
}

/// Map a 1-6 rating code to its letter grade. Anything else passes through.
pub fn classify_grade(raw: &str) -> String {
    let grade = match raw {
        "1" => "A",
        "2" => "B",
        "3" => "C",
        "4" => "D",
        "5" => "E",
        "6" => "F",
        other => other,
    };
    grade.to_string()
}

/// `NoValue` never reaches a cell through here; the renderer swaps it for
/// the empty marker first.
pub fn classify_status_color(status: MetricStatus) -> StyleTag {
    match status {
        MetricStatus::Ok => StyleTag::Pass,
        MetricStatus::Error | MetricStatus::NoValue => StyleTag::Fail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_codes_map_to_letters() {
        let expected = [("1", "A"), ("2", "B"), ("3", "C"), ("4", "D"), ("5", "E"), ("6", "F")];
        for (raw, letter) in expected {
            assert_eq!(classify_grade(raw), letter);
        }
    }

    #[test]
    fn test_other_values_pass_through() {
        for raw in ["", "0", "7", "1.0", "A", "2.34%", " 1"] {
            assert_eq!(classify_grade(raw), raw);
        }
    }

    #[test]
    fn test_status_color() {
        assert_eq!(classify_status_color(MetricStatus::Ok), StyleTag::Pass);
        assert_eq!(classify_status_color(MetricStatus::Error), StyleTag::Fail);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(StyleTag::Pass.wrap("A"), "<font color=\"info\">A</font>");
        assert_eq!(StyleTag::Empty.wrap("empty"), "<font color=\"comment\">empty</font>");
    }
}
