use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// What an analysis ultimately produces. `comment` may be empty when the
/// model did not follow the two-section format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub comment: String,
}

/// Splits a raw model reply into structured fields.
///
/// The split is a heuristic over free text, so it lives behind a trait: a
/// stricter structured-output parser can replace [`NumberedSplit`] without
/// touching the request pipeline.
pub trait ReplyParser: Send + Sync {
    fn parse(&self, raw: &str) -> AnalysisResult;
}

/// Default strategy: the prompt asks for two numbered sections, so the reply
/// is expected to look like `1. <summary> 2. <comment>` with either ASCII or
/// CJK numbering punctuation. A reply that doesn't match becomes a
/// summary-only result; it is never an error.
pub struct NumberedSplit;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)1[\.、．]\s*(.+?)2[\.、．]\s*(.+)").unwrap());

impl ReplyParser for NumberedSplit {
    fn parse(&self, raw: &str) -> AnalysisResult {
        match SECTION_RE.captures(raw) {
            Some(caps) => AnalysisResult {
                summary: caps[1].trim().to_string(),
                comment: caps[2].trim().to_string(),
            },
            None => AnalysisResult {
                summary: raw.to_string(),
                comment: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> AnalysisResult {
        NumberedSplit.parse(raw)
    }

    #[test]
    fn splits_two_numbered_sections() {
        let out = parse("1. 摘要內容2. 感想內容");
        assert_eq!(out.summary, "摘要內容");
        assert_eq!(out.comment, "感想內容");
    }

    #[test]
    fn plain_reply_becomes_summary_only() {
        let out = parse("這是一段純文字回覆");
        assert_eq!(out.summary, "這是一段純文字回覆");
        assert_eq!(out.comment, "");
    }

    #[test]
    fn accepts_cjk_enumeration_punctuation() {
        let out = parse("1、重點在這裡\n2、評論在這裡");
        assert_eq!(out.summary, "重點在這裡");
        assert_eq!(out.comment, "評論在這裡");

        let out = parse("1．第一段2．第二段");
        assert_eq!(out.summary, "第一段");
        assert_eq!(out.comment, "第二段");
    }

    #[test]
    fn sections_may_span_multiple_lines() {
        let raw = "1. 文章討論了氣候變遷的成因，\n並列舉了三項主要證據。\n2. 作者的論證嚴謹，\n值得一讀。";
        let out = parse(raw);
        assert_eq!(
            out.summary,
            "文章討論了氣候變遷的成因，\n並列舉了三項主要證據。"
        );
        assert_eq!(out.comment, "作者的論證嚴謹，\n值得一讀。");
    }

    #[test]
    fn fields_are_trimmed() {
        let out = parse("1.   summary text  \n 2.   comment text \n");
        assert_eq!(out.summary, "summary text");
        assert_eq!(out.comment, "comment text");
    }

    #[test]
    fn reply_with_only_first_marker_falls_back() {
        let raw = "1. 只有摘要，沒有第二段";
        let out = parse(raw);
        assert_eq!(out.summary, raw);
        assert_eq!(out.comment, "");
    }
}
