//! Presentation adapter: derives a fully specified display descriptor from a
//! [`QuestionRow`]. Pure — no I/O and no input mutation. The frontend webview
//! decodes the title markup to rich text and rasterizes the tag chips; this
//! module fixes *what* is shown, never how pixels come out.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::types::QuestionRow;

/// Chip background fill.
pub const CHIP_BACKGROUND: &str = "#E4EDF4";
/// Chip label color.
pub const CHIP_FOREGROUND: &str = "#3E6D8E";
/// Horizontal chip padding, per side, in density-independent units.
pub const CHIP_PADDING_X: u32 = 15;
/// Bottom chip padding in density-independent units.
pub const CHIP_PADDING_BOTTOM: u32 = 1;
/// Chip label text size.
pub const CHIP_TEXT_SIZE: u32 = 35;

/// Highlight fill behind the badge of an answered question.
pub const ANSWERED_BACKGROUND: &str = "#75845C";
/// Badge text color on the highlight fill.
pub const ANSWERED_FOREGROUND: &str = "#FFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleWeight {
    Normal,
    Bold,
}

/// One tag chip: the label plus the style the frontend draws it with.
/// Chips for a row are laid out left to right in tag order with a single
/// space-width gap between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipSpec {
    pub text: String,
    pub background: &'static str,
    pub foreground: &'static str,
    pub padding_x: u32,
    pub padding_bottom: u32,
    pub text_size: u32,
}

impl ChipSpec {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            background: CHIP_BACKGROUND,
            foreground: CHIP_FOREGROUND,
            padding_x: CHIP_PADDING_X,
            padding_bottom: CHIP_PADDING_BOTTOM,
            text_size: CHIP_TEXT_SIZE,
        }
    }
}

/// Everything one list row shows, ready for the frontend to bind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDisplay {
    /// Title markup as delivered by the API; the webview renders it rich.
    pub title_html: String,
    pub title_weight: TitleWeight,
    /// Local time on the first line, local date on the second; empty when
    /// the row has no creation date.
    pub date_text: String,
    pub vote_text: String,
    pub answer_text: String,
    /// When set, the whole (space-padded) answer badge gets the highlight:
    /// [`ANSWERED_BACKGROUND`] fill, [`ANSWERED_FOREGROUND`] text, bold.
    pub answer_highlighted: bool,
    pub view_text: String,
    pub author_name: String,
    pub avatar_url: String,
    pub chips: Vec<ChipSpec>,
    pub link: String,
}

/// Map one row to its display descriptor.
pub fn render_row(row: &QuestionRow) -> RowDisplay {
    let answered = row.answered == Some(true);
    let answer_count = count_text(row.answers);
    RowDisplay {
        title_html: row.title.clone(),
        title_weight: title_weight(row.visited),
        date_text: date_text(row.creation_date),
        vote_text: count_text(row.votes),
        answer_text: if answered {
            format!(" {answer_count} ")
        } else {
            answer_count
        },
        answer_highlighted: answered,
        view_text: count_text(row.views),
        author_name: row.owner_display_name.clone(),
        avatar_url: row.owner_profile_image_url.clone(),
        chips: row
            .tags
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| ChipSpec::new(t))
            .collect(),
        link: row.link.clone(),
    }
}

/// Render a whole batch in order.
pub fn render_rows(rows: &[QuestionRow]) -> Vec<RowDisplay> {
    rows.iter().map(render_row).collect()
}

/// A row reads as "unread" (bold) unless it is positively known visited.
/// Unknown visited state is deliberately indistinguishable from unvisited.
fn title_weight(visited: Option<bool>) -> TitleWeight {
    if visited == Some(true) {
        TitleWeight::Normal
    } else {
        TitleWeight::Bold
    }
}

/// Absent counts show as empty text rather than a placeholder zero.
fn count_text(count: Option<i64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_default()
}

fn date_text(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => {
            let local = d.with_timezone(&Local);
            format!("{}\n{}", local.format("%H:%M"), local.format("%Y-%m-%d"))
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn visited_title_is_normal_weight() {
        let row = QuestionRow::new().visited(Some(true)).title("seen");
        assert_eq!(render_row(&row).title_weight, TitleWeight::Normal);
    }

    #[test]
    fn unvisited_and_unknown_titles_are_bold() {
        for visited in [Some(false), None] {
            let row = QuestionRow::new().visited(visited);
            assert_eq!(render_row(&row).title_weight, TitleWeight::Bold);
        }
    }

    #[test]
    fn answered_badge_is_padded_and_highlighted() {
        let row = QuestionRow::new().answers(Some(5)).answered(Some(true));
        let display = render_row(&row);
        assert_eq!(display.answer_text, " 5 ");
        assert!(display.answer_highlighted);
    }

    #[test]
    fn unanswered_badge_is_bare_text() {
        for answered in [Some(false), None] {
            let row = QuestionRow::new().answers(Some(5)).answered(answered);
            let display = render_row(&row);
            assert_eq!(display.answer_text, "5");
            assert!(!display.answer_highlighted);
        }
    }

    #[test]
    fn chips_keep_tag_order_and_style() {
        let row = QuestionRow::new().tags(Some(vec!["java".into(), "android".into()]));
        let chips = render_row(&row).chips;
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].text, "java");
        assert_eq!(chips[1].text, "android");
        assert_eq!(chips[0].background, CHIP_BACKGROUND);
        assert_eq!(chips[0].foreground, CHIP_FOREGROUND);
        assert_eq!(chips[0].padding_x, CHIP_PADDING_X);
        assert_eq!(chips[0].text_size, CHIP_TEXT_SIZE);
    }

    #[test]
    fn absent_tags_render_no_chips() {
        assert!(render_row(&QuestionRow::new()).chips.is_empty());
    }

    #[test]
    fn date_text_has_time_then_date_lines() {
        let row = QuestionRow::new()
            .creation_date(Some(Utc.timestamp_millis_opt(1_400_000_000_000).unwrap()));
        let text = render_row(&row).date_text;
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 2);
        // HH:MM then YYYY-MM-DD, in the viewer's timezone
        assert_eq!(lines[0].len(), 5);
        assert_eq!(lines[1].len(), 10);
    }

    #[test]
    fn absent_fields_render_empty_not_panic() {
        let display = render_row(&QuestionRow::new());
        assert_eq!(display.date_text, "");
        assert_eq!(display.vote_text, "");
        assert_eq!(display.answer_text, "");
        assert_eq!(display.view_text, "");
    }

    #[test]
    fn example_row_renders_per_contract() {
        let row = QuestionRow::new()
            .title("<b>How to</b> sort?")
            .votes(Some(10))
            .answers(Some(0))
            .answered(Some(false))
            .views(Some(42));
        let display = render_row(&row);
        assert_eq!(display.title_html, "<b>How to</b> sort?");
        assert_eq!(display.title_weight, TitleWeight::Bold);
        assert_eq!(display.vote_text, "10");
        assert_eq!(display.answer_text, "0");
        assert!(!display.answer_highlighted);
        assert_eq!(display.view_text, "42");
        assert_eq!(display.date_text, "");
    }

    #[test]
    fn render_does_not_mutate_input() {
        let row = QuestionRow::new()
            .visited(Some(false))
            .tags(Some(vec!["rust".into()]));
        let before = row.clone();
        let _ = render_row(&row);
        assert_eq!(row, before);
    }
}
