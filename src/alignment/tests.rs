use super::{span_to_interval, AlignmentTable};
use crate::error::EditError;
use crate::types::{RowKind, TimeInterval, WordAlignmentRow, WordSpan};

const ALIGNMENT_CSV: &str = "\
Begin,End,Label,Type,Speaker
0.12,0.40,but,words,temp
0.12,0.20,B,phones,temp
0.40,0.71,when,words,temp
0.71,0.90,i,words,temp
1.05,1.52,saw,words,temp
1.60,2.10,him,words,temp
";

fn word(start: f64, end: f64, label: &str) -> WordAlignmentRow {
    WordAlignmentRow {
        start_time: start,
        end_time: end,
        label: label.to_string(),
        kind: RowKind::Word,
    }
}

fn sample_words() -> Vec<WordAlignmentRow> {
    AlignmentTable::parse(ALIGNMENT_CSV)
        .expect("valid alignment")
        .words()
}

fn interval(start: f64, end: f64) -> TimeInterval {
    TimeInterval {
        start_secs: start,
        end_secs: end,
    }
}

#[test]
fn parse_drops_header_and_keeps_all_rows() {
    let table = AlignmentTable::parse(ALIGNMENT_CSV).unwrap();
    assert_eq!(table.rows().len(), 6);
    assert_eq!(table.rows()[1].kind, RowKind::Other);
}

#[test]
fn words_filters_non_word_rows() {
    let words = sample_words();
    let labels: Vec<&str> = words.iter().map(|w| w.label.as_str()).collect();
    assert_eq!(labels, ["but", "when", "i", "saw", "him"]);
    assert_eq!(words[3].start_time, 1.05);
    assert_eq!(words[3].end_time, 1.52);
}

#[test]
fn parse_skips_blank_lines() {
    let table = AlignmentTable::parse("Begin,End,Label,Type\n\n0.0,0.5,a,words\n\n").unwrap();
    assert_eq!(table.words().len(), 1);
}

#[test]
fn parse_rejects_short_rows() {
    let err = AlignmentTable::parse("Begin,End,Label,Type\n0.0,0.5,a\n").unwrap_err();
    assert!(matches!(err, EditError::InvalidInput { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn parse_rejects_non_numeric_times() {
    let err = AlignmentTable::parse("Begin,End,Label,Type\nx,0.5,a,words\n").unwrap_err();
    assert!(err.to_string().contains("'x'"));
}

#[test]
fn load_reads_file() {
    let path = std::env::temp_dir().join("speech_edit_rs_alignment_load.csv");
    std::fs::write(&path, ALIGNMENT_CSV).expect("write alignment");
    let table = AlignmentTable::load(&path).expect("load alignment");
    assert_eq!(table.words().len(), 5);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_missing_file_is_io_error() {
    let err = AlignmentTable::load(std::path::Path::new("/nonexistent/ali.csv")).unwrap_err();
    assert!(matches!(err, EditError::Io { .. }));
}

#[test]
fn leading_insertion_runs_from_zero_to_first_word() {
    let words = sample_words();
    let got = span_to_interval(&words, WordSpan::new(0, 0)).unwrap();
    assert_eq!(got, interval(0.0, 0.12));
}

#[test]
fn trailing_insertion_is_zero_width_at_last_end() {
    let words = sample_words();
    let got = span_to_interval(&words, WordSpan::new(5, 5)).unwrap();
    assert_eq!(got, interval(2.10, 2.10));
}

#[test]
fn interior_insertion_uses_gap_before_word() {
    let words = sample_words();
    for s in 1..words.len() as i64 {
        let got = span_to_interval(&words, WordSpan::new(s, s)).unwrap();
        let s = s as usize;
        assert_eq!(got, interval(words[s - 1].end_time, words[s].start_time));
    }
    let got = span_to_interval(&words, WordSpan::new(3, 3)).unwrap();
    assert_eq!(got, interval(0.90, 1.05));
}

#[test]
fn general_span_from_first_word() {
    let words = sample_words();
    let got = span_to_interval(&words, WordSpan::new(0, 2)).unwrap();
    assert_eq!(got, interval(0.12, 0.71));
}

#[test]
fn general_span_interior() {
    let words = sample_words();
    let got = span_to_interval(&words, WordSpan::new(2, 4)).unwrap();
    assert_eq!(got, interval(0.71, 1.60));
}

#[test]
fn general_span_through_last_word() {
    let words = sample_words();
    let got = span_to_interval(&words, WordSpan::new(3, 5)).unwrap();
    assert_eq!(got, interval(0.90, 2.10));
}

#[test]
fn whole_utterance_span() {
    let words = sample_words();
    let got = span_to_interval(&words, WordSpan::new(0, 5)).unwrap();
    assert_eq!(got, interval(0.12, 2.10));
}

#[test]
fn mapping_is_idempotent() {
    let words = sample_words();
    for (s, e) in [(0, 0), (1, 1), (0, 3), (2, 5), (5, 5)] {
        let first = span_to_interval(&words, WordSpan::new(s, e)).unwrap();
        let second = span_to_interval(&words, WordSpan::new(s, e)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn rejects_reversed_negative_and_overlong_spans() {
    let words = sample_words();
    let n = words.len() as i64;
    for (s, e) in [(3, 1), (-1, 2), (0, n + 1)] {
        let err = span_to_interval(&words, WordSpan::new(s, e)).unwrap_err();
        match err {
            EditError::InvalidSpan {
                start,
                end,
                word_count,
            } => {
                assert_eq!((start, end), (s, e));
                assert_eq!(word_count, words.len());
            }
            other => panic!("expected InvalidSpan, got {other:?}"),
        }
    }
}

#[test]
fn empty_table_has_no_leading_insertion_point() {
    let err = span_to_interval(&[], WordSpan::new(0, 0)).unwrap_err();
    assert!(matches!(err, EditError::InvalidSpan { word_count: 0, .. }));
}

#[test]
fn single_word_table_boundaries() {
    let words = vec![word(0.5, 1.0, "hi")];
    assert_eq!(
        span_to_interval(&words, WordSpan::new(0, 0)).unwrap(),
        interval(0.0, 0.5)
    );
    assert_eq!(
        span_to_interval(&words, WordSpan::new(1, 1)).unwrap(),
        interval(1.0, 1.0)
    );
    assert_eq!(
        span_to_interval(&words, WordSpan::new(0, 1)).unwrap(),
        interval(0.5, 1.0)
    );
}
