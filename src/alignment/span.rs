use crate::error::EditError;
use crate::types::{TimeInterval, WordAlignmentRow, WordSpan};

/// Maps a word-index span onto the time axis of `words`.
///
/// Branches are checked in order: insertion before the first word, insertion
/// after the last word (zero width, the true end is unknown), zero-width
/// insertion into the gap before word `start`, then the general span.
pub fn span_to_interval(
    words: &[WordAlignmentRow],
    span: WordSpan,
) -> Result<TimeInterval, EditError> {
    let n = words.len();
    let WordSpan { start, end } = span;
    if start > end || start < 0 || end > n as i64 {
        return Err(EditError::invalid_span(start, end, n));
    }
    // Bounds were checked above, both indices fit in 0..=n.
    let (s, e) = (start as usize, end as usize);

    let (start_secs, end_secs) = if e == 0 {
        let first = words
            .first()
            .ok_or_else(|| EditError::invalid_span(start, end, n))?;
        (0.0, first.start_time)
    } else if s == n {
        let last = words[n - 1].end_time;
        (last, last)
    } else if s == e {
        (words[s - 1].end_time, words[s].start_time)
    } else {
        let start_secs = if s > 0 {
            words[s - 1].end_time
        } else {
            words[s].start_time
        };
        let end_secs = if e < n {
            words[e].start_time
        } else {
            words[n - 1].end_time
        };
        (start_secs, end_secs)
    };

    Ok(TimeInterval {
        start_secs,
        end_secs,
    })
}
