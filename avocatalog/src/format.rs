//! Display formatting of catalog recordings
//!
//! Pure functions: the derived fields are recomputed from the upstream
//! values on every pass and never read back.

use crate::models::{CatalogPage, FormattedRecording, ListedRecording, Presenter, RecordingPage};

/// Speaker shown when a recording has no usable presenter
pub const ANONYMOUS_PRESENTER: &str = "Anonymous Presenter";

/// Speaker shown when a recording has several presenters
pub const VARIOUS_PRESENTERS: &str = "Various Presenters";

const DERIVED_KEYS: [&str; 3] = ["duration_formatted", "speaker_name", "sanitized_title"];

/// Formats a duration in seconds
///
/// `H:MM:SS` (hours unpadded) from one hour on, `MM:SS` below.
///
/// ```
/// use avocatalog::format_duration;
///
/// assert_eq!(format_duration(3661), "1:01:01");
/// assert_eq!(format_duration(59), "00:59");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Name credited for a set of presenters
pub fn speaker_name(presenters: &[Presenter]) -> String {
    match presenters {
        [] => ANONYMOUS_PRESENTER.to_string(),
        [single] => {
            let name = single.display_name();
            if name.is_empty() {
                ANONYMOUS_PRESENTER.to_string()
            } else {
                name
            }
        }
        _ => VARIOUS_PRESENTERS.to_string(),
    }
}

/// URL-safe slug of a title
///
/// Lowercase ASCII letters and digits are kept, common accented latin
/// letters are folded, apostrophes are dropped and every other run of
/// characters becomes a single hyphen.
pub fn sanitize_title(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if matches!(c, '\'' | '\u{2019}' | '\u{2018}') {
            continue;
        }

        let lower = c.to_lowercase().next().unwrap_or(c);
        let kept = lower.is_ascii_alphanumeric() || fold_accent(lower).is_some();
        if !kept {
            pending_hyphen = true;
            continue;
        }

        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        match fold_accent(lower) {
            Some(folded) => slug.push_str(folded),
            None => slug.push(lower),
        }
    }

    slug
}

fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

/// Adds the display fields to one catalog recording
pub fn format_recording(mut recording: ListedRecording) -> FormattedRecording {
    for key in DERIVED_KEYS {
        recording.extra.remove(key);
    }

    FormattedRecording {
        duration_formatted: format_duration(recording.duration),
        speaker_name: speaker_name(&recording.presenters()),
        sanitized_title: sanitize_title(&recording.title),
        recording,
    }
}

/// Formats every recording of a page, keeping its pagination
pub fn format_recordings(page: CatalogPage) -> RecordingPage {
    page.map(format_recording)
}
